#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::A4_HZ;

// A4 sits 57 semitones above C0 (4 octaves + 9 semitones).
const A4_SEMITONES_FROM_C0: i32 = 57;

/// The twelve equal-tempered pitch classes, sharps notation.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteName {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl NoteName {
    /// Chromatic order starting at C, matching semitone index mod 12.
    pub const ALL: [NoteName; 12] = [
        NoteName::C,
        NoteName::Cs,
        NoteName::D,
        NoteName::Ds,
        NoteName::E,
        NoteName::F,
        NoteName::Fs,
        NoteName::G,
        NoteName::Gs,
        NoteName::A,
        NoteName::As,
        NoteName::B,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteName::C => "C",
            NoteName::Cs => "C#",
            NoteName::D => "D",
            NoteName::Ds => "D#",
            NoteName::E => "E",
            NoteName::F => "F",
            NoteName::Fs => "F#",
            NoteName::G => "G",
            NoteName::Gs => "G#",
            NoteName::A => "A",
            NoteName::As => "A#",
            NoteName::B => "B",
        }
    }

    /// Semitone index within the octave (C = 0 .. B = 11).
    pub fn semitone(&self) -> i32 {
        Self::ALL.iter().position(|n| n == self).unwrap_or(0) as i32
    }
}

impl std::fmt::Display for NoteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A frequency mapped onto the nearest equal-tempered pitch.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteReading {
    pub name: NoteName,
    pub octave: i32,
    /// Signed deviation from the named pitch in cents, within [-50, +50].
    pub cents_offset: f32,
}

impl NoteReading {
    /// Sentinel returned for degenerate (non-positive) input frequencies.
    pub const SENTINEL: NoteReading = NoteReading {
        name: NoteName::C,
        octave: 0,
        cents_offset: 0.0,
    };

    /// Equal-tempered frequency of the named pitch (ignoring the cents
    /// offset). Inverse of `frequency_to_note` for exact notes.
    pub fn frequency(&self) -> f32 {
        let semitones_from_a4 =
            self.octave * 12 + self.name.semitone() - A4_SEMITONES_FROM_C0;
        A4_HZ * 2.0_f32.powf(semitones_from_a4 as f32 / 12.0)
    }
}

impl std::fmt::Display for NoteReading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.name, self.octave)
    }
}

/// Map a frequency to the nearest equal-tempered note, A4 = 440 Hz.
///
/// Non-positive input short-circuits to `NoteReading::SENTINEL` rather
/// than feeding `log2` something it cannot take.
pub fn frequency_to_note(freq: f32) -> NoteReading {
    if freq <= 0.0 || !freq.is_finite() {
        return NoteReading::SENTINEL;
    }

    let semitones_from_a4 = 12.0 * (freq / A4_HZ).log2();
    let nearest = semitones_from_a4.round();
    let cents_offset = (semitones_from_a4 - nearest) * 100.0;

    let semitones_from_c0 = nearest as i32 + A4_SEMITONES_FROM_C0;
    let name = NoteName::ALL[semitones_from_c0.rem_euclid(12) as usize];
    let octave = semitones_from_c0.div_euclid(12);

    NoteReading {
        name,
        octave,
        cents_offset,
    }
}
