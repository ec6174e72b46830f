#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Peak and RMS level of one frame, linear full-scale units.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LevelReading {
    pub peak: f32,
    pub rms: f32,
}

impl LevelReading {
    /// RMS level in dBFS. Digital silence reports -inf.
    pub fn rms_dbfs(&self) -> f32 {
        20.0 * self.rms.log10()
    }

    pub fn peak_dbfs(&self) -> f32 {
        20.0 * self.peak.log10()
    }
}

/// Measure one frame. Pure and allocation-free.
pub fn measure(frame: &[f32]) -> LevelReading {
    if frame.is_empty() {
        return LevelReading::default();
    }

    let peak = frame.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
    let rms = (frame.iter().map(|&s| s * s).sum::<f32>() / frame.len() as f32).sqrt();

    LevelReading { peak, rms }
}
