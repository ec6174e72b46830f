pub mod analysis; // Pitch estimation, note mapping, history statistics
#[cfg(feature = "rtrb")]
pub mod capture; // Microphone capture sessions
#[cfg(feature = "rtrb")]
pub mod tracker; // Capture -> estimate -> map -> history pipeline

pub const MAX_FRAME_SIZE: usize = 4096;
pub(crate) const A4_HZ: f32 = 440.0;
pub(crate) const MIN_FREQ_FLOOR: f32 = 20.0;
