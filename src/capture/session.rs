use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, Producer, RingBuffer};

use super::CaptureError;
use crate::MAX_FRAME_SIZE;

/// Capture-side parameters.
#[derive(Debug, Clone, Copy)]
pub struct CaptureConfig {
    /// Analysis frame length in samples (1024-4096 is the useful band).
    pub frame_size: usize,
    /// Ring capacity between the device callback and the consumer,
    /// counted in frames. Overflow drops samples, never blocks.
    pub ring_frames: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            frame_size: 2048,
            ring_frames: 16,
        }
    }
}

/// One live microphone stream and everything needed to tear it down.
///
/// The session is the sole owner of the device handle. `close` stops the
/// stream synchronously and is idempotent; dropping the session closes it
/// too, so every exit path releases the hardware.
pub struct CaptureSession {
    stream: Option<cpal::Stream>,
    sample_rate: f32,
    failed: Arc<AtomicBool>,
}

impl CaptureSession {
    /// Open the default input device and start streaming.
    ///
    /// Fails fast - a denied permission or missing device is returned to
    /// the caller, who decides whether to re-prompt or retry.
    pub fn open(config: CaptureConfig) -> Result<(CaptureSession, FrameReceiver), CaptureError> {
        let frame_size = config.frame_size.clamp(256, MAX_FRAME_SIZE);

        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(CaptureError::NoInputDevice)?;
        let supported = device.default_input_config()?;

        let sample_rate = supported.sample_rate().0 as f32;
        let channels = supported.channels() as usize;
        let stream_config: cpal::StreamConfig = supported.config();

        let (tx, rx) = RingBuffer::<f32>::new(frame_size * config.ring_frames.max(2));
        let dropped = Arc::new(AtomicU64::new(0));
        let failed = Arc::new(AtomicBool::new(false));

        let err_flag = failed.clone();
        let err_fn = move |err: cpal::StreamError| {
            log::error!("input stream error: {err}");
            err_flag.store(true, Ordering::Relaxed);
        };

        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &stream_config, channels, tx, dropped.clone(), err_fn)?
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &stream_config, channels, tx, dropped.clone(), err_fn)?
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &stream_config, channels, tx, dropped.clone(), err_fn)?
            }
            format => return Err(CaptureError::UnsupportedFormat(format.to_string())),
        };

        stream.play()?;

        let session = CaptureSession {
            stream: Some(stream),
            sample_rate,
            failed,
        };
        let receiver = FrameReceiver {
            rx,
            frame: vec![0.0; frame_size],
            filled: 0,
            dropped,
        };

        Ok((session, receiver))
    }

    /// Native sample rate of the captured stream, Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Whether the stream reported an asynchronous error (device unplugged
    /// mid-session). A failed session only yields what was already rung.
    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::Relaxed)
    }

    /// Stop the stream and release the device. Idempotent.
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            drop(stream);
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Consumer half: drains the ring on the caller's thread and assembles
/// fixed-size frames for the estimator.
pub struct FrameReceiver {
    rx: Consumer<f32>,
    frame: Vec<f32>,
    filled: usize,
    dropped: Arc<AtomicU64>,
}

impl FrameReceiver {
    pub fn frame_size(&self) -> usize {
        self.frame.len()
    }

    /// Samples the device callback had to discard because the consumer
    /// fell behind.
    pub fn dropped_samples(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// The most recently assembled frame. Stale until the first full
    /// `poll_frame`, and progressively overwritten while the next frame
    /// fills; read it right after a successful poll (visualization only).
    pub fn last_frame(&self) -> &[f32] {
        &self.frame
    }

    /// Pull pending samples; returns one full frame when available.
    ///
    /// Partial fills carry over, so calling this once per UI tick yields
    /// frames at the natural rate of `sample_rate / frame_size`.
    pub fn poll_frame(&mut self) -> Option<&[f32]> {
        while self.filled < self.frame.len() {
            match self.rx.pop() {
                Ok(sample) => {
                    self.frame[self.filled] = sample;
                    self.filled += 1;
                }
                Err(_) => return None,
            }
        }

        self.filled = 0;
        Some(&self.frame)
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    mut tx: Producer<f32>,
    dropped: Arc<AtomicU64>,
    err_fn: impl FnMut(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, CaptureError>
where
    T: cpal::SizedSample,
    f32: cpal::FromSample<T>,
{
    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            // Downmix interleaved channels to mono and push. On overflow
            // drop the remainder of this callback - the device thread
            // never blocks on the consumer.
            let total = data.len() / channels;
            for (i, frame) in data.chunks_exact(channels).enumerate() {
                let mono = frame
                    .iter()
                    .fold(0.0f32, |acc, &s| acc + s.to_sample::<f32>())
                    / channels as f32;
                if tx.push(mono).is_err() {
                    dropped.fetch_add((total - i) as u64, Ordering::Relaxed);
                    break;
                }
            }
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}
