//! Log-frequency spectrum panel fed by the analysis frames.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

// The voice lives well below 5 kHz; showing more just compresses the
// interesting part of the axis.
const MIN_HZ: f64 = 40.0;
const MAX_HZ: f64 = 5_000.0;

pub struct Spectrum {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    // (frequency, dBFS) per displayed bin.
    points: Vec<(f64, f64)>,
    bin_for_point: Vec<usize>,
}

impl Spectrum {
    pub fn new(frame_size: usize, sample_rate: f32, num_points: usize) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(frame_size);

        let window: Vec<f32> = (0..frame_size)
            .map(|i| {
                let x = i as f32 / (frame_size.max(2) - 1) as f32;
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * x).cos())
            })
            .collect();

        // Log-spaced display frequencies mapped onto FFT bins.
        let nyquist = (sample_rate as f64 / 2.0).max(MIN_HZ + 1.0);
        let top = MAX_HZ.min(nyquist);
        let half = (frame_size / 2).max(1);
        let mut points = Vec::with_capacity(num_points);
        let mut bin_for_point = Vec::with_capacity(num_points);
        for i in 0..num_points {
            let t = i as f64 / (num_points.max(2) - 1) as f64;
            let freq = MIN_HZ * (top / MIN_HZ).powf(t);
            let bin = ((freq * frame_size as f64 / sample_rate as f64).round() as usize)
                .min(half - 1);
            points.push((freq, -90.0));
            bin_for_point.push(bin);
        }

        Self {
            fft,
            window,
            scratch: vec![Complex::new(0.0, 0.0); frame_size],
            points,
            bin_for_point,
        }
    }

    /// Recompute the displayed spectrum from one analysis frame.
    pub fn update(&mut self, frame: &[f32]) {
        if frame.len() != self.window.len() {
            return;
        }

        for (slot, (&sample, &w)) in self
            .scratch
            .iter_mut()
            .zip(frame.iter().zip(self.window.iter()))
        {
            slot.re = sample * w;
            slot.im = 0.0;
        }
        self.fft.process(&mut self.scratch);

        let scale = (self.window.len() as f64 / 2.0).powi(2);
        for (point, &bin) in self.points.iter_mut().zip(self.bin_for_point.iter()) {
            let c = self.scratch[bin];
            let power = f64::from(c.re * c.re + c.im * c.im) / scale;
            point.1 = (10.0 * power.max(1e-12).log10()).max(-90.0);
        }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }
}
