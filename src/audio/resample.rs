// Sample rate conversion using rubato
// Maps the source rate onto the device rate, scaled by playback speed

use anyhow::{Context, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

const CHUNK_FRAMES: usize = 1024;
/// How far playback speed may move from 1.0 in either direction
pub const MAX_SPEED_CHANGE: f64 = 4.0;

pub struct RateConverter {
    resampler: SincFixedIn<f32>,
    base_ratio: f64,
    channels: usize,
    pending: Vec<Vec<f32>>,
}

impl RateConverter {
    /// `channels` is the device channel count; input is remapped to it
    pub fn new(source_rate: u32, output_rate: u32, channels: usize, speed: f64) -> Result<Self> {
        let base_ratio = output_rate as f64 / source_rate as f64;
        let params = SincInterpolationParameters {
            sinc_len: 128,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 128,
            window: WindowFunction::BlackmanHarris2,
        };
        let channels = channels.max(1);
        let resampler = SincFixedIn::<f32>::new(
            base_ratio / clamp_speed(speed),
            MAX_SPEED_CHANGE,
            params,
            CHUNK_FRAMES,
            channels,
        )
        .context("Failed to create resampler")?;

        Ok(Self {
            resampler,
            base_ratio,
            channels,
            pending: vec![Vec::new(); channels],
        })
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        self.resampler
            .set_resample_ratio(self.base_ratio / clamp_speed(speed), true)
            .context("Failed to change playback speed")
    }

    /// Queue interleaved input with `source_channels` channels
    pub fn push(&mut self, interleaved: &[f32], source_channels: usize) {
        let source_channels = source_channels.max(1);
        for frame in interleaved.chunks_exact(source_channels) {
            for (ch, pending) in self.pending.iter_mut().enumerate() {
                let sample = if self.channels == 1 {
                    frame.iter().sum::<f32>() / source_channels as f32
                } else if source_channels == 1 {
                    frame[0]
                } else {
                    frame.get(ch).copied().unwrap_or(0.0)
                };
                pending.push(sample);
            }
        }
    }

    /// Convert every full chunk queued so far into interleaved output
    pub fn drain(&mut self) -> Result<Vec<f32>> {
        let mut out = Vec::new();
        loop {
            let needed = self.resampler.input_frames_next();
            if self.pending[0].len() < needed {
                break;
            }
            let chunk: Vec<Vec<f32>> = self
                .pending
                .iter_mut()
                .map(|p| p.drain(..needed).collect())
                .collect();
            let converted = self
                .resampler
                .process(&chunk, None)
                .context("Resampling failed")?;

            let frames = converted.first().map(Vec::len).unwrap_or(0);
            out.reserve(frames * self.channels);
            for frame in 0..frames {
                for channel in &converted {
                    out.push(channel[frame]);
                }
            }
        }
        Ok(out)
    }

    /// Forget queued input and filter state
    pub fn reset(&mut self) {
        self.resampler.reset();
        for pending in &mut self.pending {
            pending.clear();
        }
    }
}

/// The speed the converter will actually play at
pub fn clamp_speed(speed: f64) -> f64 {
    if speed.is_finite() && speed > 0.0 {
        speed.clamp(1.0 / MAX_SPEED_CHANGE, MAX_SPEED_CHANGE)
    } else {
        1.0
    }
}
