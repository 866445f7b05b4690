// Audio decoder using Symphonia
// Decodes lesson audio to interleaved f32 PCM with timestamps

use anyhow::{anyhow, Context, Result};
use symphonia::core::audio::{AudioBufferRef, AudioPlanes, Signal};
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;
use symphonia::core::units::{Time, TimeBase};
use std::fs::File;
use std::path::Path;

/// One decoded packet
pub struct DecodedChunk {
    pub samples: Vec<f32>,
    /// Start of the chunk in seconds
    pub timestamp: f64,
}

pub struct AudioDecoder {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    sample_rate: u32,
    channels: usize,
    time_base: Option<TimeBase>,
    duration: Option<f64>,
}

impl AudioDecoder {
    /// Open an audio file and prepare for decoding
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .context("Failed to probe audio format")?;

        let format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| anyhow!("No audio track found in {:?}", path))?;

        let track_id = track.id;
        let sample_rate = track.codec_params.sample_rate.unwrap_or(44100);
        let channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(2);
        let time_base = track.codec_params.time_base;

        let duration = match (track.codec_params.n_frames, time_base) {
            (Some(frames), Some(tb)) => Some(seconds(tb.calc_time(frames))),
            (Some(frames), None) => Some(frames as f64 / sample_rate as f64),
            _ => None,
        };

        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .context("Failed to create decoder")?;

        Ok(Self {
            format,
            decoder,
            track_id,
            sample_rate,
            channels,
            time_base,
            duration,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Track length in seconds, if the container reports it
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn timestamp(&self, ts: u64) -> f64 {
        match self.time_base {
            Some(tb) => seconds(tb.calc_time(ts)),
            None => ts as f64 / self.sample_rate as f64,
        }
    }

    /// Decode the next packet. `None` at end of stream.
    pub fn decode_next(&mut self) -> Result<Option<DecodedChunk>> {
        loop {
            let packet = match self.format.next_packet() {
                Ok(p) => p,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    return Ok(None);
                }
                Err(SymphoniaError::ResetRequired) => {
                    self.decoder.reset();
                    continue;
                }
                Err(e) => return Err(anyhow!("Failed to read packet: {}", e)),
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let timestamp = self.timestamp(packet.ts());
            match self.decoder.decode(&packet) {
                Ok(decoded) => {
                    return Ok(Some(DecodedChunk {
                        samples: audio_buf_to_f32(&decoded),
                        timestamp,
                    }));
                }
                Err(SymphoniaError::DecodeError(e)) => {
                    log::debug!("[Audio] Decode error (skipping packet): {}", e);
                    continue;
                }
                Err(e) => return Err(anyhow!("Decode failed: {}", e)),
            }
        }
    }

    /// Seek to `position` seconds. Returns where the decoder actually landed.
    pub fn seek(&mut self, position: f64) -> Result<f64> {
        let position = position.max(0.0);
        let time = Time::new(position.trunc() as u64, position.fract());

        let seeked_to = self
            .format
            .seek(
                SeekMode::Accurate,
                SeekTo::Time {
                    time,
                    track_id: Some(self.track_id),
                },
            )
            .context("Seek failed")?;

        self.decoder.reset();
        Ok(self.timestamp(seeked_to.actual_ts))
    }
}

fn seconds(time: Time) -> f64 {
    time.seconds as f64 + time.frac
}

/// Convert any AudioBufferRef to interleaved f32 samples
fn audio_buf_to_f32(buf: &AudioBufferRef) -> Vec<f32> {
    match buf {
        AudioBufferRef::F32(b) => interleave(b.planes(), b.frames(), |s: f32| s),
        AudioBufferRef::F64(b) => interleave(b.planes(), b.frames(), |s: f64| s as f32),
        AudioBufferRef::S8(b) => interleave(b.planes(), b.frames(), |s: i8| s as f32 / 128.0),
        AudioBufferRef::S16(b) => interleave(b.planes(), b.frames(), |s: i16| s as f32 / 32768.0),
        AudioBufferRef::S24(b) => {
            interleave(b.planes(), b.frames(), |s| s.inner() as f32 / 8388608.0)
        }
        AudioBufferRef::S32(b) => {
            interleave(b.planes(), b.frames(), |s: i32| s as f32 / 2147483648.0)
        }
        AudioBufferRef::U8(b) => {
            interleave(b.planes(), b.frames(), |s: u8| (s as f32 - 128.0) / 128.0)
        }
        AudioBufferRef::U16(b) => {
            interleave(b.planes(), b.frames(), |s: u16| (s as f32 - 32768.0) / 32768.0)
        }
        AudioBufferRef::U24(b) => interleave(b.planes(), b.frames(), |s| {
            (s.inner() as f32 - 8388608.0) / 8388608.0
        }),
        AudioBufferRef::U32(b) => interleave(b.planes(), b.frames(), |s: u32| {
            ((s as f64 - 2147483648.0) / 2147483648.0) as f32
        }),
    }
}

fn interleave<T: Sample + Copy, F: Fn(T) -> f32>(
    planes: AudioPlanes<T>,
    frames: usize,
    convert: F,
) -> Vec<f32> {
    let channels = planes.planes();
    if channels.is_empty() || frames == 0 {
        return vec![];
    }

    let mut interleaved = Vec::with_capacity(frames * channels.len());
    for frame in 0..frames {
        for plane in channels.iter() {
            interleaved.push(convert(plane[frame]));
        }
    }
    interleaved
}
