// Audio output using cpal
// Pushes interleaved samples to the default device through a ring buffer

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Stream, StreamConfig};
use parking_lot::Mutex;
use ringbuf::{HeapRb, traits::{Consumer, Observer, Producer, Split}};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const RING_BUFFER_SIZE: usize = 48000 * 2 / 4; // ~250ms of stereo audio at 48kHz

type RingProducer = ringbuf::HeapProd<f32>;
type RingConsumer = ringbuf::HeapCons<f32>;

pub struct AudioOutput {
    _stream: Stream,
    producer: Arc<Mutex<RingProducer>>,
    sample_rate: u32,
    channels: u16,
    paused: Arc<AtomicBool>,
    clear_flag: Arc<AtomicBool>,
}

impl AudioOutput {
    /// Open the default output device. Starts paused.
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("No output device available"))?;

        let config = device
            .default_output_config()
            .context("Failed to get default output config")?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels();

        let rb = HeapRb::<f32>::new(RING_BUFFER_SIZE);
        let (producer, consumer) = rb.split();
        let producer = Arc::new(Mutex::new(producer));
        let consumer = Arc::new(Mutex::new(consumer));

        let paused = Arc::new(AtomicBool::new(true));
        let clear_flag = Arc::new(AtomicBool::new(false));

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => Self::build_stream::<f32>(
                &device,
                &config.into(),
                consumer,
                paused.clone(),
                clear_flag.clone(),
            )?,
            cpal::SampleFormat::I16 => Self::build_stream::<i16>(
                &device,
                &config.into(),
                consumer,
                paused.clone(),
                clear_flag.clone(),
            )?,
            cpal::SampleFormat::U16 => Self::build_stream::<u16>(
                &device,
                &config.into(),
                consumer,
                paused.clone(),
                clear_flag.clone(),
            )?,
            format => return Err(anyhow!("Unsupported sample format: {:?}", format)),
        };

        stream.play().context("Failed to start output stream")?;

        log::info!("[Audio] Output {} Hz, {} channels", sample_rate, channels);

        Ok(Self {
            _stream: stream,
            producer,
            sample_rate,
            channels,
            paused,
            clear_flag,
        })
    }

    fn build_stream<T: cpal::SizedSample + cpal::FromSample<f32>>(
        device: &cpal::Device,
        config: &StreamConfig,
        consumer: Arc<Mutex<RingConsumer>>,
        paused: Arc<AtomicBool>,
        clear_flag: Arc<AtomicBool>,
    ) -> Result<Stream> {
        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    let mut consumer = consumer.lock();

                    if clear_flag.swap(false, Ordering::SeqCst) {
                        while consumer.try_pop().is_some() {}
                    }

                    // Paused: hold buffered samples, play silence
                    if paused.load(Ordering::SeqCst) {
                        for sample in data.iter_mut() {
                            *sample = T::from_sample(0.0f32);
                        }
                        return;
                    }

                    for sample in data.iter_mut() {
                        let value = consumer.try_pop().unwrap_or(0.0);
                        *sample = T::from_sample(value);
                    }
                },
                move |err| {
                    log::error!("[Audio] Output stream error: {}", err);
                },
                None,
            )
            .context("Failed to build output stream")?;

        Ok(stream)
    }

    /// Write samples to the output buffer.
    /// Returns the number of samples actually written.
    pub fn write(&self, samples: &[f32]) -> usize {
        let mut producer = self.producer.lock();
        let mut written = 0;

        for &sample in samples {
            if producer.try_push(sample).is_ok() {
                written += 1;
            } else {
                break;
            }
        }

        written
    }

    /// Write samples, waiting for room as the device drains the buffer.
    /// Gives up if the device stops draining (e.g. while paused).
    pub fn write_blocking(&self, samples: &[f32]) {
        let mut remaining = samples;
        let mut stalled = 0;

        while !remaining.is_empty() && stalled < 500 {
            let written = self.write(remaining);
            if written > 0 {
                remaining = &remaining[written..];
                stalled = 0;
            } else {
                stalled += 1;
                std::thread::sleep(std::time::Duration::from_millis(1));
            }
        }
    }

    pub fn available_space(&self) -> usize {
        self.producer.lock().vacant_len()
    }

    /// Seconds of audio queued but not yet played
    pub fn buffered_seconds(&self) -> f64 {
        let queued = RING_BUFFER_SIZE.saturating_sub(self.available_space());
        queued as f64 / (self.sample_rate as f64 * self.channels as f64)
    }

    /// Drop everything queued (after a seek or a new source)
    pub fn clear(&self) {
        self.clear_flag.store(true, Ordering::SeqCst);
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}
