// Native playback engine
//
// `NativePlayer` is the handle the transport talks to. All decoding and
// output happens on a dedicated engine thread; the handle only sends
// commands and reads a shared snapshot.
use anyhow::{anyhow, Context, Result};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::transport::{Playback, PlaybackEvent, SourceEvent};

use super::decoder::AudioDecoder;
use super::output::AudioOutput;
use super::resample::{clamp_speed, RateConverter};

/// Position ticks, roughly what a media element reports
const TICK_INTERVAL: Duration = Duration::from_millis(250);
/// Decode more once this many output samples are free
const REFILL_THRESHOLD: usize = 4096;

enum Command {
    Load(PathBuf, u64),
    Play,
    Pause,
    Seek(f64),
    Rate(f64),
    Loop(bool),
    Shutdown,
}

struct Shared {
    paused: bool,
    position: f64,
    duration: Option<f64>,
}

impl Default for Shared {
    fn default() -> Self {
        Self {
            paused: true,
            position: 0.0,
            duration: None,
        }
    }
}

pub struct NativePlayer {
    commands: Sender<Command>,
    shared: Arc<Mutex<Shared>>,
    engine: Option<JoinHandle<()>>,
}

impl NativePlayer {
    /// Start the engine thread. Events are delivered on `events`.
    pub fn new(events: Sender<SourceEvent>) -> Result<Self> {
        let shared = Arc::new(Mutex::new(Shared::default()));
        let (commands, receiver) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();

        let engine_shared = shared.clone();
        let engine = thread::Builder::new()
            .name("listenup-audio".to_string())
            .spawn(move || {
                // cpal streams are not Send, so the output is opened here
                let output = match AudioOutput::new() {
                    Ok(output) => {
                        let _ = ready_tx.send(Ok(()));
                        output
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(format!("{:#}", e)));
                        return;
                    }
                };
                Engine::new(output, engine_shared, events).run(receiver);
            })
            .context("Failed to spawn audio thread")?;

        ready_rx
            .recv()
            .map_err(|_| anyhow!("Audio thread exited during startup"))?
            .map_err(|e| anyhow!(e))?;

        Ok(Self {
            commands,
            shared,
            engine: Some(engine),
        })
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            log::warn!("[Audio] Engine thread is gone, command dropped");
        }
    }
}

impl Drop for NativePlayer {
    fn drop(&mut self) {
        self.send(Command::Shutdown);
        if let Some(engine) = self.engine.take() {
            let _ = engine.join();
        }
    }
}

impl Playback for NativePlayer {
    fn load(&mut self, source: &Path, generation: u64) {
        *self.shared.lock() = Shared::default();
        self.send(Command::Load(source.to_path_buf(), generation));
    }

    fn play(&mut self) {
        self.shared.lock().paused = false;
        self.send(Command::Play);
    }

    fn pause(&mut self) {
        self.shared.lock().paused = true;
        self.send(Command::Pause);
    }

    fn is_paused(&self) -> bool {
        self.shared.lock().paused
    }

    fn current_time(&self) -> f64 {
        self.shared.lock().position
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.shared.lock().position = seconds;
        self.send(Command::Seek(seconds));
    }

    fn duration(&self) -> Option<f64> {
        self.shared.lock().duration
    }

    fn set_playback_rate(&mut self, rate: f64) -> f64 {
        let applied = clamp_speed(rate);
        self.send(Command::Rate(applied));
        applied
    }

    fn set_loop(&mut self, enabled: bool) {
        self.send(Command::Loop(enabled));
    }
}

struct Track {
    decoder: AudioDecoder,
    converter: RateConverter,
    /// Timestamp of the last decoded chunk
    decoded_to: f64,
}

struct Engine {
    output: AudioOutput,
    shared: Arc<Mutex<Shared>>,
    events: Sender<SourceEvent>,
    /// Load the current track belongs to
    generation: u64,
    track: Option<Track>,
    playing: bool,
    looping: bool,
    speed: f64,
    last_tick: Instant,
}

impl Engine {
    fn new(output: AudioOutput, shared: Arc<Mutex<Shared>>, events: Sender<SourceEvent>) -> Self {
        Self {
            output,
            shared,
            events,
            generation: 0,
            track: None,
            playing: false,
            looping: false,
            speed: 1.0,
            last_tick: Instant::now(),
        }
    }

    fn run(mut self, commands: Receiver<Command>) {
        loop {
            let command = if self.playing {
                match commands.try_recv() {
                    Ok(command) => Some(command),
                    Err(TryRecvError::Empty) => None,
                    Err(TryRecvError::Disconnected) => return,
                }
            } else {
                match commands.recv() {
                    Ok(command) => Some(command),
                    Err(_) => return,
                }
            };

            match command {
                Some(Command::Shutdown) => return,
                Some(command) => self.handle(command),
                None => self.pump(),
            }
        }
    }

    fn emit(&self, event: PlaybackEvent) {
        let _ = self.events.send(SourceEvent::new(self.generation, event));
    }

    fn stop(&mut self) {
        self.playing = false;
        self.shared.lock().paused = true;
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Load(path, generation) => {
                self.generation = generation;
                self.load(&path);
            }
            Command::Play => {
                if self.track.is_some() {
                    self.playing = true;
                    self.output.set_paused(false);
                    self.last_tick = Instant::now();
                } else {
                    self.stop();
                }
            }
            Command::Pause => {
                self.playing = false;
                self.output.set_paused(true);
            }
            Command::Seek(position) => self.seek(position),
            Command::Rate(rate) => {
                self.speed = rate;
                if let Some(track) = self.track.as_mut() {
                    if let Err(e) = track.converter.set_speed(rate) {
                        log::warn!("[Audio] {:#}", e);
                    }
                }
            }
            Command::Loop(enabled) => self.looping = enabled,
            Command::Shutdown => {}
        }
    }

    fn load(&mut self, path: &Path) {
        self.stop();
        self.output.set_paused(true);
        self.output.clear();
        self.track = None;

        let opened = AudioDecoder::open(path).and_then(|decoder| {
            let converter = RateConverter::new(
                decoder.sample_rate(),
                self.output.sample_rate(),
                self.output.channels() as usize,
                self.speed,
            )?;
            Ok(Track {
                decoder,
                converter,
                decoded_to: 0.0,
            })
        });

        match opened {
            Ok(track) => {
                let duration = track.decoder.duration();
                log::info!("[Audio] Loaded {:?} ({:?}s)", path, duration);
                self.shared.lock().duration = duration;
                self.track = Some(track);
                self.emit(PlaybackEvent::MetadataReady(duration));
            }
            Err(e) => {
                log::warn!("[Audio] Failed to load {:?}: {:#}", path, e);
                self.emit(PlaybackEvent::LoadError(format!("{:#}", e)));
            }
        }
    }

    fn seek(&mut self, position: f64) {
        let Some(track) = self.track.as_mut() else {
            return;
        };
        match track.decoder.seek(position) {
            Ok(landed) => {
                track.converter.reset();
                track.decoded_to = landed;
                self.output.clear();
                self.shared.lock().position = landed;
            }
            Err(e) => log::warn!("[Audio] {:#}", e),
        }
    }

    /// Audible position: decoded position minus what is still queued
    fn audible_position(&self) -> f64 {
        let Some(track) = self.track.as_ref() else {
            return 0.0;
        };
        (track.decoded_to - self.output.buffered_seconds() * self.speed).max(0.0)
    }

    fn pump(&mut self) {
        if self.output.available_space() < REFILL_THRESHOLD {
            thread::sleep(Duration::from_millis(5));
            self.tick();
            return;
        }

        let Some(track) = self.track.as_mut() else {
            self.stop();
            return;
        };

        match track.decoder.decode_next() {
            Ok(Some(chunk)) => {
                track.decoded_to = chunk.timestamp;
                track.converter.push(&chunk.samples, track.decoder.channels());
                match track.converter.drain() {
                    Ok(samples) => self.output.write_blocking(&samples),
                    Err(e) => log::warn!("[Audio] {:#}", e),
                }
                self.tick();
            }
            Ok(None) => self.finished(),
            Err(e) => {
                log::warn!("[Audio] {:#}", e);
                self.stop();
                self.emit(PlaybackEvent::LoadError(format!("{:#}", e)));
            }
        }
    }

    fn finished(&mut self) {
        if self.looping {
            self.seek(0.0);
            return;
        }
        let end = self
            .track
            .as_ref()
            .and_then(|t| t.decoder.duration())
            .unwrap_or_else(|| self.audible_position());
        self.stop();
        self.shared.lock().position = end;
        self.emit(PlaybackEvent::Ended);
    }

    fn tick(&mut self) {
        if self.last_tick.elapsed() < TICK_INTERVAL {
            return;
        }
        self.last_tick = Instant::now();
        let position = self.audible_position();
        self.shared.lock().position = position;
        self.emit(PlaybackEvent::Position(position));
    }
}
