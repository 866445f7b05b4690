// Audio transport module
// Playback capability trait plus the controller that drives it

pub mod controller;
pub mod playback;
pub mod unavailable;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{check_rate, TransportController, TransportState, TransportView};
pub use playback::{known_duration, Playback, PlaybackEvent, SourceEvent};
pub use unavailable::{UnavailablePlayback, NO_OUTPUT_DEVICE};
