use thiserror::Error;

use super::banner::PlaybackId;

/// Raised out of every suspension point of a playback task once its hook has
/// been pulled. Never leaves the task: it turns into [`Outcome::Abandoned`].
///
/// [`Outcome::Abandoned`]: super::playback::Outcome::Abandoned
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("playback was interrupted")]
pub struct Interrupted;

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("playback {0} panicked: {1}")]
    Panicked(PlaybackId, String),
}
