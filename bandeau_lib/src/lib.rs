pub mod the_great_mind_palace_of_theatrical_arts;
// the reexports are here so the binary doesn't have to care about versions

pub use enum_dispatch;
pub use log;
pub use parking_lot;
pub use the_great_mind_palace_of_theatrical_arts as theater;
pub use uuid;

pub use theater::play::{
    banner::{Banner, Marquee, PlaybackId},
    errors::{Interrupted, PlaybackError},
    playback::{Hook, Interrupter, Outcome, Playback},
    scenario::{Scenario, ScenarioElement, DEFAULT_SETTLE},
    Effect, Effects,
};
