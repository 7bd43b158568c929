use enum_dispatch::enum_dispatch;

use self::{
    backstage::pyrotechnics::{Blink, FontEnumerator, Rainbow, Rotate, Scramble, TeleType, Zoom},
    banner::Banner,
};

pub mod backstage;
pub mod banner;
pub mod definition;
pub mod errors;
pub mod playback;
pub mod scenario;

/// A timed, visible thing done to a banner.
///
/// `play` blocks the calling playback task for the whole duration of the
/// effect and only returns once the effect is over. The caller already owns
/// the banner, so an effect must never try to acquire it; it only paints the
/// banner's [`Marquee`](banner::Marquee).
#[enum_dispatch]
pub trait Effect: Send + Sync {
    fn play(&self, banner: &Banner);
    fn name(&self) -> &str;
}

/// Every effect the programme knows how to put on a banner.
#[enum_dispatch(Effect)]
#[derive(Debug, Clone)]
pub enum Effects {
    TeleType(TeleType),
    Blink(Blink),
    Scramble(Scramble),
    Rainbow(Rainbow),
    Rotate(Rotate),
    Zoom(Zoom),
    FontEnumerator(FontEnumerator),
}
