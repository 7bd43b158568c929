use std::{
    fmt,
    sync::{Arc, Weak},
    time::Duration,
};

use log::debug;
use parking_lot::{Mutex, RwLock};

use super::{banner::Banner, playback::Playback, Effect};

/// How long a banner stays put after a scenario is done with it.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(1000);

/// One effect and how many times in a row it plays.
#[derive(Clone)]
pub struct ScenarioElement {
    effect: Arc<dyn Effect>,
    repeats: u32,
}

impl ScenarioElement {
    pub fn new(effect: Arc<dyn Effect>, repeats: u32) -> Self {
        Self { effect, repeats }
    }
    pub fn effect(&self) -> &Arc<dyn Effect> {
        &self.effect
    }
    pub fn repeats(&self) -> u32 {
        self.repeats
    }
}

impl fmt::Debug for ScenarioElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioElement")
            .field("effect", &self.effect.name())
            .field("repeats", &self.repeats)
            .finish()
    }
}

#[derive(Default)]
struct Repertoire {
    elements: RwLock<Vec<ScenarioElement>>,
    // every banner this scenario was ever sent to, for readiness signals
    audience: Mutex<Vec<Weak<Banner>>>,
}

/// An ordered list of effects that knows how to play itself on a banner.
///
/// Clones share the same list. A playback reads the list once, the moment it
/// starts going through it; elements added after that only show up in later
/// playbacks. Adding an element signals every banner the scenario has been
/// played on, so a playback waiting on an empty scenario wakes up.
#[derive(Clone)]
pub struct Scenario {
    repertoire: Arc<Repertoire>,
    settle: Duration,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario {
    pub fn new() -> Self {
        Self {
            repertoire: Arc::default(),
            settle: DEFAULT_SETTLE,
        }
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn settle(&self) -> Duration {
        self.settle
    }

    pub fn add_effect(&self, effect: impl Effect + 'static, repeats: u32) {
        self.add_shared_effect(Arc::new(effect), repeats)
    }

    /// Like [`Scenario::add_effect`], for an effect that is also used elsewhere.
    pub fn add_shared_effect(&self, effect: Arc<dyn Effect>, repeats: u32) {
        debug!("adding {} x{}", effect.name(), repeats);
        self.repertoire
            .elements
            .write()
            .push(ScenarioElement::new(effect, repeats));

        let audience = self.audience();
        for banner in audience {
            banner.signal_all();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.repertoire.elements.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.repertoire.elements.read().len()
    }

    /// A copy of the elements as they are right now.
    pub fn elements(&self) -> Vec<ScenarioElement> {
        self.repertoire.elements.read().clone()
    }

    /// Play this scenario on `banner` from a task of its own.
    ///
    /// Returns straight away. The task waits for the banner, waits for the
    /// scenario to have something in it, plays every element in order, keeps
    /// the banner through the settle delay, then hands it back.
    pub fn play_on(&self, banner: &Arc<Banner>) -> Playback {
        self.seat(banner);
        let playback = Playback::spawn(self.clone(), Arc::clone(banner));
        debug!("{} scheduled on {}", playback.id(), banner.name());
        playback
    }

    fn seat(&self, banner: &Arc<Banner>) {
        let mut audience = self.repertoire.audience.lock();
        audience.retain(|seated| seated.strong_count() > 0);
        let seated = audience
            .iter()
            .any(|seated| std::ptr::eq(seated.as_ptr(), Arc::as_ptr(banner)));
        if !seated {
            audience.push(Arc::downgrade(banner));
        }
    }

    fn audience(&self) -> Vec<Arc<Banner>> {
        self.repertoire
            .audience
            .lock()
            .iter()
            .filter_map(Weak::upgrade)
            .collect()
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("elements", &*self.repertoire.elements.read())
            .field("settle", &self.settle)
            .finish()
    }
}
