use std::{
    any::Any,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
};

use log::{debug, info, warn};

use super::{
    banner::{Banner, BannerGuard, PlaybackId},
    errors::{Interrupted, PlaybackError},
    scenario::Scenario,
};

/// The hook that drags a playback off the stage. Pulling it is sticky.
#[derive(Debug, Clone, Default)]
pub struct Hook(Arc<AtomicBool>);

impl Hook {
    pub fn pull(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
    pub fn is_pulled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
    pub fn check(&self) -> Result<(), Interrupted> {
        if self.is_pulled() {
            Err(Interrupted)
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every element was played and the settle delay went by.
    Completed { plays: usize },
    /// Interrupted somewhere along the way. Nothing resumes it.
    Abandoned,
}

/// Lets anybody interrupt one playback without owning its [`Playback`].
#[derive(Debug, Clone)]
pub struct Interrupter {
    id: PlaybackId,
    hook: Hook,
    banner: Arc<Banner>,
}

impl Interrupter {
    pub fn id(&self) -> PlaybackId {
        self.id
    }

    pub fn interrupt(&self) {
        debug!("pulling the hook on {}", self.id);
        self.hook.pull();
        self.banner.ring();
    }
}

/// One playback task, as handed back by [`Scenario::play_on`].
/// Dropping it leaves the task running on its own.
#[derive(Debug)]
pub struct Playback {
    interrupter: Interrupter,
    thread: JoinHandle<Outcome>,
}

impl Playback {
    pub(crate) fn spawn(scenario: Scenario, banner: Arc<Banner>) -> Self {
        let id = PlaybackId::new();
        let hook = Hook::default();
        let interrupter = Interrupter {
            id,
            hook: hook.clone(),
            banner: Arc::clone(&banner),
        };
        let thread = thread::spawn(move || perform(id, &scenario, &banner, &hook));
        Self {
            interrupter,
            thread,
        }
    }

    pub fn id(&self) -> PlaybackId {
        self.interrupter.id
    }

    pub fn interrupter(&self) -> Interrupter {
        self.interrupter.clone()
    }

    pub fn interrupt(&self) {
        self.interrupter.interrupt()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    pub fn join(self) -> Result<Outcome, PlaybackError> {
        let id = self.id();
        self.thread
            .join()
            .map_err(|payload| PlaybackError::Panicked(id, panic_message(payload.as_ref())))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_owned()
    }
}

fn perform(id: PlaybackId, scenario: &Scenario, banner: &Banner, hook: &Hook) -> Outcome {
    let mut guard = match banner.acquire(id, hook) {
        Ok(guard) => guard,
        Err(Interrupted) => {
            info!("{} interrupted before it got {}", id, banner.name());
            return Outcome::Abandoned;
        }
    };

    let played = run(id, scenario, &mut guard, hook);
    drop(guard);

    match played {
        Ok(plays) => {
            info!("{} done with {} after {} plays", id, banner.name(), plays);
            Outcome::Completed { plays }
        }
        Err(Interrupted) => {
            warn!("{} abandoned on {}", id, banner.name());
            Outcome::Abandoned
        }
    }
}

fn run(
    id: PlaybackId,
    scenario: &Scenario,
    guard: &mut BannerGuard<'_>,
    hook: &Hook,
) -> Result<usize, Interrupted> {
    let banner = guard.banner();
    guard.wait_until(hook, || !scenario.is_empty())?;

    let program = scenario.elements();
    let mut plays = 0;
    for element in &program {
        debug!(
            "{} playing {} x{} on {}",
            id,
            element.effect().name(),
            element.repeats(),
            banner.name()
        );
        for _ in 0..element.repeats() {
            hook.check()?;
            element.effect().play(banner);
            plays += 1;
        }
    }

    debug!("{} settling {} for {:?}", id, banner.name(), scenario.settle());
    guard.hold_for(scenario.settle(), hook)?;
    Ok(plays)
}
