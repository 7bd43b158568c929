//! The banner: one simulated display and the lock every scenario fights over.
//!
//! Ownership of a banner is logical. The stage mutex is only held for the few
//! instructions it takes to look at or change who owns the banner, so an owner
//! can run effects and sit through its settle delay without keeping the mutex.
//! Everything else blocks on the bell (a condition variable) until it is its
//! turn.
//!
//! Hand-over is first come, first served: acquirers queue up by
//! [`PlaybackId`] and only the head of the queue may take a free banner.
//!
//! The owner is also pinned to the thread that took the banner, so an effect
//! acquiring the banner it is being played on gets a nested guard instead of
//! queueing up behind its own playback.
use std::{
    collections::VecDeque,
    fmt,
    sync::Arc,
    thread::{self, ThreadId},
    time::{Duration, Instant},
};

use log::{debug, trace};
use parking_lot::{Condvar, Mutex, MutexGuard};
use uuid::Uuid;

use super::{errors::Interrupted, playback::Hook};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaybackId(Uuid);

impl PlaybackId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlaybackId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlaybackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0.as_fields().0)
    }
}

/// What a banner currently shows. Only effects write to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Marquee {
    pub text: String,
    pub color: [u8; 3],
    pub visible: bool,
    /// degrees, clockwise
    pub rotation: f32,
    pub font: String,
    pub font_size: u16,
}

impl Default for Marquee {
    fn default() -> Self {
        Self {
            text: String::new(),
            color: [0xff, 0xff, 0xff],
            visible: true,
            rotation: 0.0,
            font: "Monospaced".to_owned(),
            font_size: 32,
        }
    }
}

impl fmt::Display for Marquee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.visible {
            return write!(f, "[ ]");
        }
        let [r, g, b] = self.color;
        write!(
            f,
            "[{}] #{:02x}{:02x}{:02x} {} {}pt {:.0}°",
            self.text, r, g, b, self.font, self.font_size, self.rotation
        )
    }
}

#[derive(Debug, Default)]
struct Stage {
    holder: Option<PlaybackId>,
    // the thread `holder` took the banner on
    owner: Option<ThreadId>,
    queue: VecDeque<PlaybackId>,
    // bumped by every readiness signal
    generation: u64,
}

impl Stage {
    fn is_turn_of(&self, id: PlaybackId) -> bool {
        self.holder.is_none() && self.queue.front() == Some(&id)
    }
    fn leave_queue(&mut self, id: PlaybackId) {
        self.queue.retain(|queued| *queued != id);
    }
    fn hand_back(&mut self, id: PlaybackId) {
        if self.holder == Some(id) {
            self.holder = None;
            self.owner = None;
        }
    }
    /// The owner, if the calling thread is the one holding the banner.
    fn held_here(&self) -> Option<PlaybackId> {
        match self.owner {
            Some(owner) if owner == thread::current().id() => self.holder,
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Banner {
    name: String,
    stage: Mutex<Stage>,
    bell: Condvar,
    face: Mutex<Marquee>,
}

impl Banner {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            stage: Mutex::new(Stage::default()),
            bell: Condvar::new(),
            face: Mutex::new(Marquee::default()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn marquee(&self) -> Marquee {
        self.face.lock().clone()
    }

    pub fn paint(&self, brush: impl FnOnce(&mut Marquee)) {
        let mut face = self.face.lock();
        brush(&mut face);
        trace!("{} {}", self.name, *face);
    }

    /// Who owns the banner right now. Stale as soon as it returns.
    pub fn holder(&self) -> Option<PlaybackId> {
        self.stage.lock().holder
    }

    /// How many playbacks are lined up to take the banner.
    pub fn queued(&self) -> usize {
        self.stage.lock().queue.len()
    }

    /// Wake everything waiting for this banner to become ready.
    pub fn signal_all(&self) {
        let mut stage = self.stage.lock();
        stage.generation = stage.generation.wrapping_add(1);
        self.bell.notify_all();
    }

    /// Wake all waiters without signalling readiness, so they look at their hooks.
    pub(crate) fn ring(&self) {
        let _stage = self.stage.lock();
        self.bell.notify_all();
    }

    /// Block until `id` owns the banner.
    ///
    /// Asking again with the id of the current owner, or from the thread that
    /// owns the banner, succeeds straight away and hands out a nested guard
    /// that gives nothing back when dropped.
    pub fn acquire(&self, id: PlaybackId, hook: &Hook) -> Result<BannerGuard<'_>, Interrupted> {
        let mut stage = self.stage.lock();
        let owner = stage.held_here().or(stage.holder.filter(|holder| *holder == id));
        if let Some(owner) = owner {
            return Ok(BannerGuard {
                banner: self,
                id: owner,
                nested: true,
            });
        }
        stage.queue.push_back(id);
        debug!(
            "{} queued on {} behind {} other(s)",
            id,
            self.name,
            stage.queue.len() - 1
        );
        self.await_turn(&mut stage, id, hook)?;
        debug!("{} took {}", id, self.name);
        Ok(BannerGuard {
            banner: self,
            id,
            nested: false,
        })
    }

    // `id` must already be queued
    fn await_turn(
        &self,
        stage: &mut MutexGuard<'_, Stage>,
        id: PlaybackId,
        hook: &Hook,
    ) -> Result<(), Interrupted> {
        loop {
            if hook.is_pulled() {
                stage.leave_queue(id);
                // whoever is behind us may be at the front now
                self.bell.notify_all();
                return Err(Interrupted);
            }
            if stage.is_turn_of(id) {
                stage.queue.pop_front();
                stage.holder = Some(id);
                stage.owner = Some(thread::current().id());
                return Ok(());
            }
            self.bell.wait(stage);
        }
    }
}

/// Ownership of a banner. Dropping it signals every waiter and gives the
/// banner back, however the owner got there.
#[must_use = "the banner is released as soon as the guard is dropped"]
pub struct BannerGuard<'a> {
    banner: &'a Banner,
    id: PlaybackId,
    nested: bool,
}

impl<'a> BannerGuard<'a> {
    pub fn banner(&self) -> &'a Banner {
        self.banner
    }

    pub fn id(&self) -> PlaybackId {
        self.id
    }

    pub fn is_nested(&self) -> bool {
        self.nested
    }

    /// Wait on the readiness condition until `ready` holds.
    ///
    /// `ready` is evaluated with the stage locked. While it is false the banner
    /// is handed back, the task sleeps until the next [`Banner::signal_all`],
    /// then queues up again to re-take the banner before looking at `ready`
    /// once more.
    pub fn wait_until(
        &mut self,
        hook: &Hook,
        mut ready: impl FnMut() -> bool,
    ) -> Result<(), Interrupted> {
        let banner = self.banner;
        let mut stage = banner.stage.lock();
        while !ready() {
            if hook.is_pulled() {
                return Err(Interrupted);
            }
            let seen = stage.generation;
            stage.hand_back(self.id);
            banner.bell.notify_all();
            debug!("{} let go of {} until it is ready", self.id, banner.name);

            while stage.generation == seen {
                if hook.is_pulled() {
                    return Err(Interrupted);
                }
                banner.bell.wait(&mut stage);
            }

            stage.queue.push_back(self.id);
            banner.await_turn(&mut stage, self.id, hook)?;
            debug!("{} took {} back", self.id, banner.name);
        }
        Ok(())
    }

    /// Keep the banner for `duration`, or less if the hook gets pulled.
    pub fn hold_for(&self, duration: Duration, hook: &Hook) -> Result<(), Interrupted> {
        let deadline = Instant::now() + duration;
        let mut stage = self.banner.stage.lock();
        loop {
            if hook.is_pulled() {
                return Err(Interrupted);
            }
            if self
                .banner
                .bell
                .wait_until(&mut stage, deadline)
                .timed_out()
            {
                return Ok(());
            }
        }
    }
}

impl Drop for BannerGuard<'_> {
    fn drop(&mut self) {
        if self.nested {
            return;
        }
        let mut stage = self.banner.stage.lock();
        stage.generation = stage.generation.wrapping_add(1);
        stage.hand_back(self.id);
        self.banner.bell.notify_all();
        debug!("{} gave {} back", self.id, self.banner.name);
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicBool, Ordering},
        thread,
    };

    use super::*;

    #[test]
    fn guard_gives_the_banner_back() {
        let banner = Banner::new("b");
        let id = PlaybackId::new();
        let guard = banner.acquire(id, &Hook::default()).unwrap();
        assert_eq!(banner.holder(), Some(id));
        assert!(!guard.is_nested());
        drop(guard);
        assert_eq!(banner.holder(), None);
    }

    #[test]
    fn owner_can_acquire_again() {
        let banner = Banner::new("b");
        let id = PlaybackId::new();
        let hook = Hook::default();
        let outer = banner.acquire(id, &hook).unwrap();
        let inner = banner.acquire(id, &hook).unwrap();
        assert!(inner.is_nested());
        drop(inner);
        assert_eq!(banner.holder(), Some(id));
        drop(outer);
        assert_eq!(banner.holder(), None);
    }

    #[test]
    fn owning_thread_can_acquire_under_another_id() {
        let banner = Banner::new("b");
        let id = PlaybackId::new();
        let outer = banner.acquire(id, &Hook::default()).unwrap();
        let inner = banner.acquire(PlaybackId::new(), &Hook::default()).unwrap();
        assert!(inner.is_nested());
        assert_eq!(inner.id(), id);
        assert_eq!(banner.queued(), 0);
        drop(inner);
        assert_eq!(banner.holder(), Some(id));
        drop(outer);
        assert_eq!(banner.holder(), None);
    }

    #[test]
    fn second_acquirer_blocks_until_release() {
        let banner = Banner::new("b");
        let first = PlaybackId::new();
        let guard = banner.acquire(first, &Hook::default()).unwrap();

        let second = PlaybackId::new();
        let contender = {
            let banner = Arc::clone(&banner);
            thread::spawn(move || {
                let guard = banner.acquire(second, &Hook::default()).unwrap();
                guard.id()
            })
        };
        thread::sleep(Duration::from_millis(50));
        assert_eq!(banner.holder(), Some(first));
        assert_eq!(banner.queued(), 1);

        drop(guard);
        assert_eq!(contender.join().unwrap(), second);
        assert_eq!(banner.holder(), None);
    }

    #[test]
    fn pulled_hook_gets_out_of_the_queue() {
        let banner = Banner::new("b");
        let guard = banner.acquire(PlaybackId::new(), &Hook::default()).unwrap();

        let hook = Hook::default();
        let contender = {
            let banner = Arc::clone(&banner);
            let hook = hook.clone();
            thread::spawn(move || banner.acquire(PlaybackId::new(), &hook).map(|g| g.id()))
        };
        thread::sleep(Duration::from_millis(50));
        hook.pull();
        banner.ring();

        assert_eq!(contender.join().unwrap(), Err(Interrupted));
        assert_eq!(banner.queued(), 0);
        drop(guard);
    }

    #[test]
    fn hold_for_ends_early_on_pulled_hook() {
        let banner = Banner::new("b");
        let hook = Hook::default();
        let holder = {
            let banner = Arc::clone(&banner);
            let hook = hook.clone();
            thread::spawn(move || {
                let guard = banner.acquire(PlaybackId::new(), &hook).unwrap();
                let started = Instant::now();
                let held = guard.hold_for(Duration::from_secs(30), &hook);
                (held, started.elapsed())
            })
        };
        thread::sleep(Duration::from_millis(50));
        hook.pull();
        banner.ring();

        let (held, elapsed) = holder.join().unwrap();
        assert_eq!(held, Err(Interrupted));
        assert!(elapsed < Duration::from_secs(5));
        assert_eq!(banner.holder(), None);
    }

    #[test]
    fn waiting_for_readiness_lets_others_in() {
        let banner = Banner::new("b");
        let ready = Arc::new(AtomicBool::new(false));
        let waiter_id = PlaybackId::new();
        let waiter = {
            let banner = Arc::clone(&banner);
            let ready = Arc::clone(&ready);
            thread::spawn(move || {
                let hook = Hook::default();
                let mut guard = banner.acquire(waiter_id, &hook).unwrap();
                guard
                    .wait_until(&hook, || ready.load(Ordering::SeqCst))
                    .unwrap();
                banner.holder()
            })
        };
        thread::sleep(Duration::from_millis(50));

        // the waiter handed the banner back while it waits
        let other = PlaybackId::new();
        let guard = banner.acquire(other, &Hook::default()).unwrap();
        assert_eq!(banner.holder(), Some(other));
        drop(guard);

        ready.store(true, Ordering::SeqCst);
        banner.signal_all();
        assert_eq!(waiter.join().unwrap(), Some(waiter_id));
    }

    #[test]
    fn paint_changes_the_marquee() {
        let banner = Banner::new("b");
        banner.paint(|face| {
            face.text = "hello".to_owned();
            face.visible = false;
        });
        let face = banner.marquee();
        assert_eq!(face.text, "hello");
        assert!(!face.visible);
        assert_eq!(face.to_string(), "[ ]");
    }
}
