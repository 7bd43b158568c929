#![allow(dead_code)]
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc, Arc,
    },
    thread,
    time::{Duration, Instant},
};

use bandeau_lib::{parking_lot::Mutex, Banner, Effect, Outcome, Playback, PlaybackError};

/// Every play, in the order it happened, as (banner, effect).
#[derive(Clone, Default)]
pub struct Log(Arc<Mutex<Vec<(String, String)>>>);

impl Log {
    pub fn names(&self) -> Vec<String> {
        self.0.lock().iter().map(|(_, effect)| effect.clone()).collect()
    }
    pub fn on(&self, banner: &str) -> Vec<String> {
        self.0
            .lock()
            .iter()
            .filter(|(on, _)| on == banner)
            .map(|(_, effect)| effect.clone())
            .collect()
    }
    pub fn len(&self) -> usize {
        self.0.lock().len()
    }
}

/// Counts how many effects are being played at the same time.
#[derive(Default)]
pub struct OnStage {
    now: AtomicUsize,
    most: AtomicUsize,
}

impl OnStage {
    pub fn most(&self) -> usize {
        self.most.load(Ordering::SeqCst)
    }
}

pub struct Recorded {
    pub name: String,
    pub log: Log,
    pub pause: Duration,
    pub on_stage: Option<Arc<OnStage>>,
}

impl Recorded {
    pub fn new(name: &str, log: &Log) -> Self {
        Self {
            name: name.to_owned(),
            log: log.clone(),
            pause: Duration::ZERO,
            on_stage: None,
        }
    }
    pub fn pausing(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }
    pub fn counted_by(mut self, on_stage: &Arc<OnStage>) -> Self {
        self.on_stage = Some(Arc::clone(on_stage));
        self
    }
}

impl Effect for Recorded {
    fn play(&self, banner: &Banner) {
        if let Some(on_stage) = &self.on_stage {
            let now = on_stage.now.fetch_add(1, Ordering::SeqCst) + 1;
            on_stage.most.fetch_max(now, Ordering::SeqCst);
        }
        self.log
            .0
            .lock()
            .push((banner.name().to_owned(), self.name.clone()));
        thread::sleep(self.pause);
        if let Some(on_stage) = &self.on_stage {
            on_stage.now.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

pub struct Faceplant;

impl Effect for Faceplant {
    fn play(&self, _banner: &Banner) {
        panic!("effect fell over");
    }
    fn name(&self) -> &str {
        "faceplant"
    }
}

/// Join, but give up after `limit`.
pub fn join_within(playback: Playback, limit: Duration) -> Option<Result<Outcome, PlaybackError>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(playback.join());
    });
    rx.recv_timeout(limit).ok()
}

pub fn eventually(limit: Duration, mut what: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if what() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    what()
}

pub const PATIENCE: Duration = Duration::from_secs(5);
