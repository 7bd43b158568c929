// Effects for a banner that only exists in the logs. They paint the marquee
// and sleep, which is all a playback needs from them.
use std::{
    thread,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use nanorand::{Rng, WyRand};

use crate::theater::play::{banner::Banner, Effect};

pub const RAINBOW: [[u8; 3]; 7] = [
    [255, 0, 0],
    [255, 127, 0],
    [255, 255, 0],
    [0, 255, 0],
    [0, 0, 255],
    [63, 0, 127],
    [127, 0, 255],
];

pub const FONTS: [&str; 6] = [
    "Monospaced",
    "Serif",
    "SansSerif",
    "Dialog",
    "DialogInput",
    "Cursive",
];

fn show(banner: &Banner, message: &str) {
    banner.paint(|face| {
        face.text.clear();
        face.text.push_str(message);
        face.visible = true;
    });
}

/// Types the message out one character per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TeleType {
    pub message: String,
    pub tick: Duration,
}

impl TeleType {
    pub fn new(message: impl Into<String>, tick_ms: u64) -> Self {
        Self {
            message: message.into(),
            tick: Duration::from_millis(tick_ms),
        }
    }
}

impl Effect for TeleType {
    fn play(&self, banner: &Banner) {
        let mut typed = String::with_capacity(self.message.len());
        show(banner, "");
        for letter in self.message.chars() {
            typed.push(letter);
            show(banner, &typed);
            thread::sleep(self.tick);
        }
    }

    fn name(&self) -> &str {
        "teletype"
    }
}

/// On, off, on again.
#[derive(Debug, Clone, PartialEq)]
pub struct Blink {
    pub message: String,
    pub tick: Duration,
}

impl Blink {
    pub fn new(message: impl Into<String>, tick_ms: u64) -> Self {
        Self {
            message: message.into(),
            tick: Duration::from_millis(tick_ms),
        }
    }
}

impl Effect for Blink {
    fn play(&self, banner: &Banner) {
        show(banner, &self.message);
        thread::sleep(self.tick);
        banner.paint(|face| face.visible = false);
        thread::sleep(self.tick);
        banner.paint(|face| face.visible = true);
    }

    fn name(&self) -> &str {
        "blink"
    }
}

/// Noise that settles into the message from left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Scramble {
    pub message: String,
    pub duration: Duration,
    pub seed: u64,
}

impl Scramble {
    pub fn new(message: impl Into<String>, duration_ms: u64) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|since| since.as_nanos() as u64)
            .unwrap_or(0x5eed);
        Self {
            message: message.into(),
            duration: Duration::from_millis(duration_ms),
            seed,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Effect for Scramble {
    fn play(&self, banner: &Banner) {
        let letters: Vec<char> = self.message.chars().collect();
        let steps = letters.len() as u32 + 1;
        let pause = self.duration / steps;
        let mut rng = WyRand::new_seed(self.seed);

        for settled in 0..=letters.len() {
            let frame: String = letters
                .iter()
                .enumerate()
                .map(|(at, letter)| {
                    if at < settled || letter.is_whitespace() {
                        *letter
                    } else {
                        char::from(rng.generate_range(33_u8..127))
                    }
                })
                .collect();
            show(banner, &frame);
            thread::sleep(pause);
        }
    }

    fn name(&self) -> &str {
        "scramble"
    }
}

/// Runs the message through every colour of [`RAINBOW`], then back to white.
#[derive(Debug, Clone, PartialEq)]
pub struct Rainbow {
    pub message: String,
    pub tick: Duration,
}

impl Rainbow {
    pub fn new(message: impl Into<String>, tick_ms: u64) -> Self {
        Self {
            message: message.into(),
            tick: Duration::from_millis(tick_ms),
        }
    }
}

impl Effect for Rainbow {
    fn play(&self, banner: &Banner) {
        show(banner, &self.message);
        for color in RAINBOW {
            banner.paint(|face| face.color = color);
            thread::sleep(self.tick);
        }
        banner.paint(|face| face.color = [0xff, 0xff, 0xff]);
    }

    fn name(&self) -> &str {
        "rainbow"
    }
}

/// One full turn in `steps` steps spread over `duration`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rotate {
    pub message: String,
    pub steps: u32,
    pub duration: Duration,
    pub clockwise: bool,
}

impl Rotate {
    pub fn new(message: impl Into<String>, steps: u32, duration_ms: u64, clockwise: bool) -> Self {
        Self {
            message: message.into(),
            steps,
            duration: Duration::from_millis(duration_ms),
            clockwise,
        }
    }
}

impl Effect for Rotate {
    fn play(&self, banner: &Banner) {
        let steps = self.steps.max(1);
        let pause = self.duration / steps;
        let sign = if self.clockwise { 1.0 } else { -1.0 };
        show(banner, &self.message);
        for step in 1..=steps {
            let angle = sign * 360.0 * step as f32 / steps as f32;
            banner.paint(|face| face.rotation = angle.rem_euclid(360.0));
            thread::sleep(pause);
        }
    }

    fn name(&self) -> &str {
        "rotate"
    }
}

/// Grows the message from tiny to huge.
#[derive(Debug, Clone, PartialEq)]
pub struct Zoom {
    pub message: String,
    pub tick: Duration,
}

impl Zoom {
    pub fn new(message: impl Into<String>, tick_ms: u64) -> Self {
        Self {
            message: message.into(),
            tick: Duration::from_millis(tick_ms),
        }
    }
}

impl Effect for Zoom {
    fn play(&self, banner: &Banner) {
        show(banner, &self.message);
        for size in (8..=64).step_by(4) {
            banner.paint(|face| face.font_size = size);
            thread::sleep(self.tick);
        }
    }

    fn name(&self) -> &str {
        "zoom"
    }
}

/// Shows the name of every font in [`FONTS`], in that font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontEnumerator {
    pub tick: Duration,
}

impl FontEnumerator {
    pub fn new(tick_ms: u64) -> Self {
        Self {
            tick: Duration::from_millis(tick_ms),
        }
    }
}

impl Effect for FontEnumerator {
    fn play(&self, banner: &Banner) {
        for font in FONTS {
            banner.paint(|face| {
                face.font.clear();
                face.font.push_str(font);
                face.text.clear();
                face.text.push_str(font);
                face.visible = true;
            });
            thread::sleep(self.tick);
        }
    }

    fn name(&self) -> &str {
        "fonts"
    }
}
