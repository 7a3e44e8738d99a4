//! Three-dial combination lock guarding the scrapbook.

use serde::Deserialize;

use crate::sound::{Cue, SoundPlayer};

pub const WRONG_CODE: &str = "WRONG CODE. TRY AGAIN.";
pub const SHAKE_MS: f64 = 300.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    pub combination: [u8; 3],
    /// Highest value on each dial; dials run `0..=max`.
    pub maxima: [u8; 3],
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            combination: [31, 5, 25],
            maxima: [31, 12, 26],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOutcome {
    /// Correct code on the first successful attempt.
    Unlocked,
    /// Correct code, but the lock was already open.
    AlreadyOpen,
    Wrong,
}

#[derive(Debug, Clone)]
pub struct CombinationLock {
    pub values: [u8; 3],
    maxima: [u8; 3],
    combination: [u8; 3],
    pub selected: usize,
    pub modal_open: bool,
    pub unlocked: bool,
    pub error: Option<&'static str>,
}

impl CombinationLock {
    pub fn new(config: &LockConfig) -> Self {
        // A combination digit above its dial's max could never be dialled.
        let combination = std::array::from_fn(|i| config.combination[i].min(config.maxima[i]));
        if combination != config.combination {
            log::warn!(
                "lock combination {:?} exceeds dial maxima {:?}, clamped",
                config.combination,
                config.maxima
            );
        }
        Self {
            values: [0; 3],
            maxima: config.maxima,
            combination,
            selected: 0,
            modal_open: false,
            unlocked: false,
            error: None,
        }
    }

    pub fn maxima(&self) -> [u8; 3] {
        self.maxima
    }

    pub fn open_modal(&mut self) {
        self.modal_open = true;
    }

    /// Closing also clears any error message.
    pub fn close_modal(&mut self) {
        self.modal_open = false;
        self.error = None;
    }

    /// Move the dial cursor by `delta`, wrapping across the three dials.
    pub fn select(&mut self, delta: i32) {
        self.selected = (self.selected as i32 + delta).rem_euclid(3) as usize;
    }

    /// Turn dial `index` one notch up (`+1`) or down (`-1`), wrapping within
    /// `0..=max`.
    pub fn change_dial(&mut self, index: usize, direction: i32, sounds: &mut dyn SoundPlayer) {
        let Some(value) = self.values.get_mut(index) else {
            return;
        };
        let span = self.maxima[index] as i32 + 1;
        *value = (*value as i32 + direction).rem_euclid(span) as u8;
        self.error = None;
        sounds.play(Cue::Dial);
    }

    pub fn try_open(&mut self, sounds: &mut dyn SoundPlayer) -> LockOutcome {
        if self.values != self.combination {
            self.error = Some(WRONG_CODE);
            sounds.play(Cue::Wrong);
            log::debug!("wrong code {:?}", self.values);
            return LockOutcome::Wrong;
        }
        self.modal_open = false;
        self.error = None;
        sounds.play(Cue::Open);
        if self.unlocked {
            return LockOutcome::AlreadyOpen;
        }
        self.unlocked = true;
        log::info!("scrapbook unlocked");
        LockOutcome::Unlocked
    }
}
