//! Typewriter text boxes: the intro dialogue and per-character lines.

use crate::sound::{Cue, SoundPlayer};

/// Milliseconds between revealed characters.
pub const TYPING_SPEED_MS: f64 = 20.0;

pub const PROMPT_NEXT: &str = "NEXT \u{25B6}";
pub const PROMPT_OPEN: &str = "OPEN \u{25B6}";
pub const PROMPT_CLOSE: &str = "CLOSE \u{2715}";

/// Which prompt the last line ends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    Intro,
    Character,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The current line was still typing and is now complete.
    Completed,
    NextLine,
    /// Past the last line.
    Finished,
}

/// Receives "open a dialogue" requests from the hit-tester.
pub trait DialogueSink {
    fn open(&mut self, speaker: &str, lines: &[String]);
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    style: PromptStyle,
    lines: Vec<String>,
    current: usize,
    text: Vec<char>,
    revealed: usize,
    started_ms: f64,
    typing: bool,
}

impl Typewriter {
    pub fn new(style: PromptStyle) -> Self {
        Self {
            style,
            lines: Vec::new(),
            current: 0,
            text: Vec::new(),
            revealed: 0,
            started_ms: 0.0,
            typing: false,
        }
    }

    /// Load a line set and start typing its first line.
    pub fn start(&mut self, lines: &[String], now_ms: f64) {
        self.lines = lines.to_vec();
        self.current = 0;
        let first = self.lines.first().cloned().unwrap_or_default();
        self.show_line(&first, now_ms);
    }

    /// Reset and start revealing `text`. The first character appears on the
    /// next `update` at or after `now_ms`.
    pub fn show_line(&mut self, text: &str, now_ms: f64) {
        self.text = text.chars().collect();
        self.revealed = 0;
        self.started_ms = now_ms;
        self.typing = !self.text.is_empty();
    }

    /// Reveal every character due by `now_ms`, with a keystroke cue on every
    /// third one.
    pub fn update(&mut self, now_ms: f64, sounds: &mut dyn SoundPlayer) {
        if !self.typing {
            return;
        }
        let elapsed = (now_ms - self.started_ms).max(0.0);
        let due = ((elapsed / TYPING_SPEED_MS).floor() as usize + 1).min(self.text.len());
        while self.revealed < due {
            if self.revealed % 3 == 0 {
                sounds.play(Cue::Type);
            }
            self.revealed += 1;
        }
        if self.revealed == self.text.len() {
            self.typing = false;
        }
    }

    /// Complete the line if it is still typing, otherwise move on.
    pub fn advance(&mut self, now_ms: f64) -> Advance {
        if self.typing {
            self.revealed = self.text.len();
            self.typing = false;
            return Advance::Completed;
        }
        self.current += 1;
        match self.lines.get(self.current).cloned() {
            Some(line) => {
                self.show_line(&line, now_ms);
                Advance::NextLine
            }
            None => Advance::Finished,
        }
    }

    /// Stop typing and jump past the last line.
    pub fn skip(&mut self) {
        self.revealed = self.text.len();
        self.typing = false;
        self.current = self.lines.len();
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn is_last_line(&self) -> bool {
        self.current + 1 >= self.lines.len()
    }

    pub fn visible_text(&self) -> String {
        self.text[..self.revealed].iter().collect()
    }

    pub fn prompt(&self) -> &'static str {
        if !self.typing && self.is_last_line() {
            match self.style {
                PromptStyle::Intro => PROMPT_OPEN,
                PromptStyle::Character => PROMPT_CLOSE,
            }
        } else {
            PROMPT_NEXT
        }
    }
}

/// Character dialogue overlay.
#[derive(Debug, Clone)]
pub struct DialogueBox {
    pub active: bool,
    pub speaker: String,
    pub typewriter: Typewriter,
    now_ms: f64,
}

impl DialogueBox {
    pub fn new() -> Self {
        Self {
            active: false,
            speaker: String::new(),
            typewriter: Typewriter::new(PromptStyle::Character),
            now_ms: 0.0,
        }
    }

    pub fn update(&mut self, now_ms: f64, sounds: &mut dyn SoundPlayer) {
        self.now_ms = now_ms;
        if self.active {
            self.typewriter.update(now_ms, sounds);
        }
    }

    /// Advance the text; closes the box after the last line.
    pub fn advance(&mut self, now_ms: f64) {
        if !self.active {
            return;
        }
        if self.typewriter.advance(now_ms) == Advance::Finished {
            self.close();
        }
    }

    pub fn close(&mut self) {
        self.active = false;
        self.typewriter.skip();
    }
}

impl Default for DialogueBox {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogueSink for DialogueBox {
    /// Ignored while another dialogue is showing.
    fn open(&mut self, speaker: &str, lines: &[String]) {
        if self.active {
            return;
        }
        if lines.is_empty() {
            log::warn!("{} has no dialogue lines", speaker);
            return;
        }
        self.active = true;
        self.speaker = speaker.to_string();
        self.typewriter.start(lines, self.now_ms);
    }
}

/// Recording sink for tests: keeps every (speaker, lines) request.
impl DialogueSink for Vec<(String, Vec<String>)> {
    fn open(&mut self, speaker: &str, lines: &[String]) {
        self.push((speaker.to_string(), lines.to_vec()));
    }
}
