//! Scrapbook page navigation once the lock is open.
//!
//! Pages are short captions from config. Wide viewports show two pages
//! side by side and turn by a full spread.

use serde::Deserialize;

use crate::sound::{Cue, SoundPlayer};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    pub pages: Vec<String>,
    /// Viewports at most this wide show a single page at a time.
    pub single_page_width: f32,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            pages: (1..=10).map(|i| format!("Page {} of memories", i)).collect(),
            single_page_width: 1024.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scrapbook {
    pages: Vec<String>,
    single_page_width: f32,
    pub open: bool,
    /// Index of the left-most visible page.
    pub page: usize,
}

impl Scrapbook {
    pub fn new(config: &BookConfig) -> Self {
        Self {
            pages: config.pages.clone(),
            single_page_width: config.single_page_width,
            open: false,
            page: 0,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn per_spread(&self, viewport_width: f32) -> usize {
        if viewport_width <= self.single_page_width { 1 } else { 2 }
    }

    /// Open at the current page. No-op when there is nothing to show.
    pub fn open(&mut self) {
        if !self.pages.is_empty() {
            self.open = true;
        }
    }

    pub fn close(&mut self, sounds: &mut dyn SoundPlayer) {
        if self.open {
            self.open = false;
            sounds.play(Cue::BookClose);
        }
    }

    pub fn next(&mut self, viewport_width: f32, sounds: &mut dyn SoundPlayer) {
        let step = self.per_spread(viewport_width);
        if self.page + step < self.pages.len() {
            self.page += step;
            sounds.play(Cue::PageTurn);
        }
    }

    /// Turn back one spread; on the first page this closes the book.
    pub fn prev(&mut self, viewport_width: f32, sounds: &mut dyn SoundPlayer) {
        if self.page == 0 {
            self.close(sounds);
            return;
        }
        let step = self.per_spread(viewport_width);
        self.page = self.page.saturating_sub(step);
        sounds.play(Cue::PageTurn);
    }

    /// Captions currently visible, left to right.
    pub fn visible(&self, viewport_width: f32) -> &[String] {
        let start = self.page.min(self.pages.len());
        let end = (start + self.per_spread(viewport_width)).min(self.pages.len());
        &self.pages[start..end]
    }

    /// "Page 3" alone, or "Page 3 \u{2014} Page 4" on a spread.
    pub fn label(&self, viewport_width: f32) -> String {
        let first = self.page + 1;
        if self.per_spread(viewport_width) == 2 && self.page + 2 <= self.pages.len() {
            format!("Page {} \u{2014} Page {}", first, first + 1)
        } else {
            format!("Page {}", first)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDE: f32 = 1280.0;
    const NARROW: f32 = 800.0;

    fn book() -> Scrapbook {
        let mut b = Scrapbook::new(&BookConfig::default());
        b.open();
        b
    }

    #[test]
    fn wide_turns_by_spread() {
        let mut b = book();
        let mut sounds: Vec<Cue> = Vec::new();
        b.next(WIDE, &mut sounds);
        assert_eq!(b.page, 2);
        assert_eq!(b.label(WIDE), "Page 3 \u{2014} Page 4");
        assert_eq!(b.visible(WIDE).len(), 2);
        assert_eq!(sounds, vec![Cue::PageTurn]);
    }

    #[test]
    fn next_stops_at_last_spread() {
        let mut b = book();
        let mut sounds: Vec<Cue> = Vec::new();
        for _ in 0..20 {
            b.next(NARROW, &mut sounds);
        }
        assert_eq!(b.page, 9);
        assert_eq!(sounds.len(), 9);
        assert_eq!(b.label(NARROW), "Page 10");
    }

    #[test]
    fn prev_on_first_page_closes() {
        let mut b = book();
        let mut sounds: Vec<Cue> = Vec::new();
        b.prev(WIDE, &mut sounds);
        assert!(!b.open);
        assert_eq!(sounds, vec![Cue::BookClose]);
    }

    #[test]
    fn empty_book_stays_shut() {
        let mut b = Scrapbook::new(&BookConfig {
            pages: Vec::new(),
            single_page_width: 1024.0,
        });
        b.open();
        assert!(!b.open);
        assert!(b.visible(WIDE).is_empty());
    }
}
