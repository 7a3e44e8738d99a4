//! Pointer targets for the overlays.
//!
//! Layouts are computed here and shared with the painters in `overlay`, so
//! what is drawn is exactly what is clickable. The `click_*` functions turn a
//! hit into a state change on the lock, scrapbook or dialogue.

use crate::book::Scrapbook;
use crate::canvas::Rect;
use crate::dialogue::DialogueBox;
use crate::lock::{CombinationLock, LockOutcome};
use crate::sound::SoundPlayer;

use super::Theme;

/// Outer margin between overlay boxes and the window edge.
pub(crate) const MARGIN: f32 = 16.0;
pub(crate) const DIAL_W: f32 = 56.0;
pub(crate) const DIAL_H: f32 = 64.0;
pub(crate) const DIAL_GAP: f32 = 12.0;
const TITLE_H: f32 = 24.0;
const ARROW_H: f32 = 20.0;
const ERROR_H: f32 = 20.0;
pub(crate) const BUTTON_H: f32 = 28.0;
const BOOK_BUTTON_W: f32 = 72.0;
const CORNER_SIZE: f32 = 44.0;

pub(crate) fn line_height(font_size: f32) -> f32 {
    (font_size * 1.25).ceil()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockLayout {
    pub panel: Rect,
    pub dials: [Rect; 3],
    pub up: [Rect; 3],
    pub down: [Rect; 3],
    pub open: Rect,
    pub close: Rect,
    /// Baseline row for the wrong-code message.
    pub error_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockHit {
    Up(usize),
    Down(usize),
    Dial(usize),
    Open,
    Close,
    /// Inside the panel but on no control.
    Panel,
    Outside,
}

impl LockLayout {
    /// Modal centred in a canvas of the given size.
    pub fn new(width: f32, height: f32) -> Self {
        let w = DIAL_W * 3.0 + DIAL_GAP * 4.0;
        let h = DIAL_GAP * 3.0 + TITLE_H + ARROW_H * 2.0 + DIAL_H + ERROR_H + BUTTON_H;
        let panel = Rect::new(
            ((width - w) / 2.0).floor(),
            ((height - h) / 2.0).floor(),
            w,
            h,
        );
        let up_y = panel.y + DIAL_GAP + TITLE_H;
        let dial_y = up_y + ARROW_H;
        let down_y = dial_y + DIAL_H;
        let column = |i: usize| panel.x + DIAL_GAP + i as f32 * (DIAL_W + DIAL_GAP);
        let error_y = down_y + ARROW_H + DIAL_GAP / 2.0;
        let button_y = down_y + ARROW_H + ERROR_H + DIAL_GAP;
        let button_w = ((panel.width - DIAL_GAP * 3.0) / 2.0).floor();
        Self {
            panel,
            dials: std::array::from_fn(|i| Rect::new(column(i), dial_y, DIAL_W, DIAL_H)),
            up: std::array::from_fn(|i| Rect::new(column(i), up_y, DIAL_W, ARROW_H)),
            down: std::array::from_fn(|i| Rect::new(column(i), down_y, DIAL_W, ARROW_H)),
            open: Rect::new(panel.x + DIAL_GAP, button_y, button_w, BUTTON_H),
            close: Rect::new(
                panel.right() - DIAL_GAP - button_w,
                button_y,
                button_w,
                BUTTON_H,
            ),
            error_y,
        }
    }

    pub fn hit(&self, x: f32, y: f32) -> LockHit {
        if !self.panel.contains_inclusive(x, y) {
            return LockHit::Outside;
        }
        for i in 0..3 {
            if self.up[i].contains_inclusive(x, y) {
                return LockHit::Up(i);
            }
            if self.down[i].contains_inclusive(x, y) {
                return LockHit::Down(i);
            }
            if self.dials[i].contains_inclusive(x, y) {
                return LockHit::Dial(i);
            }
        }
        if self.open.contains_inclusive(x, y) {
            LockHit::Open
        } else if self.close.contains_inclusive(x, y) {
            LockHit::Close
        } else {
            LockHit::Panel
        }
    }
}

impl LockHit {
    pub fn is_button(self) -> bool {
        matches!(
            self,
            LockHit::Up(_) | LockHit::Down(_) | LockHit::Open | LockHit::Close
        )
    }
}

/// Apply a click on the lock modal. Returns the outcome when OPEN was hit.
/// A click outside the panel dismisses the modal.
pub fn click_lock(
    lock: &mut CombinationLock,
    hit: LockHit,
    sounds: &mut dyn SoundPlayer,
) -> Option<LockOutcome> {
    match hit {
        LockHit::Up(i) => {
            lock.selected = i;
            lock.change_dial(i, 1, sounds);
        }
        LockHit::Down(i) => {
            lock.selected = i;
            lock.change_dial(i, -1, sounds);
        }
        LockHit::Dial(i) => lock.selected = i,
        LockHit::Open => return Some(lock.try_open(sounds)),
        LockHit::Close | LockHit::Outside => lock.close_modal(),
        LockHit::Panel => {}
    }
    None
}

/// Scroll over the lock. Scrolling up turns a dial up. Over a dial column
/// that dial turns and becomes selected; elsewhere the selected dial turns.
pub fn wheel_lock(
    lock: &mut CombinationLock,
    layout: &LockLayout,
    x: f32,
    y: f32,
    lines_up: f32,
    sounds: &mut dyn SoundPlayer,
) {
    let direction = if lines_up > 0.0 {
        1
    } else if lines_up < 0.0 {
        -1
    } else {
        return;
    };
    let dial = match layout.hit(x, y) {
        LockHit::Up(i) | LockHit::Down(i) | LockHit::Dial(i) => i,
        _ => lock.selected,
    };
    lock.selected = dial;
    lock.change_dial(dial, direction, sounds);
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookLayout {
    /// One rect per visible caption, left to right.
    pub pages: Vec<Rect>,
    pub label_y: f32,
    pub prev: Rect,
    pub next: Rect,
    pub close: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookHit {
    Prev,
    Next,
    Close,
    Page,
    Outside,
}

impl BookLayout {
    pub fn new(book: &Scrapbook, width: f32, height: f32, font_size: f32) -> Self {
        let count = book.visible(width).len().max(1);
        let lh = line_height(font_size);
        let label_h = lh.max(BUTTON_H) + MARGIN;
        let page_h = (height - MARGIN * 2.0 - label_h).max(0.0);
        let page_w = ((width - MARGIN * 2.0) / count as f32)
            .min(page_h * 0.75)
            .floor();
        let spread_w = page_w * count as f32;
        let x0 = ((width - spread_w) / 2.0).floor();
        let row_y = MARGIN + page_h + MARGIN / 2.0;
        Self {
            pages: (0..count)
                .map(|i| Rect::new(x0 + i as f32 * page_w, MARGIN, page_w, page_h))
                .collect(),
            label_y: row_y + ((BUTTON_H - lh) / 2.0).max(0.0).floor(),
            prev: Rect::new(x0, row_y, BOOK_BUTTON_W, BUTTON_H),
            next: Rect::new(x0 + spread_w - BOOK_BUTTON_W, row_y, BOOK_BUTTON_W, BUTTON_H),
            close: Rect::new(x0 + spread_w - BUTTON_H - 4.0, MARGIN + 4.0, BUTTON_H, BUTTON_H),
        }
    }

    pub fn hit(&self, x: f32, y: f32) -> BookHit {
        if self.close.contains_inclusive(x, y) {
            BookHit::Close
        } else if self.prev.contains_inclusive(x, y) {
            BookHit::Prev
        } else if self.next.contains_inclusive(x, y) {
            BookHit::Next
        } else if self.pages.iter().any(|p| p.contains_inclusive(x, y)) {
            BookHit::Page
        } else {
            BookHit::Outside
        }
    }
}

impl BookHit {
    pub fn is_button(self) -> bool {
        matches!(self, BookHit::Prev | BookHit::Next | BookHit::Close)
    }
}

pub fn click_book(
    book: &mut Scrapbook,
    hit: BookHit,
    viewport_width: f32,
    sounds: &mut dyn SoundPlayer,
) {
    match hit {
        BookHit::Prev => book.prev(viewport_width, sounds),
        BookHit::Next => book.next(viewport_width, sounds),
        BookHit::Close => book.close(sounds),
        BookHit::Page | BookHit::Outside => {}
    }
}

/// Dialogue box pinned to the bottom of the canvas.
pub fn dialogue_panel(width: f32, height: f32, theme: &Theme) -> Rect {
    Rect::new(
        MARGIN,
        height - theme.dialogue_height - MARGIN,
        (width - MARGIN * 2.0).max(0.0),
        theme.dialogue_height,
    )
}

/// A click on the box advances it; anywhere else closes it.
pub fn click_dialogue(dialogue: &mut DialogueBox, panel: Rect, x: f32, y: f32, now_ms: f64) {
    if panel.contains_inclusive(x, y) {
        dialogue.advance(now_ms);
    } else {
        dialogue.close();
    }
}

/// Padlock (or scrapbook, once unlocked) button in the top-right corner.
pub fn corner_button(width: f32, _height: f32) -> Rect {
    Rect::new(
        (width - MARGIN - CORNER_SIZE).max(0.0),
        MARGIN + 8.0,
        CORNER_SIZE,
        CORNER_SIZE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::BookConfig;
    use crate::dialogue::DialogueSink;
    use crate::lock::LockConfig;
    use crate::sound::Cue;

    fn centre(r: Rect) -> (f32, f32) {
        (r.x + r.width / 2.0, r.y + r.height / 2.0)
    }

    fn open_lock() -> CombinationLock {
        let mut lock = CombinationLock::new(&LockConfig::default());
        lock.open_modal();
        lock
    }

    #[test]
    fn lock_controls_stay_inside_panel() {
        let l = LockLayout::new(640.0, 480.0);
        let rects = l.up.iter().chain(&l.dials).chain(&l.down).chain([&l.open, &l.close]);
        for r in rects {
            assert!(l.panel.contains_inclusive(r.x, r.y), "{r:?}");
            assert!(l.panel.contains_inclusive(r.right(), r.bottom()), "{r:?}");
        }
        assert!(l.open.right() < l.close.x);
    }

    #[test]
    fn every_control_hits_itself() {
        let l = LockLayout::new(640.0, 480.0);
        for i in 0..3 {
            let (x, y) = centre(l.up[i]);
            assert_eq!(l.hit(x, y), LockHit::Up(i));
            let (x, y) = centre(l.down[i]);
            assert_eq!(l.hit(x, y), LockHit::Down(i));
            let (x, y) = centre(l.dials[i]);
            assert_eq!(l.hit(x, y), LockHit::Dial(i));
        }
        let (x, y) = centre(l.open);
        assert_eq!(l.hit(x, y), LockHit::Open);
        let (x, y) = centre(l.close);
        assert_eq!(l.hit(x, y), LockHit::Close);
        assert_eq!(l.hit(l.panel.x + 1.0, l.panel.y + 1.0), LockHit::Panel);
        assert_eq!(l.hit(0.0, 0.0), LockHit::Outside);
    }

    #[test]
    fn arrow_clicks_turn_and_select() {
        let mut lock = open_lock();
        let mut sounds: Vec<Cue> = Vec::new();
        assert_eq!(click_lock(&mut lock, LockHit::Down(2), &mut sounds), None);
        assert_eq!(lock.values, [0, 0, 26]);
        assert_eq!(lock.selected, 2);
        click_lock(&mut lock, LockHit::Up(1), &mut sounds);
        assert_eq!(lock.values, [0, 1, 26]);
        assert_eq!(sounds, vec![Cue::Dial, Cue::Dial]);
    }

    #[test]
    fn outside_click_dismisses_and_clears_error() {
        let mut lock = open_lock();
        let mut sounds: Vec<Cue> = Vec::new();
        assert_eq!(
            click_lock(&mut lock, LockHit::Open, &mut sounds),
            Some(LockOutcome::Wrong)
        );
        assert!(lock.error.is_some());
        click_lock(&mut lock, LockHit::Panel, &mut sounds);
        assert!(lock.modal_open);
        click_lock(&mut lock, LockHit::Outside, &mut sounds);
        assert!(!lock.modal_open);
        assert_eq!(lock.error, None);
    }

    #[test]
    fn wheel_turns_dial_under_pointer() {
        let mut lock = open_lock();
        let l = LockLayout::new(640.0, 480.0);
        let mut sounds: Vec<Cue> = Vec::new();
        let (x, y) = centre(l.dials[1]);
        wheel_lock(&mut lock, &l, x, y, 1.0, &mut sounds);
        assert_eq!(lock.values, [0, 1, 0]);
        assert_eq!(lock.selected, 1);
        // Off the dials the selected one turns.
        wheel_lock(&mut lock, &l, l.panel.x + 1.0, l.panel.y + 1.0, -3.0, &mut sounds);
        assert_eq!(lock.values, [0, 0, 0]);
        wheel_lock(&mut lock, &l, x, y, 0.0, &mut sounds);
        assert_eq!(sounds.len(), 2);
    }

    #[test]
    fn book_buttons_page_and_close() {
        let mut book = Scrapbook::new(&BookConfig::default());
        book.open();
        let mut sounds: Vec<Cue> = Vec::new();
        let (w, h) = (800.0, 600.0);
        let l = BookLayout::new(&book, w, h, 16.0);
        assert_eq!(l.pages.len(), 1);
        let (x, y) = centre(l.next);
        click_book(&mut book, l.hit(x, y), w, &mut sounds);
        assert_eq!(book.page, 1);
        let (x, y) = centre(l.prev);
        click_book(&mut book, l.hit(x, y), w, &mut sounds);
        assert_eq!(book.page, 0);
        let (x, y) = centre(l.pages[0]);
        click_book(&mut book, l.hit(x, y), w, &mut sounds);
        assert!(book.open);
        let (x, y) = centre(l.close);
        click_book(&mut book, l.hit(x, y), w, &mut sounds);
        assert!(!book.open);
        assert_eq!(sounds, vec![Cue::PageTurn, Cue::PageTurn, Cue::BookClose]);
    }

    #[test]
    fn book_buttons_sit_below_pages() {
        let book = Scrapbook::new(&BookConfig::default());
        let l = BookLayout::new(&book, 1280.0, 720.0, 16.0);
        assert_eq!(l.pages.len(), 2);
        let pages_bottom = l.pages[0].bottom();
        assert!(l.prev.y > pages_bottom && l.next.y > pages_bottom);
        assert!(l.prev.right() < l.next.x);
        assert!(l.next.bottom() <= 720.0);
    }

    #[test]
    fn click_outside_dialogue_closes_it() {
        let theme = Theme::default();
        let panel = dialogue_panel(400.0, 300.0, &theme);
        let mut dialogue = DialogueBox::new();
        dialogue.open("ren", &["hi".to_string(), "again".to_string()]);
        click_dialogue(&mut dialogue, panel, 200.0, panel.y + 4.0, 0.0);
        assert!(dialogue.active);
        click_dialogue(&mut dialogue, panel, 200.0, 10.0, 0.0);
        assert!(!dialogue.active);
    }

    #[test]
    fn corner_button_hugs_top_right() {
        let r = corner_button(640.0, 480.0);
        assert_eq!(r.right(), 640.0 - MARGIN);
        assert!(r.y < 480.0 / 4.0);
    }
}
