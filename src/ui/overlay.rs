//! Screen-space overlays drawn over the composed scene: intro card,
//! dialogue box, lock modal, unlock banner, scrapbook, corner button and
//! status strip.
//!
//! Every function here is read-only over its state and draws through
//! [`Canvas`] + [`TextEngine`], so the same code paints the window
//! framebuffer and a recording [`crate::canvas::DrawList`] in tests.

use crate::book::Scrapbook;
use crate::canvas::{Canvas, Rect, Rgba};
use crate::dialogue::{DialogueBox, Typewriter};
use crate::lock::CombinationLock;
use crate::text::TextEngine;

use super::Theme;
use super::controls::{BookLayout, LockLayout, MARGIN, corner_button, dialogue_panel, line_height};

pub const UNLOCK_BANNER: &str = "UNLOCKED";

/// Scale a colour's alpha by `alpha` in [0, 1].
pub fn with_alpha(color: Rgba, alpha: f32) -> Rgba {
    let a = (color[3] as f32 * alpha.clamp(0.0, 1.0)).round() as u8;
    [color[0], color[1], color[2], a]
}

/// Greedy word wrap against the engine's measured widths. A single word
/// wider than `max_width` gets a line of its own.
pub fn wrap_lines(
    text: &mut dyn TextEngine,
    content: &str,
    font_size: f32,
    max_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in content.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };
            if !line.is_empty() && text.measure(&candidate, font_size) > max_width {
                lines.push(std::mem::replace(&mut line, word.to_string()));
            } else {
                line = candidate;
            }
        }
        lines.push(line);
    }
    lines
}

/// Full-window intro card. `alpha` fades the whole card during the reveal.
pub fn draw_intro(
    canvas: &mut dyn Canvas,
    text: &mut dyn TextEngine,
    theme: &Theme,
    typewriter: &Typewriter,
    alpha: f32,
) {
    if alpha <= 0.0 {
        return;
    }
    let size = canvas.size();
    canvas.fill_rect(
        Rect::new(0.0, 0.0, size.width, size.height),
        with_alpha(theme.intro_bg, alpha),
    );

    let fs = theme.dialogue_font_size;
    let max_w = (size.width - MARGIN * 4.0).max(fs);
    let lines = wrap_lines(text, &typewriter.visible_text(), fs, max_w);
    let lh = line_height(fs);
    let mut y = (size.height / 2.0 - lh * lines.len() as f32 / 2.0).floor();
    for line in &lines {
        let w = text.measure(line, fs);
        let x = ((size.width - w) / 2.0).floor();
        text.draw(canvas, line, x, y, fs, with_alpha(theme.dialogue_text, alpha));
        y += lh;
    }

    if !typewriter.is_typing() {
        let prompt = typewriter.prompt();
        let w = text.measure(prompt, fs);
        text.draw(
            canvas,
            prompt,
            ((size.width - w) / 2.0).floor(),
            y + lh,
            fs,
            with_alpha(theme.dialogue_prompt, alpha),
        );
    }
}

/// Speaker dialogue box pinned to the bottom of the window.
pub fn draw_dialogue(
    canvas: &mut dyn Canvas,
    text: &mut dyn TextEngine,
    theme: &Theme,
    dialogue: &DialogueBox,
) -> Option<Rect> {
    if !dialogue.active {
        return None;
    }
    let size = canvas.size();
    let fs = theme.dialogue_font_size;
    let pad = theme.dialogue_padding;
    let panel = dialogue_panel(size.width, size.height, theme);
    canvas.fill_rect(panel, theme.dialogue_bg);
    canvas.stroke_rect(panel, theme.dialogue_border, 2.0);

    let lh = line_height(fs);
    text.draw(
        canvas,
        &dialogue.speaker,
        panel.x + pad,
        panel.y + pad,
        fs,
        theme.dialogue_prompt,
    );
    let body = wrap_lines(
        text,
        &dialogue.typewriter.visible_text(),
        fs,
        (panel.width - pad * 2.0).max(fs),
    );
    let mut y = panel.y + pad + lh;
    for line in &body {
        if y + lh > panel.bottom() - pad {
            break;
        }
        text.draw(canvas, line, panel.x + pad, y, fs, theme.dialogue_text);
        y += lh;
    }

    if !dialogue.typewriter.is_typing() {
        let prompt = dialogue.typewriter.prompt();
        let w = text.measure(prompt, fs);
        text.draw(
            canvas,
            prompt,
            panel.right() - pad - w,
            panel.bottom() - pad - fs,
            fs,
            theme.dialogue_prompt,
        );
    }
    Some(panel)
}

/// Filled button with a centred label.
fn draw_button(
    canvas: &mut dyn Canvas,
    text: &mut dyn TextEngine,
    theme: &Theme,
    rect: Rect,
    label: &str,
    font_size: f32,
) {
    canvas.fill_rect(rect, theme.dial_bg);
    canvas.stroke_rect(rect, theme.modal_border, 1.0);
    let w = text.measure(label, font_size);
    text.draw(
        canvas,
        label,
        (rect.x + (rect.width - w) / 2.0).floor(),
        (rect.y + (rect.height - font_size) / 2.0).floor(),
        font_size,
        theme.dial_text,
    );
}

/// Three-dial combination modal with arrow buttons, OPEN and CLOSE.
/// `shake_dx` offsets the panel while the wrong-code shake runs.
pub fn draw_lock(
    canvas: &mut dyn Canvas,
    text: &mut dyn TextEngine,
    theme: &Theme,
    lock: &CombinationLock,
    shake_dx: f32,
) -> Option<Rect> {
    if !lock.modal_open {
        return None;
    }
    let size = canvas.size();
    canvas.fill_rect(Rect::new(0.0, 0.0, size.width, size.height), theme.modal_scrim);

    let layout = LockLayout::new(size.width, size.height);
    let dx = shake_dx.round();
    let shift = |r: Rect| Rect::new(r.x + dx, r.y, r.width, r.height);
    let panel = shift(layout.panel);
    canvas.fill_rect(panel, theme.modal_bg);
    canvas.stroke_rect(panel, theme.modal_border, 2.0);

    let fs = theme.dialogue_font_size;
    let sfs = theme.status_font_size;
    let title = if lock.unlocked { "OPEN" } else { "LOCKED" };
    let tw = text.measure(title, fs);
    text.draw(
        canvas,
        title,
        (panel.x + (panel.width - tw) / 2.0).floor(),
        panel.y + (layout.up[0].y - panel.y - fs) / 2.0,
        fs,
        theme.dial_text,
    );

    for (i, value) in lock.values.iter().enumerate() {
        let dial = shift(layout.dials[i]);
        canvas.fill_rect(dial, theme.dial_bg);
        if i == lock.selected {
            canvas.stroke_rect(dial, theme.dial_selected, 2.0);
        }
        let digits = format!("{:02}", value);
        let dfs = fs * 2.0;
        let dw = text.measure(&digits, dfs);
        text.draw(
            canvas,
            &digits,
            (dial.x + (dial.width - dw) / 2.0).floor(),
            (dial.y + (dial.height - dfs) / 2.0).floor(),
            dfs,
            theme.dial_text,
        );
        draw_button(canvas, text, theme, shift(layout.up[i]), "\u{25B2}", sfs);
        draw_button(canvas, text, theme, shift(layout.down[i]), "\u{25BC}", sfs);
    }

    if let Some(message) = lock.error {
        let mw = text.measure(message, sfs);
        text.draw(
            canvas,
            message,
            (panel.x + (panel.width - mw) / 2.0).floor(),
            layout.error_y,
            sfs,
            theme.danger,
        );
    }
    draw_button(canvas, text, theme, shift(layout.open), "OPEN", fs);
    draw_button(canvas, text, theme, shift(layout.close), "CLOSE", fs);
    Some(panel)
}

/// Padlock button in the scene corner; it becomes the scrapbook button
/// once the lock is open.
pub fn draw_corner_button(
    canvas: &mut dyn Canvas,
    text: &mut dyn TextEngine,
    theme: &Theme,
    unlocked: bool,
) -> Rect {
    let size = canvas.size();
    let rect = corner_button(size.width, size.height);
    let label = if unlocked { "BOOK" } else { "LOCK" };
    draw_button(canvas, text, theme, rect, label, theme.status_font_size);
    rect
}

/// Centered banner shown after a successful unlock.
pub fn draw_banner(
    canvas: &mut dyn Canvas,
    text: &mut dyn TextEngine,
    theme: &Theme,
    message: &str,
    alpha: f32,
) {
    if alpha <= 0.0 {
        return;
    }
    let size = canvas.size();
    let fs = theme.dialogue_font_size * 2.0;
    let pad = theme.dialogue_padding;
    let w = text.measure(message, fs) + pad * 2.0;
    let h = fs + pad * 2.0;
    let banner = Rect::new(
        ((size.width - w) / 2.0).floor(),
        (size.height / 4.0).floor(),
        w.ceil(),
        h.ceil(),
    );
    canvas.fill_rect(banner, with_alpha(theme.modal_bg, alpha));
    canvas.stroke_rect(banner, with_alpha(theme.modal_border, alpha), 2.0);
    text.draw(
        canvas,
        message,
        banner.x + pad,
        banner.y + pad,
        fs,
        with_alpha(theme.dial_selected, alpha),
    );
}

/// One page per caption, side by side, with the spread label and the
/// page buttons underneath.
pub fn draw_book(
    canvas: &mut dyn Canvas,
    text: &mut dyn TextEngine,
    theme: &Theme,
    book: &Scrapbook,
) -> Vec<Rect> {
    if !book.open {
        return Vec::new();
    }
    let size = canvas.size();
    canvas.fill_rect(Rect::new(0.0, 0.0, size.width, size.height), theme.modal_scrim);

    let captions = book.visible(size.width);
    let fs = theme.dialogue_font_size;
    let pad = theme.dialogue_padding;
    let layout = BookLayout::new(book, size.width, size.height, fs);

    for (caption, page) in captions.iter().zip(&layout.pages) {
        canvas.fill_rect(*page, theme.page_bg);
        canvas.stroke_rect(*page, theme.page_text, 1.0);
        let mut y = page.y + pad;
        for line in wrap_lines(text, caption, fs, (page.width - pad * 2.0).max(fs)) {
            text.draw(canvas, &line, page.x + pad, y, fs, theme.page_text);
            y += line_height(fs);
        }
    }

    let label = book.label(size.width);
    let lw = text.measure(&label, fs);
    text.draw(
        canvas,
        &label,
        ((size.width - lw) / 2.0).floor(),
        layout.label_y,
        fs,
        theme.status_text,
    );
    let back = if book.page == 0 { "CLOSE" } else { "\u{25C0} PREV" };
    draw_button(canvas, text, theme, layout.prev, back, theme.status_font_size);
    draw_button(canvas, text, theme, layout.next, "NEXT \u{25B6}", theme.status_font_size);
    draw_button(canvas, text, theme, layout.close, "\u{2715}", theme.status_font_size);
    layout.pages.into_iter().take(captions.len()).collect()
}

/// Status lines stacked from the top-left corner.
pub fn draw_status(canvas: &mut dyn Canvas, text: &mut dyn TextEngine, theme: &Theme, lines: &[String]) {
    let fs = theme.status_font_size;
    let mut y = 4.0;
    for line in lines {
        text.draw(canvas, line, 4.0, y, fs, theme.status_text);
        y += line_height(fs);
    }
}

/// Small "MUTED" tag in the top-right corner while sound is off.
pub fn draw_mute_indicator(canvas: &mut dyn Canvas, text: &mut dyn TextEngine, theme: &Theme) {
    let fs = theme.status_font_size;
    let label = "MUTED";
    let w = text.measure(label, fs);
    let x = (canvas.size().width - w - 4.0).floor();
    text.draw(canvas, label, x, 4.0, fs, theme.status_text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::BookConfig;
    use crate::canvas::{DrawCommand, DrawList};
    use crate::dialogue::{DialogueSink, PromptStyle};
    use crate::lock::{LockConfig, WRONG_CODE};
    use crate::sound::Cue;
    use crate::text::FixedAdvance;

    fn theme() -> Theme {
        Theme::default()
    }

    #[test]
    fn wrap_breaks_on_width() {
        let mut t = FixedAdvance::default();
        let lines = wrap_lines(&mut t, "aa bb cc", 1.0, 5.0);
        assert_eq!(lines, vec!["aa bb".to_string(), "cc".to_string()]);
    }

    #[test]
    fn wrap_keeps_long_word_whole() {
        let mut t = FixedAdvance::default();
        let lines = wrap_lines(&mut t, "abcdefgh ij", 1.0, 4.0);
        assert_eq!(lines, vec!["abcdefgh".to_string(), "ij".to_string()]);
    }

    #[test]
    fn alpha_scales_existing_alpha() {
        assert_eq!(with_alpha([1, 2, 3, 200], 0.5), [1, 2, 3, 100]);
        assert_eq!(with_alpha([1, 2, 3, 255], 2.0)[3], 255);
    }

    #[test]
    fn closed_dialogue_draws_nothing() {
        let mut list = DrawList::new(400.0, 300.0);
        let mut t = FixedAdvance::default();
        let dialogue = DialogueBox::new();
        assert!(draw_dialogue(&mut list, &mut t, &theme(), &dialogue).is_none());
        assert!(list.commands.is_empty());
    }

    #[test]
    fn dialogue_box_sits_at_bottom() {
        let mut list = DrawList::new(400.0, 300.0);
        let mut t = FixedAdvance::default();
        let mut dialogue = DialogueBox::new();
        dialogue.open("ren", &["hello".to_string()]);
        let panel = draw_dialogue(&mut list, &mut t, &theme(), &dialogue).unwrap();
        assert_eq!(panel.bottom(), 300.0 - MARGIN);
        assert_eq!(panel.x, MARGIN);
    }

    #[test]
    fn lock_shake_moves_panel_only_horizontally() {
        let mut t = FixedAdvance::default();
        let mut lock = CombinationLock::new(&LockConfig::default());
        lock.open_modal();
        let mut still = DrawList::new(640.0, 480.0);
        let a = draw_lock(&mut still, &mut t, &theme(), &lock, 0.0).unwrap();
        let mut shaken = DrawList::new(640.0, 480.0);
        let b = draw_lock(&mut shaken, &mut t, &theme(), &lock, 5.0).unwrap();
        assert_eq!(b.x - a.x, 5.0);
        assert_eq!(a.y, b.y);
    }

    #[test]
    fn lock_error_is_drawn_in_danger_colour() {
        let mut t = FixedAdvance::default();
        let mut lock = CombinationLock::new(&LockConfig::default());
        lock.open_modal();
        let mut sounds: Vec<Cue> = Vec::new();
        lock.try_open(&mut sounds);
        assert_eq!(lock.error, Some(WRONG_CODE));
        let mut list = DrawList::new(640.0, 480.0);
        draw_lock(&mut list, &mut t, &theme(), &lock, 0.0);
        let th = theme();
        assert!(list.fills().any(|(_, c)| *c == th.danger));
    }

    #[test]
    fn book_spread_matches_viewport() {
        let mut t = FixedAdvance::default();
        let mut book = Scrapbook::new(&BookConfig::default());
        book.open();
        let mut wide = DrawList::new(1280.0, 720.0);
        assert_eq!(draw_book(&mut wide, &mut t, &theme(), &book).len(), 2);
        let mut narrow = DrawList::new(800.0, 600.0);
        assert_eq!(draw_book(&mut narrow, &mut t, &theme(), &book).len(), 1);
    }

    #[test]
    fn faded_out_intro_is_skipped() {
        let mut t = FixedAdvance::default();
        let mut list = DrawList::new(200.0, 200.0);
        let mut tw = Typewriter::new(PromptStyle::Intro);
        tw.start(&["hi".to_string()], 0.0);
        draw_intro(&mut list, &mut t, &theme(), &tw, 0.0);
        assert!(list.commands.is_empty());
        draw_intro(&mut list, &mut t, &theme(), &tw, 1.0);
        assert!(matches!(list.commands.first(), Some(DrawCommand::FillRect { .. })));
    }
}
