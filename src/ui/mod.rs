mod animation;
mod controls;
mod keybindings;
mod overlay;
mod theme;

pub use animation::{Anim, Animator, Easing};
pub use controls::{
    BookHit, BookLayout, LockHit, LockLayout, click_book, click_dialogue, click_lock,
    corner_button, dialogue_panel, wheel_lock,
};
pub use keybindings::{Action, KeyBindings, KeyCombo, ModifierFlags};
pub use overlay::{
    UNLOCK_BANNER, draw_banner, draw_book, draw_corner_button, draw_dialogue, draw_intro,
    draw_lock, draw_mute_indicator, draw_status, with_alpha, wrap_lines,
};
pub use theme::Theme;
