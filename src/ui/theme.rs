use crate::canvas::{Rgba, rgb, rgba};

/// Centralized visual style constants.
///
/// Single global theme. No runtime switching. Overlays and nametags read
/// from Theme instead of hardcoding colors.
#[derive(Debug, Clone)]
pub struct Theme {
    // -- Nametag --
    /// Nametag fill: #1a25306b
    pub tag_bg: Rgba,
    /// Nametag border: #a8bfcf6e
    pub tag_border: Rgba,
    pub tag_border_width: f32,
    /// Nametag text: #f0e8d0
    pub tag_text: Rgba,
    pub tag_font_size: f32,
    pub tag_padding: f32,
    /// Gap between the sprite's top edge and the tag's bottom edge.
    pub tag_lift: f32,

    // -- Dialogue box --
    pub dialogue_bg: Rgba,
    pub dialogue_border: Rgba,
    pub dialogue_text: Rgba,
    pub dialogue_prompt: Rgba,
    pub dialogue_font_size: f32,
    pub dialogue_padding: f32,
    pub dialogue_height: f32,

    // -- Intro screen --
    pub intro_bg: Rgba,

    // -- Lock modal --
    pub modal_scrim: Rgba,
    pub modal_bg: Rgba,
    pub modal_border: Rgba,
    pub dial_bg: Rgba,
    pub dial_selected: Rgba,
    pub dial_text: Rgba,
    /// Wrong-code message: #c04040
    pub danger: Rgba,
    /// Maximum horizontal shake offset in pixels.
    pub shake_amplitude: f32,

    // -- Scrapbook --
    pub page_bg: Rgba,
    pub page_text: Rgba,

    // -- Status strip --
    pub status_text: Rgba,
    pub status_font_size: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            tag_bg: rgba(0x1a25306b),
            tag_border: rgba(0xa8bfcf6e),
            tag_border_width: 1.5,
            tag_text: rgb(0xf0e8d0),
            tag_font_size: 7.0,
            tag_padding: 4.0,
            tag_lift: 6.0,

            dialogue_bg: rgba(0x1a2530e0),
            dialogue_border: rgb(0xa8bfcf),
            dialogue_text: rgb(0xf0e8d0),
            dialogue_prompt: rgb(0xc8a850),
            dialogue_font_size: 12.0,
            dialogue_padding: 12.0,
            dialogue_height: 96.0,

            intro_bg: rgb(0x10161c),

            modal_scrim: rgba(0x00000099),
            modal_bg: rgb(0x2b2118),
            modal_border: rgb(0xc8a850),
            dial_bg: rgb(0x1a1410),
            dial_selected: rgb(0xc8a850),
            dial_text: rgb(0xf0e6d2),
            danger: rgb(0xc04040),
            shake_amplitude: 8.0,

            page_bg: rgb(0xd4b896),
            page_text: rgb(0x3c2a1a),

            status_text: rgb(0xf0e6d2),
            status_font_size: 9.0,
        }
    }
}
