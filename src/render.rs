use std::collections::BTreeMap;

use image::RgbaImage;

use crate::canvas::{Canvas, Rect};
use crate::components::{ActorId, Species};
use crate::events::Event;
use crate::scene::Scene;
use crate::sprite::SheetStore;
use crate::text::TextEngine;
use crate::ui::Theme;

/// Round to the nearest whole pixel, halves toward +inf.
fn snap(v: f32) -> f32 {
    (v + 0.5).floor()
}

/// Source cell of frame `index` in a horizontal strip.
pub fn frame_rect(species: &Species, index: usize) -> Rect {
    Rect::new(
        (index as u32 * species.frame_w) as f32,
        0.0,
        species.frame_w as f32,
        species.frame_h as f32,
    )
}

/// Draw one sheet cell into `dst`, mirrored about the rect's vertical
/// centreline when `facing_left`. The canvas transform is restored before
/// returning.
pub fn draw_sprite(
    canvas: &mut dyn Canvas,
    sheet: &RgbaImage,
    species: &Species,
    frame: usize,
    dst: Rect,
    facing_left: bool,
) {
    let src = frame_rect(species, frame);
    canvas.save();
    if facing_left {
        canvas.translate(dst.x + dst.width, 0.0);
        canvas.scale(-1.0, 1.0);
        canvas.draw_image(sheet, src, Rect::new(0.0, dst.y, dst.width, dst.height));
    } else {
        canvas.draw_image(sheet, src, dst);
    }
    canvas.restore();
}

/// Label box centred on `cx`, its bottom edge `theme.tag_lift` above
/// `top_y`. Returns the filled box.
pub fn draw_nametag(
    canvas: &mut dyn Canvas,
    text: &mut dyn TextEngine,
    theme: &Theme,
    cx: f32,
    top_y: f32,
    label: &str,
) -> Rect {
    let font_size = theme.tag_font_size;
    let pad = theme.tag_padding;
    let tw = text.measure(label, font_size);
    let bw = tw + pad * 2.0;
    let bh = font_size + pad * 2.0;
    let bx = cx - bw / 2.0;
    let by = top_y - bh - theme.tag_lift;

    let tag = Rect::new(snap(bx), snap(by), bw.ceil(), bh.ceil());
    canvas.fill_rect(tag, theme.tag_bg);
    canvas.stroke_rect(
        Rect::new(tag.x + 0.5, tag.y + 0.5, tag.width - 1.0, tag.height - 1.0),
        theme.tag_border,
        theme.tag_border_width,
    );
    text.draw(
        canvas,
        label,
        snap(bx + pad),
        snap(by + pad),
        font_size,
        theme.tag_text,
    );
    tag
}

/// Actors in draw order: ascending layer, spawn order within a layer.
pub fn draw_order(scene: &Scene) -> Vec<ActorId> {
    let mut ids: Vec<ActorId> = scene
        .order
        .iter()
        .copied()
        .filter(|&id| scene.actors.contains_key(id))
        .collect();
    ids.sort_by_key(|&id| scene.actors.get(id).map_or(0, |a| a.layer));
    ids
}

/// Clear `canvas` and composite every actor whose sheet is loaded, with
/// nametags over labelled actors.
///
/// This function is READ-ONLY and does not modify scene state.
pub fn draw_scene(
    canvas: &mut dyn Canvas,
    scene: &Scene,
    sheets: &SheetStore,
    text: &mut dyn TextEngine,
    theme: &Theme,
) {
    canvas.clear();
    for id in draw_order(scene) {
        let Some(actor) = scene.actors.get(id) else {
            continue;
        };
        let Some(species) = scene.species.get(actor.species.0) else {
            continue;
        };
        let Some(sheet) = sheets.ready(actor.species) else {
            continue;
        };
        let Some(bounds) = scene.bounds(id) else {
            continue;
        };
        let dst = Rect::new(snap(bounds.x), snap(bounds.y), bounds.width, bounds.height);
        draw_sprite(canvas, sheet, species, actor.frame, dst, actor.facing_left);

        if let Some(label) = &actor.label {
            draw_nametag(
                canvas,
                text,
                theme,
                snap(bounds.x + bounds.width / 2.0),
                snap(bounds.y),
                label,
            );
        }
    }
}

/// Render a status line showing current tick, actor count, and species
/// breakdown.
///
/// Format: "Tick: N | Actors: M | species1:count species2:count"
///
/// This function is READ-ONLY and does not modify scene state.
pub fn render_status(scene: &Scene) -> String {
    let mut status = format!("Tick: {} | Actors: {}", scene.tick.0, scene.actors.len());

    let mut species_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for actor in scene.actors.values() {
        if let Some(sp) = scene.species.get(actor.species.0) {
            *species_counts.entry(sp.name.as_str()).or_insert(0) += 1;
        }
    }
    if !species_counts.is_empty() {
        status.push_str(" | ");
        let parts: Vec<String> = species_counts
            .iter()
            .map(|(name, count)| format!("{name}:{count}"))
            .collect();
        status.push_str(&parts.join(" "));
    }

    status
}

/// Render recent events as a multi-line string, newest last.
///
/// This function is READ-ONLY and does not modify scene state.
pub fn render_recent_events(scene: &Scene, count: usize) -> String {
    if scene.events.is_empty() {
        return String::new();
    }

    let resolve = |id: &ActorId| -> String {
        scene
            .actors
            .get(*id)
            .map(|a| a.name.clone())
            .unwrap_or_else(|| "?".to_string())
    };

    let lines: Vec<String> = scene
        .events
        .recent(count)
        .map(|event| match event {
            Event::Spawned { actor, tick } => format!("[{}] {} spawned", tick.0, resolve(actor)),
            Event::Turned {
                actor,
                facing_left,
                x,
                tick,
            } => format!(
                "[{}] {} turned {} at {:.0}",
                tick.0,
                resolve(actor),
                if *facing_left { "left" } else { "right" },
                x
            ),
            Event::Clicked { actor, tick } => format!("[{}] {} clicked", tick.0, resolve(actor)),
            Event::DialogueOpened { actor, tick } => {
                format!("[{}] {} speaks", tick.0, resolve(actor))
            }
            Event::CuePlayed { actor, cue, tick } => {
                format!("[{}] {} {:?}", tick.0, resolve(actor), cue)
            }
            Event::Resized {
                width,
                height,
                tick,
            } => format!("[{}] resized to {:.0}x{:.0}", tick.0, width, height),
        })
        .collect();

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, DrawList};
    use crate::components::{Actor, Motion};
    use crate::text::FixedAdvance;

    fn lead() -> Species {
        Species {
            name: "lead".into(),
            sheet_path: String::new(),
            frame_count: 6,
            frame_w: 41,
            frame_h: 100,
            frame_interval_ms: 100.0,
            ground_offset: 0.0,
            placeholder: None,
        }
    }

    fn one_actor_scene(facing_left: bool, label: Option<&str>) -> (Scene, SheetStore) {
        let mut scene = Scene::new_with_seed(1);
        scene.resize(1000.0, 600.0);
        let sp = scene.add_species(lead());
        let mut a = Actor::new("ren", sp, 0.0);
        a.x = 100.0;
        a.frame = 2;
        a.facing_left = facing_left;
        a.label = label.map(str::to_string);
        a.motion = Motion::Patrol { speed: 1.0 };
        scene.spawn(a);
        let mut sheets = SheetStore::new();
        sheets.insert(sp, RgbaImage::new(246, 100));
        (scene, sheets)
    }

    #[test]
    fn frame_rect_selects_strip_cell() {
        assert_eq!(frame_rect(&lead(), 3), Rect::new(123.0, 0.0, 41.0, 100.0));
    }

    #[test]
    fn mirrored_sprite_lands_on_same_rect() {
        for facing_left in [false, true] {
            let (scene, sheets) = one_actor_scene(facing_left, None);
            let mut list = DrawList::new(1000.0, 600.0);
            draw_scene(&mut list, &scene, &sheets, &mut FixedAdvance::default(), &Theme::default());
            let (src, dst, mirrored) = list.images().next().expect("sprite drawn");
            assert_eq!(*src, Rect::new(82.0, 0.0, 41.0, 100.0));
            assert_eq!(*dst, Rect::new(100.0, 484.0, 41.0, 100.0));
            assert_eq!(mirrored, facing_left);
            assert_eq!(list.depth(), 0);
            assert_eq!(list.transform(), crate::canvas::Affine::IDENTITY);
        }
    }

    #[test]
    fn unloaded_sheet_skips_draw() {
        let (scene, _) = one_actor_scene(false, Some("ren"));
        let mut list = DrawList::new(1000.0, 600.0);
        draw_scene(
            &mut list,
            &scene,
            &SheetStore::new(),
            &mut FixedAdvance::default(),
            &Theme::default(),
        );
        assert_eq!(list.commands, vec![DrawCommand::Clear]);
    }

    #[test]
    fn nametag_centred_above_sprite() {
        let theme = Theme::default();
        let mut list = DrawList::new(200.0, 200.0);
        let mut text = FixedAdvance::default();
        // "ren" is 21px wide at 7px: box 29 x 15
        let tag = draw_nametag(&mut list, &mut text, &theme, 120.0, 100.0, "ren");
        assert_eq!(tag.width, 29.0);
        assert_eq!(tag.height, 15.0);
        assert_eq!(tag.y, 100.0 - 15.0 - 6.0);
        assert_eq!(tag.x, 106.0);
        let glyphs: Vec<&Rect> = list.fills().skip(1).map(|(r, _)| r).collect();
        assert_eq!(glyphs.len(), 3);
        assert_eq!(glyphs[0].x, 110.0);
        assert_eq!(glyphs[0].y, 83.0);
    }

    #[test]
    fn labelled_actor_gets_tag_after_sprite() {
        let (scene, sheets) = one_actor_scene(true, Some("ren"));
        let mut list = DrawList::new(1000.0, 600.0);
        draw_scene(&mut list, &scene, &sheets, &mut FixedAdvance::default(), &Theme::default());
        assert!(matches!(list.commands[1], DrawCommand::Image { .. }));
        assert!(matches!(list.commands[2], DrawCommand::FillRect { .. }));
        assert!(matches!(list.commands[3], DrawCommand::StrokeRect { .. }));
    }

    #[test]
    fn draw_order_is_layer_then_spawn() {
        let (mut scene, _) = one_actor_scene(false, None);
        let sp = scene.actors[scene.order[0]].species;
        let mut back = Actor::new("back", sp, 0.0);
        back.layer = -1;
        let back = scene.spawn(back);
        let first = scene.order[0];
        assert_eq!(draw_order(&scene), vec![back, first]);
    }

    #[test]
    fn status_counts_species() {
        let (scene, _) = one_actor_scene(false, None);
        assert_eq!(render_status(&scene), "Tick: 0 | Actors: 1 | lead:1");
        assert!(render_recent_events(&scene, 5).contains("ren spawned"));
    }
}
