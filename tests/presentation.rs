//! End-to-end walkthroughs of the presentation: intro, scene frames,
//! lock and scrapbook, driven without a window.

use meadow::book::Scrapbook;
use meadow::canvas::{Framebuffer, rgb};
use meadow::components::SpeciesId;
use meadow::config::{SceneConfig, parse_scene_config};
use meadow::dialogue::{Advance, DialogueBox, PROMPT_OPEN, PromptStyle, Typewriter};
use meadow::frame_loop::{FrameTargets, advance_scene};
use meadow::hit_test::{PointerMapper, dispatch_click};
use meadow::lock::{CombinationLock, LockOutcome};
use meadow::scene::Scene;
use meadow::sound::Cue;
use meadow::sprite::{SheetStore, placeholder_sheet};
use meadow::text::FixedAdvance;
use meadow::ui::{self, Theme};

fn revealed_scene(config: &SceneConfig, width: f32, height: f32) -> Scene {
    let mut scene = Scene::from_config(config);
    scene.resize(width, height);
    scene.populate(config);
    scene
}

#[test]
fn intro_runs_to_open_prompt() {
    let config = SceneConfig::default();
    let mut intro = Typewriter::new(PromptStyle::Intro);
    let mut sounds: Vec<Cue> = Vec::new();
    intro.start(&config.intro_lines, 0.0);

    let mut now = 0.0;
    let mut finished = false;
    for _ in 0..config.intro_lines.len() * 2 {
        now += 10_000.0;
        intro.update(now, &mut sounds);
        assert!(!intro.is_typing());
        if intro.is_last_line() {
            assert_eq!(intro.prompt(), PROMPT_OPEN);
        }
        if intro.advance(now) == Advance::Finished {
            finished = true;
            break;
        }
    }
    assert!(finished);
    assert!(sounds.iter().all(|&c| c == Cue::Type));
    assert!(!sounds.is_empty());
}

#[test]
fn frames_compose_grass_actors_and_tags() {
    let config = SceneConfig::default();
    let mut scene = revealed_scene(&config, 640.0, 400.0);
    let mut sheets = SheetStore::new();
    for (i, species) in scene.species.iter().enumerate() {
        sheets.insert(SpeciesId(i), placeholder_sheet(species, rgb(0xff00ff)));
    }
    let theme = Theme::default();
    let mut text = FixedAdvance::default();
    let mut grass = Framebuffer::new(640, scene.grass.strip_height() as u32);
    let mut actors = Framebuffer::new(640, 400);

    for i in 0..30 {
        advance_scene(
            &mut scene,
            FrameTargets {
                grass: &mut grass,
                actors: &mut actors,
            },
            &sheets,
            &mut text,
            &theme,
            i as f64 * 16.0,
        );
    }
    assert_eq!(scene.tick.0, 30);

    let mut frame = Framebuffer::new(640, 400);
    frame.fill(config.sky);
    let ground = 400 - grass.height() as i32;
    frame.composite(&mut grass, 0, ground);
    frame.composite(&mut actors, 0, 0);

    // Sky stays sky above everybody's heads.
    assert_eq!(frame.pixel(2, 2), Some(config.sky));
    // Bottom row is soil.
    assert_eq!(frame.pixel(320, 399), Some(config.grass.soil_dark));
    // Each lead's sprite shows up in the middle of its box.
    for name in ["ren", "kit"] {
        let id = scene.actor_by_name(name).unwrap();
        let b = scene.bounds(id).unwrap();
        let px = frame.pixel((b.x + b.width / 2.0) as u32, (b.y + b.height / 2.0) as u32);
        let magenta = [0xff, 0x00, 0xff, 0xff];
        let dark = [0xcc, 0x00, 0xcc, 0xff];
        assert!(px == Some(magenta) || px == Some(dark), "{name} not drawn: {px:?}");
    }
}

#[test]
fn scaled_pointer_reaches_actor() {
    let config = parse_scene_config("(pixel_scale: 2.0)").unwrap();
    let mut scene = revealed_scene(&config, 512.0, 320.0);
    // The window is twice the canvas size.
    let mapper = PointerMapper {
        display: (1024.0, 640.0),
        backing: (512.0, 320.0),
        origin: (0.0, 0.0),
    };
    let kit = scene.actor_by_name("kit").unwrap();
    let b = scene.bounds(kit).unwrap();
    let (cx, cy) = (b.x + b.width / 2.0, b.y + b.height / 2.0);
    let (x, y) = mapper.to_canvas(cx * 2.0, cy * 2.0);
    assert_eq!((x, y), (cx, cy));

    let mut dialogue = DialogueBox::new();
    let mut sounds: Vec<Cue> = Vec::new();
    dispatch_click(&mut scene, x, y, &mut sounds, &mut dialogue);
    assert!(dialogue.active);
    assert_eq!(dialogue.speaker, "kit");
}

#[test]
fn unlock_then_browse_the_scrapbook() {
    let config = SceneConfig::default();
    let mut lock = CombinationLock::new(&config.lock);
    let mut book = Scrapbook::new(&config.book);
    let mut sounds: Vec<Cue> = Vec::new();

    lock.open_modal();
    assert_eq!(lock.try_open(&mut sounds), LockOutcome::Wrong);
    assert!(lock.modal_open);

    // 31 is one step down from 0; 25 is two steps down on a 0..=26 dial.
    lock.change_dial(0, -1, &mut sounds);
    for _ in 0..5 {
        lock.change_dial(1, 1, &mut sounds);
    }
    lock.change_dial(2, -1, &mut sounds);
    lock.change_dial(2, -1, &mut sounds);
    assert_eq!(lock.values, [31, 5, 25]);
    assert_eq!(lock.error, None);
    assert_eq!(lock.try_open(&mut sounds), LockOutcome::Unlocked);
    assert!(!lock.modal_open);

    book.open();
    let wide = 1280.0;
    let mut turns = 0;
    while book.page + 2 < book.page_count() {
        book.next(wide, &mut sounds);
        turns += 1;
    }
    assert_eq!(turns, 4);
    assert_eq!(book.label(wide), "Page 9 \u{2014} Page 10");
    for _ in 0..=turns {
        book.prev(wide, &mut sounds);
    }
    assert!(!book.open);

    let expected_tail = [Cue::PageTurn; 4];
    let n = sounds.len();
    assert_eq!(sounds[n - 5..n - 1], expected_tail);
    assert_eq!(sounds[n - 1], Cue::BookClose);
    assert!(sounds.contains(&Cue::Wrong));
    assert!(sounds.contains(&Cue::Open));
}

#[test]
fn overlays_paint_over_scene() {
    let theme = Theme::default();
    let mut text = FixedAdvance::default();
    let mut frame = Framebuffer::new(640, 400);
    frame.fill(rgb(0x9fd3e8));

    let mut lock = CombinationLock::new(&SceneConfig::default().lock);
    lock.open_modal();
    let panel = ui::draw_lock(&mut frame, &mut text, &theme, &lock, 0.0).unwrap();
    let inside = frame
        .pixel((panel.x + 4.0) as u32, (panel.bottom() - 4.0) as u32)
        .unwrap();
    assert_eq!(inside, theme.modal_bg);
    // the scrim darkens the sky
    assert_ne!(frame.pixel(1, 1), Some(rgb(0x9fd3e8)));
}

#[test]
fn pointer_alone_unlocks_and_pages_the_scrapbook() {
    let config = SceneConfig::default();
    let mut lock = CombinationLock::new(&config.lock);
    let mut book = Scrapbook::new(&config.book);
    let mut sounds: Vec<Cue> = Vec::new();
    let (w, h) = (800.0, 600.0);
    let centre = |r: meadow::canvas::Rect| (r.x + r.width / 2.0, r.y + r.height / 2.0);

    // The corner button is clear of the lock panel it opens.
    let corner = ui::corner_button(w, h);
    let layout = ui::LockLayout::new(w, h);
    let (cx, cy) = centre(corner);
    assert_eq!(layout.hit(cx, cy), ui::LockHit::Outside);

    lock.open_modal();
    let (x, y) = centre(layout.down[0]);
    ui::click_lock(&mut lock, layout.hit(x, y), &mut sounds);
    for _ in 0..5 {
        let (x, y) = centre(layout.up[1]);
        ui::click_lock(&mut lock, layout.hit(x, y), &mut sounds);
    }
    // Scrolling down over the third dial twice lands on 25.
    let (x, y) = centre(layout.dials[2]);
    ui::wheel_lock(&mut lock, &layout, x, y, -1.0, &mut sounds);
    ui::wheel_lock(&mut lock, &layout, x, y, -1.0, &mut sounds);
    assert_eq!(lock.values, [31, 5, 25]);

    let (x, y) = centre(layout.open);
    assert_eq!(
        ui::click_lock(&mut lock, layout.hit(x, y), &mut sounds),
        Some(LockOutcome::Unlocked)
    );
    assert!(!lock.modal_open);
    // Unlocking does not open the book by itself.
    assert!(!book.open);

    book.open();
    let pages = ui::BookLayout::new(&book, w, h, Theme::default().dialogue_font_size);
    let (x, y) = centre(pages.next);
    ui::click_book(&mut book, pages.hit(x, y), w, &mut sounds);
    ui::click_book(&mut book, pages.hit(x, y), w, &mut sounds);
    assert_eq!(book.label(w), "Page 3");
    let (x, y) = centre(pages.close);
    ui::click_book(&mut book, pages.hit(x, y), w, &mut sounds);
    assert!(!book.open);
    assert_eq!(
        sounds[sounds.len() - 3..],
        [Cue::PageTurn, Cue::PageTurn, Cue::BookClose]
    );
}

#[test]
fn clicking_off_the_lock_dismisses_it() {
    let mut lock = CombinationLock::new(&SceneConfig::default().lock);
    let mut sounds: Vec<Cue> = Vec::new();
    lock.open_modal();
    let layout = ui::LockLayout::new(640.0, 400.0);
    assert_eq!(ui::click_lock(&mut lock, layout.hit(2.0, 2.0), &mut sounds), None);
    assert!(!lock.modal_open);
    assert!(sounds.is_empty());
}
