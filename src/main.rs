use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{ModifiersState, PhysicalKey};
use winit::window::{CursorIcon, Window, WindowId};

use meadow::book::Scrapbook;
use meadow::canvas::Framebuffer;
use meadow::config::{self, SceneConfig};
use meadow::dialogue::{Advance, DialogueBox, PromptStyle, Typewriter};
use meadow::frame_loop::{FrameLoop, FrameTargets, advance_scene};
use meadow::hit_test::{CursorKind, PointerMapper, dispatch_click, hover_cursor};
use meadow::lock::{CombinationLock, LockOutcome, SHAKE_MS};
use meadow::present::FramePresenter;
use meadow::render::{render_recent_events, render_status};
use meadow::scene::Scene;
use meadow::sound::{Cue, SoundBoard, SoundPlayer};
use meadow::sprite::SheetStore;
use meadow::text::CosmicText;
use meadow::ui::{self, Action, Anim, Animator, Easing, KeyBindings, KeyCombo, ModifierFlags};

/// Intro card fade-out once the visitor presses open.
const INTRO_FADE_MS: u64 = 800;
const BANNER_MS: u64 = 2000;

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    window: Arc<Window>,
}

impl GpuState {
    fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("failed to find a suitable GPU adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("meadow_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            },
            None,
        ))
        .expect("failed to create GPU device");

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Self {
            surface,
            device,
            queue,
            config,
            window,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    fn render(&self, presenter: &FramePresenter) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("out of GPU memory");
                return;
            }
            Err(e) => {
                log::warn!("surface error: {e:?}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("present_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("present_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            presenter.render(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

/// Where the visitor is in the presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Intro card typing over a blank background.
    Intro,
    /// Scene running underneath the fading intro card.
    Revealing,
    Scene,
}

struct App {
    gpu: Option<GpuState>,
    presenter: Option<FramePresenter>,
    config: SceneConfig,
    scene: Scene,
    sheets: SheetStore,
    text: CosmicText,
    theme: ui::Theme,
    keys: KeyBindings,
    sounds: SoundBoard,
    frame_loop: FrameLoop,
    animator: Animator,
    phase: Phase,
    intro: Typewriter,
    dialogue: DialogueBox,
    lock: CombinationLock,
    book: Scrapbook,
    show_status: bool,
    // Composition targets, all at canvas resolution.
    frame: Framebuffer,
    grass_layer: Framebuffer,
    actor_layer: Framebuffer,
    pointer: PointerMapper,
    cursor_pos: winit::dpi::PhysicalPosition<f64>,
    cursor: CursorKind,
    modifiers: ModifiersState,
    started: Instant,
}

impl App {
    fn new(config: SceneConfig) -> Self {
        let scene = Scene::from_config(&config);
        let mut intro = Typewriter::new(PromptStyle::Intro);
        intro.start(&config.intro_lines, 0.0);
        Self {
            gpu: None,
            presenter: None,
            scene,
            sheets: SheetStore::new(),
            text: CosmicText::new(),
            theme: ui::Theme::default(),
            keys: KeyBindings::defaults(),
            sounds: SoundBoard::new(&config.sound),
            frame_loop: FrameLoop::new(),
            animator: Animator::new(),
            phase: Phase::Intro,
            intro,
            dialogue: DialogueBox::new(),
            lock: CombinationLock::new(&config.lock),
            book: Scrapbook::new(&config.book),
            show_status: false,
            frame: Framebuffer::new(1, 1),
            grass_layer: Framebuffer::new(1, 1),
            actor_layer: Framebuffer::new(1, 1),
            pointer: PointerMapper::identity(1.0, 1.0),
            cursor_pos: winit::dpi::PhysicalPosition::new(0.0, 0.0),
            cursor: CursorKind::Default,
            modifiers: ModifiersState::empty(),
            started: Instant::now(),
            config,
        }
    }

    /// Wall-clock milliseconds since launch. Drives overlays, which keep
    /// animating while the scene loop is paused.
    fn wall_ms(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.started).as_secs_f64() * 1000.0
    }

    fn canvas_size(&self) -> (u32, u32) {
        (self.frame.width(), self.frame.height())
    }

    /// Reallocate canvases for a new window size and re-lay the scene.
    fn apply_window_size(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        let scale = self.config.pixel_scale.max(1.0);
        let w = ((size.width as f32 / scale).floor() as u32).max(1);
        let h = ((size.height as f32 / scale).floor() as u32).max(1);
        self.frame.resize(w, h);
        self.actor_layer.resize(w, h);
        self.grass_layer
            .resize(w, self.scene.grass.strip_height().ceil() as u32);
        self.pointer = PointerMapper {
            display: (size.width as f32, size.height as f32),
            backing: (w as f32, h as f32),
            origin: (0.0, 0.0),
        };
        self.scene.resize(w as f32, h as f32);
        log::debug!("canvas {}x{} (window {}x{})", w, h, size.width, size.height);
    }

    /// Start the fade and bring up the scene underneath it.
    fn reveal(&mut self, now: Instant) {
        if self.phase != Phase::Intro {
            return;
        }
        self.intro.skip();
        self.phase = Phase::Revealing;
        self.animator.start(
            Anim::IntroFade,
            1.0,
            0.0,
            Duration::from_millis(INTRO_FADE_MS),
            Easing::Linear,
            now,
        );
        self.sounds.play(Cue::Open);
        self.sounds.start_music();
        let (w, h) = self.canvas_size();
        self.scene.resize(w as f32, h as f32);
        self.scene.populate(&self.config);
        self.sheets
            .load_all(&self.scene.species, &self.config.asset_dir);
        self.frame_loop.start(now);
    }

    fn advance_intro(&mut self, now: Instant) {
        let wall = self.wall_ms(now);
        if self.intro.advance(wall) == Advance::Finished {
            self.reveal(now);
        }
    }

    fn modal_open(&self) -> bool {
        self.lock.modal_open || self.book.open
    }

    /// Pointer position in canvas pixels.
    fn pointer_canvas(&self) -> (f32, f32) {
        self.pointer
            .to_canvas(self.cursor_pos.x as f32, self.cursor_pos.y as f32)
    }

    fn handle_click(&mut self, now: Instant) {
        match self.phase {
            Phase::Intro => self.advance_intro(now),
            Phase::Revealing => {}
            Phase::Scene => {
                let (x, y) = self.pointer_canvas();
                let (w, h) = self.canvas_size();
                let (w, h) = (w as f32, h as f32);
                if self.lock.modal_open {
                    let hit = ui::LockLayout::new(w, h).hit(x, y);
                    if let Some(outcome) = ui::click_lock(&mut self.lock, hit, &mut self.sounds) {
                        self.on_lock_outcome(outcome, now);
                    }
                } else if self.book.open {
                    let layout = ui::BookLayout::new(&self.book, w, h, self.theme.dialogue_font_size);
                    ui::click_book(&mut self.book, layout.hit(x, y), w, &mut self.sounds);
                } else if self.dialogue.active {
                    let panel = ui::dialogue_panel(w, h, &self.theme);
                    let wall = self.wall_ms(now);
                    ui::click_dialogue(&mut self.dialogue, panel, x, y, wall);
                } else if ui::corner_button(w, h).contains_inclusive(x, y) {
                    self.open_book_or_lock();
                } else {
                    dispatch_click(&mut self.scene, x, y, &mut self.sounds, &mut self.dialogue);
                }
            }
        }
    }

    /// Scrolling over the open lock turns a dial.
    fn handle_wheel(&mut self, lines_up: f32) {
        if self.phase != Phase::Scene || !self.lock.modal_open {
            return;
        }
        let (x, y) = self.pointer_canvas();
        let (w, h) = self.canvas_size();
        let layout = ui::LockLayout::new(w as f32, h as f32);
        ui::wheel_lock(&mut self.lock, &layout, x, y, lines_up, &mut self.sounds);
    }

    fn update_cursor(&mut self) {
        let (x, y) = self.pointer_canvas();
        let (w, h) = self.canvas_size();
        let (w, h) = (w as f32, h as f32);
        let on_button = |yes: bool| if yes { CursorKind::Pointer } else { CursorKind::Default };
        let kind = match self.phase {
            Phase::Scene if self.lock.modal_open => {
                on_button(ui::LockLayout::new(w, h).hit(x, y).is_button())
            }
            Phase::Scene if self.book.open => on_button(
                ui::BookLayout::new(&self.book, w, h, self.theme.dialogue_font_size)
                    .hit(x, y)
                    .is_button(),
            ),
            Phase::Scene if self.dialogue.active => CursorKind::Default,
            Phase::Scene if ui::corner_button(w, h).contains_inclusive(x, y) => {
                CursorKind::Pointer
            }
            Phase::Scene => hover_cursor(&self.scene, x, y),
            _ => CursorKind::Default,
        };
        if kind != self.cursor {
            self.cursor = kind;
            if let Some(gpu) = &self.gpu {
                gpu.window.set_cursor(match kind {
                    CursorKind::Pointer => CursorIcon::Pointer,
                    CursorKind::Default => CursorIcon::Default,
                });
            }
        }
    }

    fn open_book_or_lock(&mut self) {
        if self.phase != Phase::Scene || self.dialogue.active || self.modal_open() {
            return;
        }
        if self.lock.unlocked {
            self.book.open();
        } else {
            self.lock.open_modal();
        }
    }

    fn try_combination(&mut self, now: Instant) {
        let outcome = self.lock.try_open(&mut self.sounds);
        self.on_lock_outcome(outcome, now);
    }

    /// Unlocking only arms the scrapbook button; the visitor opens the
    /// book themselves.
    fn on_lock_outcome(&mut self, outcome: LockOutcome, now: Instant) {
        match outcome {
            LockOutcome::Wrong => self.animator.start(
                Anim::LockShake,
                0.0,
                1.0,
                Duration::from_millis(SHAKE_MS as u64),
                Easing::Linear,
                now,
            ),
            LockOutcome::Unlocked => {
                self.animator.start(
                    Anim::BannerFade,
                    1.0,
                    0.0,
                    Duration::from_millis(BANNER_MS),
                    Easing::EaseOut,
                    now,
                );
            }
            LockOutcome::AlreadyOpen => self.book.open(),
        }
    }

    fn handle_action(&mut self, action: Action, now: Instant, event_loop: &ActiveEventLoop) {
        let width = self.frame.width() as f32;
        match action {
            Action::ToggleSound => {
                self.sounds.toggle();
            }
            Action::ToggleStatus => self.show_status = !self.show_status,
            Action::PauseLoop if self.phase != Phase::Intro => {
                if self.frame_loop.is_running() {
                    self.frame_loop.stop(now);
                } else {
                    self.frame_loop.start(now);
                }
            }
            Action::Advance if self.phase == Phase::Intro => self.advance_intro(now),
            Action::CloseTopmost if self.phase == Phase::Intro => self.reveal(now),
            Action::CloseTopmost if self.phase == Phase::Scene => {
                if self.dialogue.active {
                    self.dialogue.close();
                } else if self.book.open {
                    self.book.close(&mut self.sounds);
                } else if self.lock.modal_open {
                    self.lock.close_modal();
                } else {
                    event_loop.exit();
                }
            }
            Action::Advance if self.lock.modal_open => self.try_combination(now),
            Action::Advance if self.dialogue.active => {
                let wall = self.wall_ms(now);
                self.dialogue.advance(wall);
            }
            Action::OpenLock | Action::OpenBook => self.open_book_or_lock(),
            Action::Up if self.lock.modal_open => {
                let dial = self.lock.selected;
                self.lock.change_dial(dial, 1, &mut self.sounds);
            }
            Action::Down if self.lock.modal_open => {
                let dial = self.lock.selected;
                self.lock.change_dial(dial, -1, &mut self.sounds);
            }
            Action::Left if self.lock.modal_open => self.lock.select(-1),
            Action::Right if self.lock.modal_open => self.lock.select(1),
            Action::Left if self.book.open => self.book.prev(width, &mut self.sounds),
            Action::Right if self.book.open => self.book.next(width, &mut self.sounds),
            _ => {}
        }
    }

    /// Tick the scene, compose every layer, draw overlays.
    fn compose(&mut self, now: Instant) {
        let wall = self.wall_ms(now);

        if self.phase == Phase::Intro {
            self.intro.update(wall, &mut self.sounds);
        }
        if self.phase == Phase::Revealing && self.animator.is_done(Anim::IntroFade, now) {
            self.animator.remove(Anim::IntroFade);
            self.phase = Phase::Scene;
        }
        self.dialogue.update(wall, &mut self.sounds);
        self.sheets.poll(&self.scene.species);

        self.frame_loop.run_frame(now, |timestamp_ms| {
            advance_scene(
                &mut self.scene,
                FrameTargets {
                    grass: &mut self.grass_layer,
                    actors: &mut self.actor_layer,
                },
                &self.sheets,
                &mut self.text,
                &self.theme,
                timestamp_ms,
            );
        });

        self.frame.fill(self.config.sky);
        if self.phase != Phase::Intro {
            let ground = self.frame.height() as i32 - self.grass_layer.height() as i32;
            self.frame.composite(&mut self.grass_layer, 0, ground);
            self.frame.composite(&mut self.actor_layer, 0, 0);
        }

        let theme = &self.theme;
        let canvas = &mut self.frame;
        let text = &mut self.text;
        match self.phase {
            Phase::Intro => ui::draw_intro(canvas, text, theme, &self.intro, 1.0),
            Phase::Revealing => {
                let alpha = self.animator.get(Anim::IntroFade, now).unwrap_or(0.0);
                ui::draw_intro(canvas, text, theme, &self.intro, alpha);
            }
            Phase::Scene => {
                ui::draw_corner_button(canvas, text, theme, self.lock.unlocked);
                ui::draw_dialogue(canvas, text, theme, &self.dialogue);
                ui::draw_book(canvas, text, theme, &self.book);
                let shake = self
                    .animator
                    .shake_offset(Anim::LockShake, theme.shake_amplitude, now);
                ui::draw_lock(canvas, text, theme, &self.lock, shake);
                if let Some(alpha) = self.animator.get(Anim::BannerFade, now) {
                    ui::draw_banner(canvas, text, theme, ui::UNLOCK_BANNER, alpha);
                }
            }
        }

        if self.show_status {
            let mut lines = vec![render_status(&self.scene)];
            if !self.frame_loop.is_running() {
                lines.push("PAUSED".to_string());
            }
            lines.extend(
                render_recent_events(&self.scene, 5)
                    .lines()
                    .map(str::to_string),
            );
            ui::draw_status(canvas, text, theme, &lines);
        }
        if !self.sounds.is_enabled() {
            ui::draw_mute_indicator(canvas, text, theme);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Meadow")
            .with_inner_size(winit::dpi::LogicalSize::new(1024.0, 640.0));

        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));
        let gpu = GpuState::new(window.clone());
        self.apply_window_size(window.inner_size());
        let (w, h) = self.canvas_size();
        let presenter = FramePresenter::new(&gpu.device, &gpu.queue, gpu.surface_format(), w, h);

        self.gpu = Some(gpu);
        self.presenter = Some(presenter);
        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let now = Instant::now();
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_pos = position;
                self.update_cursor();
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                let PhysicalKey::Code(key) = event.physical_key else {
                    return;
                };
                let combo = KeyCombo {
                    modifiers: ModifierFlags {
                        shift: self.modifiers.shift_key(),
                        ctrl: self.modifiers.control_key(),
                        alt: self.modifiers.alt_key(),
                    },
                    key,
                };
                if let Some(action) = self.keys.lookup(combo) {
                    self.handle_action(action, now, event_loop);
                    self.update_cursor();
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.handle_click(now);
                self.update_cursor();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines_up = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32,
                };
                self.handle_wheel(lines_up);
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(new_size);
                }
                if new_size.width > 0 && new_size.height > 0 {
                    self.apply_window_size(new_size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.compose(now);
                if let (Some(gpu), Some(presenter)) = (self.gpu.as_ref(), self.presenter.as_mut()) {
                    presenter.upload(&gpu.device, &gpu.queue, &mut self.frame);
                    gpu.render(presenter);
                    gpu.window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

fn main() {
    env_logger::init();

    let config = config::load_scene_config(config::DEFAULT_PATH);
    log::info!(
        "{} species, {} actors configured",
        config.species.len(),
        config.actors.len()
    );

    let event_loop = EventLoop::new().expect("create event loop");
    let mut app = App::new(config);
    event_loop.run_app(&mut app).expect("run event loop");
}
