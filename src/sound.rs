//! Short fire-and-forget sound cues plus one looping music track.
//!
//! Callers only ever say "play this cue"; whether anything is audible
//! depends on the mute toggle and on the `audio` cargo feature.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Cue {
    /// Typewriter keystroke.
    Type,
    /// Lock dial click. Shares the keystroke sample at a louder volume.
    Dial,
    Wrong,
    Open,
    Quack,
    PageTurn,
    BookClose,
}

impl Cue {
    pub const ALL: [Cue; 7] = [
        Cue::Type,
        Cue::Dial,
        Cue::Wrong,
        Cue::Open,
        Cue::Quack,
        Cue::PageTurn,
        Cue::BookClose,
    ];

    pub fn volume(self) -> f32 {
        match self {
            Cue::Type => 0.2,
            Cue::Dial => 0.3,
            Cue::Wrong | Cue::Open => 0.5,
            Cue::Quack => 0.8,
            Cue::PageTurn | Cue::BookClose => 1.0,
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Cue::Type | Cue::Dial => "type.wav",
            Cue::Wrong => "wrong.mp3",
            Cue::Open => "open.mp3",
            Cue::Quack => "quack.mp3",
            Cue::PageTurn => "page_turn.mp3",
            Cue::BookClose => "book_close.mp3",
        }
    }
}

/// Anything that can play a cue. Never blocks, never reports failure.
pub trait SoundPlayer {
    fn play(&mut self, cue: Cue);
}

/// Recording player for tests and headless runs.
impl SoundPlayer for Vec<Cue> {
    fn play(&mut self, cue: Cue) {
        self.push(cue);
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    pub enabled: bool,
    /// Multiplies every cue's own volume.
    pub master_volume: f32,
    pub asset_dir: String,
    /// Looping background track inside `asset_dir`. Empty disables it.
    pub music: String,
    pub music_volume: f32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            master_volume: 1.0,
            asset_dir: "assets/sfx".to_string(),
            music: "bgm.mp3".to_string(),
            music_volume: 0.2,
        }
    }
}

/// The app's player: honours the mute toggle and logs every cue.
///
/// Muting keeps the music track running at zero volume, so unmuting
/// picks it up mid-loop.
pub struct SoundBoard {
    enabled: bool,
    master_volume: f32,
    music_volume: f32,
    music_started: bool,
    #[cfg(feature = "audio")]
    output: Option<output::Output>,
}

impl SoundBoard {
    pub fn new(config: &SoundConfig) -> Self {
        Self {
            enabled: config.enabled,
            master_volume: config.master_volume.clamp(0.0, 1.0),
            music_volume: config.music_volume.clamp(0.0, 1.0),
            music_started: false,
            #[cfg(feature = "audio")]
            output: output::Output::open(&config.asset_dir, &config.music),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn music_started(&self) -> bool {
        self.music_started
    }

    /// Volume the music track is playing at right now.
    pub fn current_music_volume(&self) -> f32 {
        if self.music_started && self.enabled {
            self.music_volume * self.master_volume
        } else {
            0.0
        }
    }

    /// Start the looping track. Later calls are no-ops.
    pub fn start_music(&mut self) {
        if self.music_started {
            return;
        }
        self.music_started = true;
        log::debug!("music started at {:.2}", self.current_music_volume());
        #[cfg(feature = "audio")]
        if let Some(out) = &mut self.output {
            out.start_music(self.current_music_volume());
        }
    }

    /// Flip mute. Returns the new enabled state.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        log::info!("sound {}", if self.enabled { "on" } else { "off" });
        #[cfg(feature = "audio")]
        if let Some(out) = &self.output {
            out.set_music_volume(self.current_music_volume());
        }
        self.enabled
    }
}

impl SoundPlayer for SoundBoard {
    fn play(&mut self, cue: Cue) {
        if !self.enabled {
            return;
        }
        let volume = cue.volume() * self.master_volume;
        log::debug!("cue {:?} at {:.2}", cue, volume);
        #[cfg(feature = "audio")]
        if let Some(out) = &self.output {
            out.play(cue, volume);
        }
    }
}

#[cfg(feature = "audio")]
mod output {
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::path::Path;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

    use super::Cue;

    pub struct Output {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        samples: HashMap<Cue, Vec<u8>>,
        music: Option<Vec<u8>>,
        music_sink: Option<Sink>,
    }

    impl Output {
        /// Open the default device and read every cue file up front.
        /// Missing files only silence their own cue.
        pub fn open(dir: &str, music: &str) -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("no audio device: {}, sound disabled", e);
                    return None;
                }
            };
            let mut samples = HashMap::new();
            for cue in Cue::ALL {
                let path = Path::new(dir).join(cue.file_name());
                match std::fs::read(&path) {
                    Ok(bytes) => {
                        samples.insert(cue, bytes);
                    }
                    Err(e) => log::warn!("failed to read {}: {}", path.display(), e),
                }
            }
            let music = if music.is_empty() {
                None
            } else {
                let path = Path::new(dir).join(music);
                std::fs::read(&path)
                    .map_err(|e| log::warn!("failed to read {}: {}", path.display(), e))
                    .ok()
            };
            Some(Self {
                _stream: stream,
                handle,
                samples,
                music,
                music_sink: None,
            })
        }

        pub fn start_music(&mut self, volume: f32) {
            let Some(bytes) = &self.music else {
                return;
            };
            let source = match Decoder::new_looped(Cursor::new(bytes.clone())) {
                Ok(source) => source,
                Err(e) => {
                    log::warn!("music track undecodable: {}", e);
                    return;
                }
            };
            let Ok(sink) = Sink::try_new(&self.handle) else {
                return;
            };
            sink.set_volume(volume);
            sink.append(source);
            self.music_sink = Some(sink);
        }

        pub fn set_music_volume(&self, volume: f32) {
            if let Some(sink) = &self.music_sink {
                sink.set_volume(volume);
            }
        }

        pub fn play(&self, cue: Cue, volume: f32) {
            let Some(bytes) = self.samples.get(&cue) else {
                return;
            };
            let Ok(sink) = Sink::try_new(&self.handle) else {
                return;
            };
            sink.set_volume(volume);
            let Ok(source) = Decoder::new(Cursor::new(bytes.clone())) else {
                return;
            };
            sink.append(source);
            sink.detach();
        }
    }
}
