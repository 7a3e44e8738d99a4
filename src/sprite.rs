//! Sprite sheet loading.
//!
//! Sheets decode on background threads; the render loop polls once per
//! frame and simply skips actors whose sheet is not ready yet.

use std::path::Path;
use std::sync::mpsc::{Receiver, Sender, channel};

use image::{Rgba as Pixel, RgbaImage};

use crate::canvas::Rgba;
use crate::components::{Species, SpeciesId};

#[derive(Debug, Clone)]
pub enum SheetState {
    Pending,
    Ready(RgbaImage),
    Failed(String),
}

type Decoded = (SpeciesId, Result<RgbaImage, String>);

pub struct SheetStore {
    sheets: Vec<SheetState>,
    tx: Sender<Decoded>,
    rx: Receiver<Decoded>,
}

impl SheetStore {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            sheets: Vec::new(),
            tx,
            rx,
        }
    }

    fn slot(&mut self, id: SpeciesId) -> &mut SheetState {
        if self.sheets.len() <= id.0 {
            self.sheets.resize(id.0 + 1, SheetState::Pending);
        }
        &mut self.sheets[id.0]
    }

    /// Start decoding one sheet per species. Paths resolve against
    /// `asset_dir`.
    pub fn load_all(&mut self, species: &[Species], asset_dir: &str) {
        for (i, sp) in species.iter().enumerate() {
            let id = SpeciesId(i);
            *self.slot(id) = SheetState::Pending;
            let path = Path::new(asset_dir).join(&sp.sheet_path);
            let tx = self.tx.clone();
            std::thread::spawn(move || {
                let result = image::open(&path)
                    .map(|img| img.to_rgba8())
                    .map_err(|e| format!("{}: {}", path.display(), e));
                // Receiver gone means the app is shutting down.
                let _ = tx.send((id, result));
            });
        }
    }

    /// Drain finished decodes. Failures fall back to the species'
    /// placeholder colour when it has one.
    pub fn poll(&mut self, species: &[Species]) {
        while let Ok((id, result)) = self.rx.try_recv() {
            let state = match result {
                Ok(img) => {
                    if let Some(sp) = species.get(id.0) {
                        let needed_w = sp.frame_w * sp.frame_count as u32;
                        if img.width() < needed_w || img.height() < sp.frame_h {
                            log::warn!(
                                "sheet for {} is {}x{}, expected at least {}x{}",
                                sp.name,
                                img.width(),
                                img.height(),
                                needed_w,
                                sp.frame_h
                            );
                        }
                    }
                    log::debug!("sheet {} ready", id.0);
                    SheetState::Ready(img)
                }
                Err(e) => {
                    log::warn!("failed to load sprite sheet {}", e);
                    match species.get(id.0).and_then(|sp| sp.placeholder.map(|c| (sp, c))) {
                        Some((sp, color)) => SheetState::Ready(placeholder_sheet(sp, color)),
                        None => SheetState::Failed(e),
                    }
                }
            };
            *self.slot(id) = state;
        }
    }

    /// Install an already-decoded sheet.
    pub fn insert(&mut self, id: SpeciesId, image: RgbaImage) {
        *self.slot(id) = SheetState::Ready(image);
    }

    pub fn state(&self, id: SpeciesId) -> Option<&SheetState> {
        self.sheets.get(id.0)
    }

    pub fn ready(&self, id: SpeciesId) -> Option<&RgbaImage> {
        match self.sheets.get(id.0)? {
            SheetState::Ready(img) => Some(img),
            _ => None,
        }
    }

    pub fn all_settled(&self) -> bool {
        self.sheets
            .iter()
            .all(|s| !matches!(s, SheetState::Pending))
    }
}

impl Default for SheetStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Solid strip with the declared geometry. Odd frames are a shade darker
/// so the cycle stays visible.
pub fn placeholder_sheet(species: &Species, color: Rgba) -> RgbaImage {
    let w = (species.frame_w * species.frame_count.max(1) as u32).max(1);
    let h = species.frame_h.max(1);
    let dark = [
        (color[0] as u16 * 4 / 5) as u8,
        (color[1] as u16 * 4 / 5) as u8,
        (color[2] as u16 * 4 / 5) as u8,
        color[3],
    ];
    RgbaImage::from_fn(w, h, |x, _| {
        let frame = x / species.frame_w.max(1);
        Pixel(if frame % 2 == 0 { color } else { dark })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn species(placeholder: Option<Rgba>) -> Species {
        Species {
            name: "duck".into(),
            sheet_path: "does/not/exist.png".into(),
            frame_count: 3,
            frame_w: 4,
            frame_h: 2,
            frame_interval_ms: 60.0,
            ground_offset: 0.0,
            placeholder,
        }
    }

    fn poll_until_settled(store: &mut SheetStore, species: &[Species]) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !store.all_settled() && Instant::now() < deadline {
            store.poll(species);
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn missing_file_without_placeholder_fails() {
        let sp = vec![species(None)];
        let mut store = SheetStore::new();
        store.load_all(&sp, "/nonexistent");
        assert!(store.ready(SpeciesId(0)).is_none());
        poll_until_settled(&mut store, &sp);
        assert!(matches!(store.state(SpeciesId(0)), Some(SheetState::Failed(_))));
    }

    #[test]
    fn missing_file_with_placeholder_is_ready() {
        let sp = vec![species(Some([200, 100, 50, 255]))];
        let mut store = SheetStore::new();
        store.load_all(&sp, "/nonexistent");
        poll_until_settled(&mut store, &sp);
        let img = store.ready(SpeciesId(0)).expect("placeholder installed");
        assert_eq!((img.width(), img.height()), (12, 2));
    }

    #[test]
    fn placeholder_alternates_shade() {
        let img = placeholder_sheet(&species(None), [100, 100, 100, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [100, 100, 100, 255]);
        assert_eq!(img.get_pixel(4, 0).0, [80, 80, 80, 255]);
        assert_eq!(img.get_pixel(8, 1).0, [100, 100, 100, 255]);
    }

    #[test]
    fn unknown_species_is_not_ready() {
        let store = SheetStore::new();
        assert!(store.ready(SpeciesId(7)).is_none());
        assert!(store.all_settled());
    }
}
