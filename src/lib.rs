pub mod book;
pub mod canvas;
pub mod components;
pub mod config;
pub mod dialogue;
pub mod events;
pub mod frame_loop;
pub mod grass;
pub mod lock;
pub mod present;
pub mod render;
pub mod rng;
pub mod scene;
pub mod sound;
pub mod sprite;
pub mod systems;
pub mod text;
pub mod ui;
