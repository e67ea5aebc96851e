//! Render sink: the flat per-entity data the engine hands to whatever draws
//! it. The engine itself never touches pixels.

pub mod instance;

pub use instance::{gray, Instance, Kind};
