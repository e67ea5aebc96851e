//! Per-frame engine for a cat that chases a star across a flower field.
//!
//! [`Scene`] owns every component and advances them one tick at a time;
//! [`Scene::build_instances`] flattens the current state into draw
//! instances for whatever renderer sits on top.

pub mod cat;
pub mod config;
pub mod flowers;
pub mod lure;
pub mod particles;
pub mod render;
pub mod scene;
pub mod sky;
pub mod util;

pub use config::{ConfigError, SimConfig, Viewport};
pub use scene::Scene;
