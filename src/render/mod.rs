//! Deterministic text rendering: sanitation, SVG overlays, rasterization and compositing.

pub mod composite;
pub mod compositor;
pub mod overlay;
pub mod raster;
pub mod sanitize;
