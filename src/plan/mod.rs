//! Garden plan renderer: load a YAML/JSON scene, repair it, render it to PNG.

/// Label language and font selection.
pub mod fonts;
/// Normalized-to-pixel mapping.
pub mod geometry;
/// Config file loading.
pub mod load;
/// Typed scene model.
pub mod model;
/// Style presets.
pub mod presets;
/// Rasterization entry point.
pub mod render;
/// Scene to SVG translation.
pub mod svg;
/// Config repair.
pub mod validate;

pub use fonts::{FontChoice, LabelMode};
pub use load::load_config;
pub use model::PlanConfig;
pub use render::{PlanRenderOpts, PlanRenderOutcome, render_plan};
pub use validate::{Repair, validate_and_fix};
