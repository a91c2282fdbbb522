use std::path::{Path, PathBuf};

use crate::foundation::error::{YardError, YardResult};
use crate::foundation::raster::{build_fontdb, font_families, parse_svg, rasterize, save_png};
use crate::plan::fonts::{FontChoice, LabelMode, resolve_fonts};
use crate::plan::model::PlanConfig;
use crate::plan::svg::build_svg;

/// Options for [`render_plan`].
#[derive(Clone, Debug)]
pub struct PlanRenderOpts {
    /// Output resolution; the canvas is laid out at 100 DPI.
    pub dpi: u32,
    /// Requested label language.
    pub label_mode: LabelMode,
    /// Extra directories scanned for fonts.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for PlanRenderOpts {
    fn default() -> Self {
        Self {
            dpi: 250,
            label_mode: LabelMode::Bilingual,
            font_dirs: Vec::new(),
        }
    }
}

/// What [`render_plan`] produced.
#[derive(Clone, Debug)]
pub struct PlanRenderOutcome {
    /// Fonts and effective label mode.
    pub fonts: FontChoice,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

/// Render `cfg` to a PNG at `out`.
#[tracing::instrument(skip(cfg, opts), fields(dpi = opts.dpi))]
pub fn render_plan(
    cfg: &PlanConfig,
    out: &Path,
    opts: &PlanRenderOpts,
) -> YardResult<PlanRenderOutcome> {
    if opts.dpi == 0 {
        return Err(YardError::validation("dpi must be > 0"));
    }

    let dirs: Vec<&Path> = opts.font_dirs.iter().map(PathBuf::as_path).collect();
    let fontdb = build_fontdb(&dirs);
    let fonts = resolve_fonts(opts.label_mode, &font_families(&fontdb));
    if fonts.fell_back {
        tracing::warn!("{}", fonts.describe());
    } else {
        tracing::info!("{}", fonts.describe());
    }

    let svg = build_svg(cfg, &fonts);
    let tree = parse_svg(&svg, fontdb)?;
    let pixmap = rasterize(&tree, opts.dpi as f32 / 100.0)?;
    save_png(&pixmap, out)?;

    tracing::info!(
        width = pixmap.width(),
        height = pixmap.height(),
        "garden plan saved to {}",
        out.display()
    );
    Ok(PlanRenderOutcome {
        fonts,
        width: pixmap.width(),
        height: pixmap.height(),
    })
}
