//! Plant annotator: numbered markers on a garden photo, plus JSON and CSV listings.
//!
//! Items come from a JSON document written by hand (or pasted from a model reply). Model-backed
//! identification is modelled by [`vision`] but has no vendor client behind it.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::YardResult;
use crate::foundation::raster::build_fontdb;

/// File outputs.
pub mod export;
/// Items parsing and normalization.
pub mod items;
/// Marker drawing.
pub mod markers;
/// Model-backed identification.
pub mod vision;

pub use export::AnnotateOutputs;
pub use items::{PlantItem, normalize_items, parse_items_text};
pub use markers::{MarkerStyle, marker_radius};
pub use vision::{Provider, VisionRequest};

/// Where the plant items come from.
#[derive(Clone, Debug)]
pub enum ItemSource {
    /// Items JSON text, optionally wrapped in a code fence.
    Manual(String),
    /// Ask a vision model.
    Api(VisionRequest),
}

#[derive(Clone, Debug)]
pub struct AnnotateOpts {
    pub image: PathBuf,
    pub source: ItemSource,
    /// Free-text description echoed into the log.
    pub description: Option<String>,
    pub out_dir: PathBuf,
    pub style: MarkerStyle,
    pub font_dirs: Vec<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct AnnotateOutcome {
    pub items: Vec<PlantItem>,
    pub outputs: AnnotateOutputs,
}

/// Load the photo, resolve items, draw markers and write all outputs.
#[tracing::instrument(skip(opts), fields(image = %opts.image.display()))]
pub fn annotate(opts: &AnnotateOpts) -> YardResult<AnnotateOutcome> {
    let text = match &opts.source {
        ItemSource::Manual(text) => text.clone(),
        ItemSource::Api(req) => vision::identify(req)?,
    };
    let items = normalize_items(&parse_items_text(&text)?)?;
    tracing::info!(items = items.len(), "items loaded");

    let img = image::open(&opts.image)
        .with_context(|| format!("open image '{}'", opts.image.display()))?
        .to_rgb8();

    let dirs: Vec<&Path> = opts.font_dirs.iter().map(PathBuf::as_path).collect();
    let annotated = markers::draw_markers(&img, &items, &opts.style, build_fontdb(&dirs))?;
    let outputs = export::write_outputs(&opts.out_dir, &annotated, &items)?;

    if let Some(desc) = opts.description.as_deref()
        && !desc.trim().is_empty()
    {
        tracing::info!("description:\n{desc}");
    }
    for it in &items {
        tracing::info!(
            id = it.id,
            cx = it.cx,
            cy = it.cy,
            "{} / {} {}",
            it.name_cn,
            it.name_en,
            it.reason
        );
    }
    Ok(AnnotateOutcome { items, outputs })
}
