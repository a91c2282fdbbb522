use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use resvg::tiny_skia;

use crate::annotate::items::PlantItem;
use crate::foundation::error::YardResult;
use crate::foundation::raster::save_png;

pub const ANNOTATED_PNG: &str = "annotated.png";
pub const PLANTS_JSON: &str = "plants.json";
pub const PLANTS_CSV: &str = "plants.csv";

const CSV_HEADER: [&str; 6] = ["id", "name_cn", "name_en", "reason", "cx", "cy"];

/// Files written by [`write_outputs`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotateOutputs {
    pub png: PathBuf,
    pub json: PathBuf,
    pub csv: PathBuf,
}

#[derive(serde::Serialize)]
struct ItemsDoc<'a> {
    items: &'a [PlantItem],
}

/// `{"items": [...]}`, two-space indented, non-ASCII left as is.
pub fn items_json(items: &[PlantItem]) -> YardResult<String> {
    let s = serde_json::to_string_pretty(&ItemsDoc { items }).context("serialize items")?;
    Ok(s)
}

/// Write `items` as CSV with a UTF-8 byte order mark so spreadsheet apps pick the encoding.
pub fn write_items_csv(items: &[PlantItem], out: &Path) -> YardResult<()> {
    let mut file =
        std::fs::File::create(out).with_context(|| format!("create '{}'", out.display()))?;
    file.write_all("\u{feff}".as_bytes())
        .with_context(|| format!("write '{}'", out.display()))?;

    let mut w = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    w.write_record(CSV_HEADER)
        .with_context(|| format!("write header to '{}'", out.display()))?;
    for it in items {
        w.serialize(it)
            .with_context(|| format!("write row {} to '{}'", it.id, out.display()))?;
    }
    w.flush()
        .with_context(|| format!("flush '{}'", out.display()))?;
    Ok(())
}

/// Write the annotated image, the JSON document and the CSV table into `out_dir`.
pub fn write_outputs(
    out_dir: &Path,
    annotated: &tiny_skia::Pixmap,
    items: &[PlantItem],
) -> YardResult<AnnotateOutputs> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create output directory '{}'", out_dir.display()))?;
    let outputs = AnnotateOutputs {
        png: out_dir.join(ANNOTATED_PNG),
        json: out_dir.join(PLANTS_JSON),
        csv: out_dir.join(PLANTS_CSV),
    };

    save_png(annotated, &outputs.png)?;
    std::fs::write(&outputs.json, items_json(items)?)
        .with_context(|| format!("write '{}'", outputs.json.display()))?;
    write_items_csv(items, &outputs.csv)?;
    Ok(outputs)
}
