use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::batch::{BatchReport, run_batch};
use crate::foundation::error::{YardError, YardResult};
use crate::foundation::fs::list_files_with_extensions;

/// Extensions picked up by [`convert_dir`].
pub const CONVERT_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "gif", "webp"];

/// Options for [`convert_dir`].
#[derive(Clone, Debug)]
pub struct ConvertOpts {
    /// Folder scanned for source images.
    pub input_dir: PathBuf,
    /// Folder receiving `<stem>.png` files.
    pub output_dir: PathBuf,
    /// Worker threads; `None` uses rayon's default.
    pub threads: Option<usize>,
}

/// Result of [`convert_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertOutcome {
    /// The input folder did not exist and was created empty; nothing was converted.
    InputCreated(PathBuf),
    /// The batch ran.
    Converted(BatchReport),
}

/// Decode `src` and write it as `<out_dir>/<stem>.png`.
pub fn convert_to_png(src: &Path, out_dir: &Path) -> YardResult<PathBuf> {
    let stem = src
        .file_stem()
        .ok_or_else(|| YardError::validation(format!("'{}' has no file name", src.display())))?;
    let mut dst = out_dir.join(stem);
    dst.set_extension("png");

    let img = image::open(src).with_context(|| format!("open image '{}'", src.display()))?;
    img.save_with_format(&dst, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", dst.display()))?;
    Ok(dst)
}

/// Later inputs whose stem (ignoring case) was already claimed, mapped to the claiming input.
fn shadowed_stems(files: &[PathBuf]) -> HashMap<PathBuf, PathBuf> {
    let mut claimed: HashMap<String, &PathBuf> = HashMap::new();
    let mut shadowed = HashMap::new();
    for file in files {
        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match claimed.get(&stem) {
            Some(first) => {
                shadowed.insert(file.clone(), (*first).clone());
            }
            None => {
                claimed.insert(stem, file);
            }
        }
    }
    shadowed
}

/// Convert every supported image in `opts.input_dir` to PNG.
///
/// Inputs sharing a stem with an earlier file are reported as failures instead of racing for
/// the same output.
#[tracing::instrument(skip(opts), fields(input = %opts.input_dir.display()))]
pub fn convert_dir(opts: &ConvertOpts) -> YardResult<ConvertOutcome> {
    if !opts.input_dir.exists() {
        std::fs::create_dir_all(&opts.input_dir).with_context(|| {
            format!("create input directory '{}'", opts.input_dir.display())
        })?;
        tracing::info!(
            "input directory {} was created; put images in it and run again",
            opts.input_dir.display()
        );
        return Ok(ConvertOutcome::InputCreated(opts.input_dir.clone()));
    }

    std::fs::create_dir_all(&opts.output_dir)
        .with_context(|| format!("create output directory '{}'", opts.output_dir.display()))?;

    let files = list_files_with_extensions(&opts.input_dir, &CONVERT_EXTENSIONS)?;
    tracing::info!(files = files.len(), "converting to png");

    let shadowed = shadowed_stems(&files);
    let out_dir = opts.output_dir.as_path();
    let report = run_batch(&files, opts.threads, |src| {
        if let Some(first) = shadowed.get(src) {
            return Err(YardError::validation(format!(
                "'{}' would overwrite the png converted from '{}'",
                src.display(),
                first.display()
            )));
        }
        convert_to_png(src, out_dir).map(|p| vec![p])
    })?;
    Ok(ConvertOutcome::Converted(report))
}
