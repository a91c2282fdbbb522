use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::batch::{BatchReport, run_batch};
use crate::foundation::error::{YardError, YardResult};
use crate::foundation::fs::list_files_with_extensions;

/// Extensions picked up by [`resize_dir`].
pub const RESIZE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

/// Target sizes used when none are given.
pub const DEFAULT_SIZES: [u32; 3] = [512, 768, 1024];

/// Options for [`resize_dir`].
#[derive(Clone, Debug)]
pub struct ResizeOpts {
    /// Folder scanned for source images.
    pub input_dir: PathBuf,
    /// Folder receiving one `<size>/` subfolder per target size.
    pub output_dir: PathBuf,
    /// Longest-side targets in pixels.
    pub sizes: Vec<u32>,
    /// Worker threads; `None` uses rayon's default.
    pub threads: Option<usize>,
}

/// Scale `(w, h)` so the longer side equals `target`, keeping the aspect ratio.
///
/// The shorter side is truncated, never below 1. Square images count as portrait.
pub fn fit_longest_side(w: u32, h: u32, target: u32) -> (u32, u32) {
    let aspect = f64::from(w) / f64::from(h.max(1));
    let (nw, nh) = if w > h {
        (target, (f64::from(target) / aspect) as u32)
    } else {
        ((f64::from(target) * aspect) as u32, target)
    };
    (nw.max(1), nh.max(1))
}

/// Resize `src` once per size, writing `<out_dir>/<size>/<file name>`.
pub fn resize_image(src: &Path, out_dir: &Path, sizes: &[u32]) -> YardResult<Vec<PathBuf>> {
    let name = src
        .file_name()
        .ok_or_else(|| YardError::validation(format!("'{}' has no file name", src.display())))?;
    let img = image::open(src).with_context(|| format!("open image '{}'", src.display()))?;

    let mut written = Vec::with_capacity(sizes.len());
    for &size in sizes {
        let sub = out_dir.join(size.to_string());
        std::fs::create_dir_all(&sub)
            .with_context(|| format!("create output directory '{}'", sub.display()))?;

        let (nw, nh) = fit_longest_side(img.width(), img.height(), size);
        let resized = img.resize_exact(nw, nh, image::imageops::FilterType::Lanczos3);
        let dst = sub.join(name);
        resized
            .save(&dst)
            .with_context(|| format!("write image '{}'", dst.display()))?;
        written.push(dst);
    }
    Ok(written)
}

/// Resize every supported image in `opts.input_dir` to each target size.
#[tracing::instrument(skip(opts), fields(input = %opts.input_dir.display()))]
pub fn resize_dir(opts: &ResizeOpts) -> YardResult<BatchReport> {
    if opts.sizes.contains(&0) {
        return Err(YardError::validation("target sizes must be > 0"));
    }
    let sizes: Vec<u32> = if opts.sizes.is_empty() {
        tracing::info!(
            "no target sizes given; using defaults {:?}",
            DEFAULT_SIZES
        );
        DEFAULT_SIZES.to_vec()
    } else {
        opts.sizes.clone()
    };

    std::fs::create_dir_all(&opts.output_dir)
        .with_context(|| format!("create output directory '{}'", opts.output_dir.display()))?;
    let files = list_files_with_extensions(&opts.input_dir, &RESIZE_EXTENSIONS)?;
    tracing::info!(files = files.len(), sizes = ?sizes, "resizing images");

    let out_dir = opts.output_dir.as_path();
    run_batch(&files, opts.threads, |src| resize_image(src, out_dir, &sizes))
}
