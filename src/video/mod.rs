//! Video tool: extract the first frame of each `.mp4` as WebP and file both into a folder named
//! after the video.

use std::path::{Path, PathBuf};

use crate::foundation::error::{YardError, YardResult};
use crate::foundation::fs::{list_files_with_extensions, move_file};

/// `ffmpeg` probing and invocation.
pub mod ffmpeg;

pub use ffmpeg::{Ffmpeg, FfmpegStatus, FrameExtractor, FrameOpts, check_ffmpeg};

/// Outcome of [`process_dir`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VideoReport {
    /// Folders created, one per processed video.
    pub processed: Vec<PathBuf>,
    /// Videos that failed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl VideoReport {
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

/// Regular `.mp4` files (any case) directly inside `dir`, sorted.
pub fn list_videos(dir: &Path) -> YardResult<Vec<PathBuf>> {
    list_files_with_extensions(dir, &["mp4"])
}

/// Move `video` and `webp` into `<dir>/<stem>/`. Returns the folder.
fn file_away(video: &Path, webp: &Path) -> YardResult<PathBuf> {
    let (Some(dir), Some(stem), Some(video_name), Some(webp_name)) = (
        video.parent(),
        video.file_stem(),
        video.file_name(),
        webp.file_name(),
    ) else {
        return Err(YardError::validation(format!(
            "cannot derive a folder name from '{}'",
            video.display()
        )));
    };

    let folder = dir.join(stem);
    std::fs::create_dir_all(&folder)?;
    move_file(video, &folder.join(video_name))?;
    move_file(webp, &folder.join(webp_name))?;
    Ok(folder)
}

fn process_one(extractor: &impl FrameExtractor, video: &Path) -> YardResult<PathBuf> {
    let webp = video.with_extension("webp");
    extractor.extract_first_frame(video, &webp)?;

    file_away(video, &webp).inspect_err(|_| {
        if webp.exists()
            && let Err(e) = std::fs::remove_file(&webp)
        {
            tracing::warn!("could not remove temporary file {}: {e}", webp.display());
        }
    })
}

/// Process every video in `dir` with `extractor`. Per-video failures are logged and counted.
#[tracing::instrument(skip(extractor))]
pub fn process_dir(dir: &Path, extractor: &impl FrameExtractor) -> YardResult<VideoReport> {
    if !dir.is_dir() {
        return Err(YardError::validation(format!(
            "directory not found: {}",
            dir.display()
        )));
    }

    let videos = list_videos(dir)?;
    tracing::info!(videos = videos.len(), "processing {}", dir.display());

    let mut report = VideoReport::default();
    for video in videos {
        match process_one(extractor, &video) {
            Ok(folder) => {
                tracing::info!("processed {} into {}", video.display(), folder.display());
                report.processed.push(folder);
            }
            Err(e) => {
                tracing::warn!("failed {}: {e}", video.display());
                report.failed.push((video, e.to_string()));
            }
        }
    }
    Ok(report)
}
