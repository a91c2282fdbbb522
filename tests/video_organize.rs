use std::path::Path;

use yardkit::video::{FrameExtractor, list_videos, process_dir};
use yardkit::{YardError, YardResult};

/// Writes a placeholder WebP, failing for videos whose stem starts with `bad`.
struct FakeExtractor;

impl FrameExtractor for FakeExtractor {
    fn extract_first_frame(&self, video: &Path, webp: &Path) -> YardResult<()> {
        let stem = video.file_stem().unwrap().to_string_lossy();
        if stem.starts_with("bad") {
            return Err(YardError::encoder(format!("ffmpeg failed for {stem}")));
        }
        std::fs::write(webp, b"RIFF....WEBP")?;
        Ok(())
    }
}

#[test]
fn only_mp4_files_are_listed_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["b.mp4", "A.MP4", "c.mov", "notes.txt"] {
        std::fs::write(dir.path().join(name), b"x").unwrap();
    }
    std::fs::create_dir(dir.path().join("folder.mp4")).unwrap();

    let got = list_videos(dir.path()).unwrap();
    assert_eq!(got, vec![dir.path().join("A.MP4"), dir.path().join("b.mp4")]);
}

#[test]
fn videos_and_frames_move_into_named_folders() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("clip one.mp4"), b"video-1").unwrap();
    std::fs::write(dir.path().join("Clip2.MP4"), b"video-2").unwrap();
    std::fs::write(dir.path().join("bad.mp4"), b"video-3").unwrap();

    let report = process_dir(dir.path(), &FakeExtractor).unwrap();
    assert_eq!(report.processed_count(), 2);
    assert_eq!(report.failed_count(), 1);

    let one = dir.path().join("clip one");
    assert_eq!(std::fs::read(one.join("clip one.mp4")).unwrap(), b"video-1");
    assert!(one.join("clip one.webp").is_file());
    assert!(dir.path().join("Clip2").join("Clip2.MP4").is_file());
    assert!(dir.path().join("Clip2").join("Clip2.webp").is_file());
    assert!(!dir.path().join("clip one.mp4").exists());

    // A failed extraction leaves the video where it was.
    assert!(dir.path().join("bad.mp4").is_file());
    assert!(!dir.path().join("bad").exists());
    assert!(report.failed[0].1.contains("ffmpeg failed"));
}

#[test]
fn missing_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(process_dir(&dir.path().join("nope"), &FakeExtractor).is_err());
}
