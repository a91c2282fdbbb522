use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::foundation::error::{YardError, YardResult};

/// Stderr longer than this (in characters) is shortened in reports.
pub const STDERR_LIMIT: usize = 500;
const STDERR_KEEP: usize = 250;

/// Result of probing for `ffmpeg`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FfmpegStatus {
    /// `ffmpeg -version` succeeded.
    Available,
    /// The binary ran but `-version` failed; encoding may still work.
    Degraded,
    /// The binary could not be started.
    Missing,
}

/// Probe `program -version`.
pub fn check_ffmpeg_at(program: &Path) -> FfmpegStatus {
    let status = Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match status {
        Ok(s) if s.success() => FfmpegStatus::Available,
        Ok(_) => FfmpegStatus::Degraded,
        Err(_) => FfmpegStatus::Missing,
    }
}

/// Probe the `ffmpeg` on `PATH`.
pub fn check_ffmpeg() -> FfmpegStatus {
    check_ffmpeg_at(Path::new("ffmpeg"))
}

/// WebP settings for the extracted frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameOpts {
    /// 0..=100, higher is better. Ignored by ffmpeg when lossless.
    pub quality: u8,
    pub lossless: bool,
}

impl Default for FrameOpts {
    fn default() -> Self {
        Self {
            quality: 80,
            lossless: false,
        }
    }
}

/// `ffmpeg` invocation that writes the first frame of `video` to `webp`.
pub fn first_frame_command(program: &Path, video: &Path, webp: &Path, opts: FrameOpts) -> Command {
    let mut cmd = Command::new(program);
    cmd.arg("-i")
        .arg(video)
        .args(["-vf", r"select=eq(n\,0)", "-frames:v", "1", "-c:v", "libwebp"])
        .args(["-lossless", if opts.lossless { "1" } else { "0" }])
        .arg("-q:v")
        .arg(opts.quality.to_string())
        .args(["-an", "-y"])
        .arg(webp);
    cmd
}

/// Shell-like rendering of `cmd` for reports.
pub fn describe_command(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|s| s.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trim `stderr` and shorten it to its first and last 250 characters when it is long.
pub fn truncate_stderr(stderr: &str) -> String {
    let s = stderr.trim();
    let n = s.chars().count();
    if n <= STDERR_LIMIT {
        return s.to_owned();
    }
    let head: String = s.chars().take(STDERR_KEEP).collect();
    let tail: String = s.chars().skip(n - STDERR_KEEP).collect();
    format!("{head}\n...\n{tail}")
}

/// Something that can write the first frame of a video as WebP.
pub trait FrameExtractor {
    fn extract_first_frame(&self, video: &Path, webp: &Path) -> YardResult<()>;
}

/// [`FrameExtractor`] backed by an `ffmpeg` process.
#[derive(Clone, Debug)]
pub struct Ffmpeg {
    pub program: PathBuf,
    pub opts: FrameOpts,
}

impl Ffmpeg {
    pub fn new(opts: FrameOpts) -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
            opts,
        }
    }
}

impl FrameExtractor for Ffmpeg {
    fn extract_first_frame(&self, video: &Path, webp: &Path) -> YardResult<()> {
        let mut cmd = first_frame_command(&self.program, video, webp, self.opts);
        let shown = describe_command(&cmd);
        tracing::info!("running {shown}");

        let out = cmd
            .stdin(Stdio::null())
            .output()
            .map_err(|e| YardError::encoder(format!("failed to spawn ffmpeg: {e}\ncommand: {shown}")))?;
        if out.status.success() {
            return Ok(());
        }

        let code = out
            .status
            .code()
            .map_or_else(|| "none".to_owned(), |c| c.to_string());
        Err(YardError::encoder(format!(
            "ffmpeg failed\ncommand: {shown}\nexit code: {code}\nstderr: {}",
            truncate_stderr(&String::from_utf8_lossy(&out.stderr))
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_matches_expected_arguments() {
        let cmd = first_frame_command(
            Path::new("ffmpeg"),
            Path::new("/v/clip.mp4"),
            Path::new("/v/clip.webp"),
            FrameOpts::default(),
        );
        assert_eq!(
            describe_command(&cmd),
            r"ffmpeg -i /v/clip.mp4 -vf select=eq(n\,0) -frames:v 1 -c:v libwebp -lossless 0 -q:v 80 -an -y /v/clip.webp"
        );

        let lossless = first_frame_command(
            Path::new("ffmpeg"),
            Path::new("a.mp4"),
            Path::new("a.webp"),
            FrameOpts {
                quality: 95,
                lossless: true,
            },
        );
        let shown = describe_command(&lossless);
        assert!(shown.contains("-lossless 1 -q:v 95"), "{shown}");
    }

    #[test]
    fn long_stderr_keeps_both_ends() {
        let s = format!("{}{}", "a".repeat(300), "b".repeat(300));
        let t = truncate_stderr(&s);
        assert_eq!(t, format!("{}\n...\n{}", "a".repeat(250), "b".repeat(250)));

        let short = "  only a little  ";
        assert_eq!(truncate_stderr(short), "only a little");
        assert_eq!(truncate_stderr(&"x".repeat(500)), "x".repeat(500));
    }

    #[test]
    fn truncation_counts_characters() {
        let s = "错".repeat(600);
        let t = truncate_stderr(&s);
        assert_eq!(t.chars().count(), 250 + 5 + 250);
    }

    #[test]
    fn missing_binary_is_reported() {
        let status = check_ffmpeg_at(Path::new("/nonexistent/definitely-not-ffmpeg"));
        assert_eq!(status, FfmpegStatus::Missing);
    }
}
