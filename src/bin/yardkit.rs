use std::io::{BufRead as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use yardkit::Color;

#[derive(Parser, Debug)]
#[command(name = "yardkit", version, about = "Garden plan rendering and image batch tools")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a garden plan config (YAML/JSON) to PNG.
    Plan(PlanArgs),
    /// Download the images listed in a spreadsheet column.
    Download(DownloadArgs),
    /// Convert a folder of images to PNG.
    Convert(ConvertArgs),
    /// Resize a folder of images to one or more longest-side targets.
    Resize(ResizeArgs),
    /// Insert a folder of images into column G of a workbook.
    ExcelInsert(ExcelInsertArgs),
    /// Draw numbered plant markers on a photo and export the listing.
    Annotate(AnnotateArgs),
    /// Extract the first frame of each .mp4 as WebP and file both into a folder.
    VideoFrames(VideoArgs),
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Scene config (.yaml, .yml or .json).
    #[arg(long)]
    config: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    output: PathBuf,

    /// Output resolution.
    #[arg(long, default_value_t = 250)]
    dpi: u32,

    /// Label language.
    #[arg(long, value_enum, default_value_t = LabelChoice::Bilingual)]
    label_mode: LabelChoice,

    /// Extra font directory (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LabelChoice {
    Bilingual,
    En,
    Cn,
}

#[derive(Parser, Debug)]
struct DownloadArgs {
    /// Workbook containing the URL column.
    #[arg(long)]
    sheet: PathBuf,

    /// Header of the URL column.
    #[arg(long, default_value = yardkit::download::DEFAULT_COLUMN)]
    column: String,

    /// Folder the images are saved into.
    #[arg(long, default_value = "download_img")]
    out_dir: PathBuf,

    /// Per-request timeout.
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    #[arg(long, default_value = "input")]
    input: PathBuf,

    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Worker threads (defaults to the number of CPUs).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct ResizeArgs {
    #[arg(long, default_value = "input")]
    input: PathBuf,

    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Longest-side target in pixels (repeatable; defaults to 512, 768 and 1024).
    #[arg(long = "size")]
    sizes: Vec<u32>,

    /// Worker threads (defaults to the number of CPUs).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct ExcelInsertArgs {
    /// Image folder; prompted for when omitted.
    #[arg(long)]
    images: Option<PathBuf>,

    /// Workbook to rewrite; prompted for when omitted.
    #[arg(long)]
    workbook: Option<PathBuf>,

    /// Image scale factor.
    #[arg(long, default_value_t = 0.4)]
    scale: f64,
}

#[derive(Parser, Debug)]
struct AnnotateArgs {
    /// Photo to annotate (JPG/PNG).
    #[arg(long)]
    image: PathBuf,

    /// Items JSON file.
    #[arg(long, conflicts_with = "items_json")]
    items: Option<PathBuf>,

    /// Items JSON given inline.
    #[arg(long)]
    items_json: Option<String>,

    /// Plant description echoed with the results.
    #[arg(long)]
    description: Option<String>,

    #[arg(long, default_value = "annotated")]
    out_dir: PathBuf,

    /// Relative marker size (2..=6).
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(2..=6))]
    marker_scale: u8,

    #[arg(long, default_value = "#4AC96E")]
    marker_color: Color,

    #[arg(long, default_value = "#FFFFFF")]
    text_color: Color,

    #[arg(long, value_enum, default_value_t = SourceChoice::Manual)]
    source: SourceChoice,

    /// Vision provider for `--source api`.
    #[arg(long, value_enum, default_value_t = ProviderChoice::Gemini)]
    provider: ProviderChoice,

    /// Model name for `--source api`; defaults to the provider's first model.
    #[arg(long)]
    model: Option<String>,

    /// Extra font directory (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SourceChoice {
    Manual,
    Api,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProviderChoice {
    Openai,
    Anthropic,
    Gemini,
}

#[derive(Parser, Debug)]
struct VideoArgs {
    /// Folder scanned for .mp4 files.
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// WebP quality (0-100).
    #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(0..=100))]
    quality: u8,

    /// Encode the frame losslessly.
    #[arg(long)]
    lossless: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Download(args) => cmd_download(args),
        Command::Convert(args) => cmd_convert(args),
        Command::Resize(args) => cmd_resize(args),
        Command::ExcelInsert(args) => cmd_excel_insert(args),
        Command::Annotate(args) => cmd_annotate(args),
        Command::VideoFrames(args) => cmd_video(args),
    }
}

fn exit_for_failures(failed: usize) -> ExitCode {
    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<ExitCode> {
    let doc = yardkit::plan::load_config(&args.config)?;
    let repair = yardkit::plan::validate_and_fix(doc);

    for msg in &repair.fixes {
        eprintln!("[FIX] {msg}");
    }
    for msg in &repair.warnings {
        eprintln!("[WARN] {msg}");
    }
    for msg in &repair.errors {
        eprintln!("[ERROR] {msg}");
    }
    if repair.is_fatal() {
        eprintln!("config has errors; nothing was rendered");
        return Ok(ExitCode::FAILURE);
    }
    let cfg = repair.into_config()?;

    let opts = yardkit::plan::PlanRenderOpts {
        dpi: args.dpi,
        label_mode: match args.label_mode {
            LabelChoice::Bilingual => yardkit::plan::LabelMode::Bilingual,
            LabelChoice::En => yardkit::plan::LabelMode::En,
            LabelChoice::Cn => yardkit::plan::LabelMode::Cn,
        },
        font_dirs: args.font_dirs,
    };
    let outcome = yardkit::plan::render_plan(&cfg, &args.output, &opts)?;

    eprintln!(
        "wrote {} ({}x{})",
        args.output.display(),
        outcome.width,
        outcome.height
    );
    Ok(ExitCode::SUCCESS)
}

fn cmd_download(args: DownloadArgs) -> anyhow::Result<ExitCode> {
    let rows = yardkit::sheet::read_column(&args.sheet, &args.column)?;
    let client = yardkit::download::http_client(Duration::from_secs(args.timeout_secs))?;
    let report = yardkit::download::download_all(&rows, &args.out_dir, &client)?;

    eprintln!(
        "downloaded {} of {} image(s) into {}",
        report.saved.len(),
        rows.len(),
        args.out_dir.display()
    );
    for (row, reason) in &report.failed {
        eprintln!("  row {row}: {reason}");
    }
    Ok(exit_for_failures(report.failed.len()))
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<ExitCode> {
    use yardkit::batch::convert::{ConvertOpts, ConvertOutcome, convert_dir};

    let outcome = convert_dir(&ConvertOpts {
        input_dir: args.input,
        output_dir: args.output.clone(),
        threads: args.threads,
    })?;
    match outcome {
        ConvertOutcome::InputCreated(dir) => {
            eprintln!(
                "created {}; put the images to convert there and run again",
                dir.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        ConvertOutcome::Converted(report) => {
            eprintln!(
                "converted {} image(s) into {}, {} failed",
                report.written.len(),
                args.output.display(),
                report.failed_count()
            );
            Ok(exit_for_failures(report.failed_count()))
        }
    }
}

fn cmd_resize(args: ResizeArgs) -> anyhow::Result<ExitCode> {
    use yardkit::batch::resize::{ResizeOpts, resize_dir};

    let report = resize_dir(&ResizeOpts {
        input_dir: args.input,
        output_dir: args.output.clone(),
        sizes: args.sizes,
        threads: args.threads,
    })?;
    eprintln!(
        "wrote {} resized image(s) under {}, {} input(s) failed",
        report.written.len(),
        args.output.display(),
        report.failed_count()
    );
    Ok(exit_for_failures(report.failed_count()))
}

fn prompt_path(label: &str) -> anyhow::Result<PathBuf> {
    let mut stderr = std::io::stderr();
    write!(stderr, "{label}: ").context("write prompt")?;
    stderr.flush().context("flush prompt")?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read from stdin")?;
    let line = line.trim().trim_matches(['"', '\'']);
    anyhow::ensure!(!line.is_empty(), "no {label} given");
    Ok(PathBuf::from(line))
}

fn cmd_excel_insert(args: ExcelInsertArgs) -> anyhow::Result<ExitCode> {
    let images = match args.images {
        Some(p) => p,
        None => prompt_path("image folder path")?,
    };
    let workbook = match args.workbook {
        Some(p) => p,
        None => prompt_path("workbook path")?,
    };

    let mut opts = yardkit::sheet::InsertOpts::new(images, workbook);
    opts.scale = args.scale;
    let report = yardkit::sheet::insert_images(&opts)?;

    eprintln!(
        "inserted {} image(s) into {}",
        report.inserted.len(),
        opts.workbook.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn read_items_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read items '{}'", path.display()))
}

fn cmd_annotate(args: AnnotateArgs) -> anyhow::Result<ExitCode> {
    use yardkit::annotate::{
        AnnotateOpts, ItemSource, MarkerStyle, Provider, VisionRequest, annotate,
    };

    let source = match args.source {
        SourceChoice::Manual => match (&args.items, args.items_json) {
            (Some(path), _) => ItemSource::Manual(read_items_text(path)?),
            (None, Some(text)) => ItemSource::Manual(text),
            (None, None) => anyhow::bail!("manual mode needs --items or --items-json"),
        },
        SourceChoice::Api => {
            let provider = match args.provider {
                ProviderChoice::Openai => Provider::OpenAi,
                ProviderChoice::Anthropic => Provider::Anthropic,
                ProviderChoice::Gemini => Provider::Gemini,
            };
            ItemSource::Api(VisionRequest::from_env(provider, args.model))
        }
    };

    let outcome = annotate(&AnnotateOpts {
        image: args.image,
        source,
        description: args.description,
        out_dir: args.out_dir,
        style: MarkerStyle {
            scale: args.marker_scale,
            fill: args.marker_color,
            text: args.text_color,
        },
        font_dirs: args.font_dirs,
    })?;

    for path in [&outcome.outputs.png, &outcome.outputs.json, &outcome.outputs.csv] {
        eprintln!("wrote {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_video(args: VideoArgs) -> anyhow::Result<ExitCode> {
    use yardkit::video::{Ffmpeg, FfmpegStatus, FrameOpts, check_ffmpeg, process_dir};

    match check_ffmpeg() {
        FfmpegStatus::Available => tracing::info!("ffmpeg found"),
        FfmpegStatus::Degraded => {
            tracing::warn!("'ffmpeg -version' failed; continuing, but encoding may fail")
        }
        FfmpegStatus::Missing => anyhow::bail!(
            "'ffmpeg' command not found; install FFmpeg and make sure it is on PATH"
        ),
    }

    let dir = std::path::absolute(&args.dir)
        .with_context(|| format!("resolve '{}'", args.dir.display()))?;
    let extractor = Ffmpeg::new(FrameOpts {
        quality: args.quality,
        lossless: args.lossless,
    });
    let report = process_dir(&dir, &extractor)?;

    eprintln!("processed: {} video(s)", report.processed_count());
    eprintln!("failed: {} video(s)", report.failed_count());
    for (video, reason) in &report.failed {
        eprintln!("  {}: {reason}", video.display());
    }
    Ok(exit_for_failures(report.failed_count()))
}
