// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanwerk — command-line document scanner.
//
// Entry point. Initialises logging, loads configuration, and runs detection
// or a full scan session over an image file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use scanwerk_bridge::StillImageCamera;
use scanwerk_capture::{ScanSession, run_frame_loop};
use scanwerk_core::ScanConfig;
use scanwerk_vision::detect_with_report;
use tokio::sync::watch;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "scanwerk")]
#[command(about = "Find a document in a camera frame and flatten it into an upright page")]
#[command(version)]
struct Cli {
    /// JSON configuration file (defaults are used when omitted).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the document outline in an image and print it as JSON.
    Detect(DetectArgs),

    /// Run a scan session over an image: detect, capture, and write the page.
    Scan(ScanArgs),

    /// Print the effective configuration as JSON.
    ShowConfig,
}

#[derive(Debug, Clone, Args)]
struct DetectArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,
}

#[derive(Debug, Clone, Args)]
struct ScanArgs {
    /// Path to the input image, served as a still camera frame.
    #[arg(long)]
    image: PathBuf,

    /// Path to write the captured page. Defaults to a timestamped
    /// `scan-<time>-<id>` name in the current directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Output encoding.
    #[arg(long, value_enum, default_value_t = OutputFormat::Jpeg)]
    format: OutputFormat,

    /// How long to run the detection loop before capturing.
    #[arg(long, default_value = "500")]
    loop_ms: u64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

#[tokio::main]
async fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Detect(args) => run_detect(&args, &config),
        Commands::Scan(args) => run_scan(&args, config).await,
        Commands::ShowConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> CliResult<ScanConfig> {
    let config = match path {
        Some(path) => {
            tracing::info!("Loading config: {}", path.display());
            ScanConfig::load(path)?
        }
        None => ScanConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run_detect(args: &DetectArgs, config: &ScanConfig) -> CliResult<()> {
    tracing::info!("Loading image: {}", args.image.display());
    let camera = StillImageCamera::from_path(&args.image)?;
    let report = detect_with_report(camera.frame(), &config.detector);

    let summary = serde_json::json!({
        "found": report.found(),
        "corners": report.quad.map(|q| q.corners),
        "edge_pixels": report.edge_pixels,
        "contours": report.contour_count,
        "longest_contour": report.longest_contour,
        "simplified_vertices": report.simplified_vertices,
        "elapsed_ms": report.elapsed.as_secs_f64() * 1e3,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn run_scan(args: &ScanArgs, config: ScanConfig) -> CliResult<()> {
    let camera = StillImageCamera::from_path(&args.image)?;
    let jpeg_quality = config.jpeg_quality;
    let mut session = ScanSession::new(camera, config)?;
    session.start().await?;

    let (stop_tx, stop_rx) = watch::channel(false);
    let loop_for = Duration::from_millis(args.loop_ms);
    let timer = tokio::spawn(async move {
        tokio::time::sleep(loop_for).await;
        let _ = stop_tx.send(true);
    });
    run_frame_loop(&mut session, stop_rx).await;
    timer.await?;

    match session.current_quad() {
        Some(quad) => tracing::info!("Document found: {:?}", quad.corners),
        None => tracing::warn!("No document outline found, capturing the full frame"),
    }
    let page = session.capture()?;
    let bytes = match args.format {
        OutputFormat::Jpeg => page.encode_jpeg(jpeg_quality)?,
        OutputFormat::Png => page.encode_png()?,
    };
    let out = args.out.clone().unwrap_or_else(|| {
        PathBuf::from(format!("{}.{}", page.file_stem(), args.format.extension()))
    });
    std::fs::write(&out, &bytes)?;

    let (w, h) = page.dimensions();
    tracing::info!(
        "Page {} written to {} ({}x{}, {} bytes, rectified: {})",
        page.id,
        out.display(),
        w,
        h,
        bytes.len(),
        page.rectified
    );
    Ok(())
}
