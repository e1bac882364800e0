//! goesgif CLI: turn GOES satellite snapshots into animated GIFs.
//!
//! Usage:
//!   goesgif <INPUT_DIR> <OUTPUT_DIR> [OPTIONS]             Render one GIF per group
//!   goesgif <INPUT_DIR> <OUTPUT_DIR> --dry_run [OPTIONS]   List groups without rendering
//!
//! Defaults come from `$XDG_CONFIG_HOME/goesgif/config.json` when present;
//! flags override them.

use std::path::PathBuf;

use clap::Parser;

use goesgif_common::config::{AppConfig, DecodeErrorPolicy, PipelineConfig};
use goesgif_render_engine::RenderJob;

mod commands;

#[derive(Parser)]
#[command(
    name = "goesgif",
    about = "Create animated GIFs from GOES satellite image snapshots",
    version,
    author
)]
struct Cli {
    /// Input directory containing snapshots (scanned recursively)
    input_dir: PathBuf,

    /// Output directory for GIFs
    output_dir: PathBuf,

    /// Only use snapshots from the last N hours [default: 24]
    #[arg(long = "time_threshold")]
    time_threshold: Option<u32>,

    /// Resize percentage [default: 25]
    #[arg(long = "resize_percentage")]
    resize_percentage: Option<u32>,

    /// Resize percentage for closeup GIFs [default: same as --resize_percentage]
    #[arg(long = "closeup_resize_percentage")]
    closeup_resize_percentage: Option<u32>,

    /// Region to process: all, FD, M1, M2 [default: all]
    #[arg(long)]
    region: Option<String>,

    /// Channels to process (comma-separated substrings) [default: all]
    #[arg(long)]
    channels: Option<String>,

    /// Include enhanced channels
    #[arg(long = "include_enhanced")]
    include_enhanced: bool,

    /// Delay between frames in milliseconds [default: 100]
    #[arg(long = "convert_delay")]
    convert_delay: Option<u32>,

    /// Number of times the GIF loops, 0 loops forever [default: 0]
    #[arg(long = "convert_loop")]
    convert_loop: Option<u16>,

    /// Satellites to process (comma-separated, e.g. GOES18,GOES19) [default: all]
    #[arg(long)]
    satellites: Option<String>,

    /// Timezone for the timestamp overlay (IANA name) [default: UTC]
    #[arg(long)]
    timezone: Option<String>,

    /// Also create a cropped closeup GIF for full-disk groups
    #[arg(long)]
    closeup: bool,

    /// Scale factor for the timestamp font [default: 1.0]
    #[arg(long = "font_scale")]
    font_scale: Option<f32>,

    /// Font file for the timestamp overlay [default: embedded DejaVu Sans Bold]
    #[arg(long)]
    font: Option<PathBuf>,

    /// GIF palette quantization speed, 1 (best) to 30 (fastest) [default: 10]
    #[arg(long = "gif_speed")]
    gif_speed: Option<i32>,

    /// Log intervals longer than this many minutes as gaps [default: 45]
    #[arg(long = "gap_threshold")]
    gap_threshold: Option<u32>,

    /// What to do with unreadable images: abort or skip [default: abort]
    #[arg(long = "on_decode_error")]
    on_decode_error: Option<DecodeErrorPolicy>,

    /// Write a per-frame log with gap warnings to this file
    #[arg(long = "log_file")]
    log_file: Option<PathBuf>,

    /// List the groups that would be rendered and exit
    #[arg(long = "dry_run")]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit structured JSON logs
    #[arg(long = "json_logs")]
    json_logs: bool,
}

impl Cli {
    /// Overlay command-line flags on configured defaults.
    fn pipeline_config(&self, defaults: PipelineConfig) -> PipelineConfig {
        PipelineConfig {
            time_threshold_hours: self.time_threshold.unwrap_or(defaults.time_threshold_hours),
            resize_percentage: self.resize_percentage.unwrap_or(defaults.resize_percentage),
            closeup_resize_percentage: self
                .closeup_resize_percentage
                .or(defaults.closeup_resize_percentage),
            region: self.region.clone().unwrap_or(defaults.region),
            channels: self.channels.clone().unwrap_or(defaults.channels),
            include_enhanced: self.include_enhanced || defaults.include_enhanced,
            frame_delay_ms: self.convert_delay.unwrap_or(defaults.frame_delay_ms),
            loop_count: self.convert_loop.unwrap_or(defaults.loop_count),
            satellites: self.satellites.clone().unwrap_or(defaults.satellites),
            timezone: self.timezone.clone().unwrap_or(defaults.timezone),
            closeup: self.closeup || defaults.closeup,
            font_scale: self.font_scale.unwrap_or(defaults.font_scale),
            font_path: self.font.clone().or(defaults.font_path),
            gif_speed: self.gif_speed.unwrap_or(defaults.gif_speed),
            gap_threshold_minutes: self.gap_threshold.unwrap_or(defaults.gap_threshold_minutes),
            on_decode_error: self.on_decode_error.unwrap_or(defaults.on_decode_error),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let app_config = AppConfig::load();

    // Initialize logging
    let mut logging = app_config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    logging.json |= cli.json_logs;
    goesgif_common::logging::init_logging(&logging);

    let job = RenderJob {
        input_dir: cli.input_dir.clone(),
        output_dir: cli.output_dir.clone(),
        log_file: cli.log_file.clone(),
        config: cli.pipeline_config(app_config.defaults),
    };

    if cli.dry_run {
        commands::plan::run(&job)
    } else {
        commands::render::run(&job)
    }
}
