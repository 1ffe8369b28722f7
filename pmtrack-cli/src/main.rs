use clap::Parser;
use pmtrack::io::{load_frame, load_mask};
use pmtrack::{
    CanonicalRect, CoordinateMapping, Direction, FrameSequence, Metric, Point2, Progress,
    RangeReport, TrackState, Tracker, TrackerConfig,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "PmTrack CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum MetricConfig {
    #[default]
    Ssd,
    Sad,
    Ncc,
    Zncc,
}

impl From<MetricConfig> for Metric {
    fn from(value: MetricConfig) -> Self {
        match value {
            MetricConfig::Ssd => Metric::Ssd,
            MetricConfig::Sad => Metric::Sad,
            MetricConfig::Ncc => Metric::Ncc,
            MetricConfig::Zncc => Metric::Zncc,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum DirectionConfig {
    #[default]
    Forward,
    Backward,
}

impl From<DirectionConfig> for Direction {
    fn from(value: DirectionConfig) -> Self {
        match value {
            DirectionConfig::Forward => Direction::Forward,
            DirectionConfig::Backward => Direction::Backward,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FrameEntry {
    time: i64,
    path: String,
    #[serde(default)]
    mask_path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct TrackJson {
    center: [f64; 2],
    offset: [f64; 2],
    pattern: [f64; 4],
    search: [f64; 4],
    metric: MetricConfig,
}

impl Default for TrackJson {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0],
            offset: [0.0, 0.0],
            pattern: [-8.0, -8.0, 8.0, 8.0],
            search: [-24.0, -24.0, 24.0, 24.0],
            metric: MetricConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RangeJson {
    first: i64,
    last: i64,
    direction: DirectionConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct TrackerJson {
    parallel: bool,
    band_rows: usize,
    render_scale: [f64; 2],
    pixel_aspect: f64,
}

impl Default for TrackerJson {
    fn default() -> Self {
        let cfg = TrackerConfig::default();
        Self {
            parallel: cfg.parallel,
            band_rows: cfg.band_rows,
            render_scale: [cfg.mapping.render_scale_x, cfg.mapping.render_scale_y],
            pixel_aspect: cfg.mapping.pixel_aspect,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    frames: Vec<FrameEntry>,
    output_path: Option<String>,
    track: TrackJson,
    range: RangeJson,
    tracker: TrackerJson,
}

#[derive(Debug, Serialize)]
struct KeyframeRecord {
    time: i64,
    x: f64,
    y: f64,
}

#[derive(Debug, Serialize)]
struct ReportRecord {
    steps: usize,
    committed: usize,
    aborted: usize,
    cancelled: bool,
}

impl From<RangeReport> for ReportRecord {
    fn from(value: RangeReport) -> Self {
        Self {
            steps: value.steps,
            committed: value.committed,
            aborted: value.aborted,
            cancelled: value.cancelled,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    report: ReportRecord,
    keyframes: Vec<KeyframeRecord>,
}

/// Logs range progress through `tracing`.
struct LogProgress;

impl Progress for LogProgress {
    fn report(&mut self, fraction: f64) -> bool {
        tracing::info!(progress = fraction, "range progress");
        true
    }
}

fn rect(r: [f64; 4]) -> CanonicalRect {
    CanonicalRect::new(r[0], r[1], r[2], r[3])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("pmtrack=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.frames.is_empty() {
        return Err("frames must list at least one frame in the config".into());
    }

    let mut frames = FrameSequence::new();
    for entry in &config.frames {
        frames.insert(entry.time, load_frame(&entry.path)?);
        if let Some(mask_path) = &entry.mask_path {
            frames.insert_mask(entry.time, load_mask(mask_path)?);
        }
    }

    let track = config.track;
    let mut state = TrackState::new(
        Point2::new(track.center[0], track.center[1]),
        rect(track.pattern),
        rect(track.search),
    )
    .with_offset(Point2::new(track.offset[0], track.offset[1]))
    .with_metric(track.metric.into());

    let tracker = Tracker::new().with_config(TrackerConfig {
        parallel: config.tracker.parallel,
        band_rows: config.tracker.band_rows,
        sync_timeline: false,
        mapping: CoordinateMapping {
            render_scale_x: config.tracker.render_scale[0],
            render_scale_y: config.tracker.render_scale[1],
            pixel_aspect: config.tracker.pixel_aspect,
        },
    });

    let report = tracker.track_range(
        &mut state,
        &frames,
        config.range.first,
        config.range.last,
        config.range.direction.into(),
        &mut LogProgress,
    )?;

    let keyframes = state
        .center
        .iter()
        .map(|(time, p)| KeyframeRecord {
            time,
            x: p.x,
            y: p.y,
        })
        .collect();
    let output = Output {
        report: report.into(),
        keyframes,
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
