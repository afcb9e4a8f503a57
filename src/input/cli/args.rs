use std::path::PathBuf;

use clap::Parser;

use crate::core::colour_maps::hsb_palette::DEFAULT_PALETTE_SIZE;
use crate::core::data::chunk_plan::{DEFAULT_GRANULARITY, DEFAULT_WORKER_COUNT};
use crate::core::data::render_config::RenderConfig;
use crate::core::data::render_job::WorkerFailurePolicy;

pub const DEFAULT_OUTPUT_PATH: &str = "zad18.png";

/// Render the cos(z)*c escape-time fractal to an image file
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "cosine-fractal", version)]
pub struct CliArgs {
    /// Image size as WIDTHxHEIGHT
    #[arg(short, long, value_name = "WxH", default_value = "640x480", value_parser = parse_size)]
    pub size: (u32, u32),

    /// Complex plane window as MIN_REAL:MAX_REAL:MIN_IMAG:MAX_IMAG
    #[arg(
        short,
        long,
        value_name = "A:B:C:D",
        default_value = "-2.0:2.0:-2.0:2.0",
        allow_hyphen_values = true,
        value_parser = parse_rect
    )]
    pub rect: [f64; 4],

    /// Number of worker threads
    #[arg(short, long, default_value_t = DEFAULT_WORKER_COUNT)]
    pub tasks: u32,

    /// Chunks per worker
    #[arg(short, long, default_value_t = DEFAULT_GRANULARITY)]
    pub granularity: u32,

    /// Output file; a .ppm extension writes PPM, anything else PNG
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Suppress per-worker and thread count output
    #[arg(short, long)]
    pub quiet: bool,

    /// Palette length, which is also the iteration cap
    #[arg(short, long, default_value_t = DEFAULT_PALETTE_SIZE)]
    pub palette_size: u32,

    /// Keep the partially rendered image when a worker fails
    #[arg(long)]
    pub best_effort: bool,
}

impl CliArgs {
    pub fn render_config(&self) -> RenderConfig {
        let (width, height) = self.size;
        let [min_real, max_real, min_imag, max_imag] = self.rect;

        RenderConfig {
            width,
            height,
            min_real,
            max_real,
            min_imag,
            max_imag,
            workers: self.tasks,
            granularity: self.granularity,
            palette_size: self.palette_size,
            quiet: self.quiet,
            failure_policy: if self.best_effort {
                WorkerFailurePolicy::BestEffort
            } else {
                WorkerFailurePolicy::Abort
            },
        }
    }
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{value}`"))?;

    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map_err(|err| format!("invalid dimension `{part}`: {err}"))
    };

    Ok((parse(width)?, parse(height)?))
}

fn parse_rect(value: &str) -> Result<[f64; 4], String> {
    let parts: Vec<&str> = value.split(':').collect();

    let [a, b, c, d] = *parts.as_slice() else {
        return Err(format!(
            "expected MIN_REAL:MAX_REAL:MIN_IMAG:MAX_IMAG, got `{value}`"
        ));
    };

    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|err| format!("invalid coordinate `{part}`: {err}"))
    };

    Ok([parse(a)?, parse(b)?, parse(c)?, parse(d)?])
}
