use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use mirrortrace::tracer::MAX_REFLECTION_DEPTH;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Debug, Parser)]
#[command(name = "mirrortrace")]
#[command(about = "A recursive ray tracer for mirrored spheres")]
pub struct Args {
    /// TOML scene file; the built-in scene is rendered when omitted
    #[arg(short, long)]
    pub scene: Option<PathBuf>,

    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// Image width in pixels
    #[arg(long, default_value = "800", value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "600", value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Override the scene's maximum reflection depth
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=MAX_REFLECTION_DEPTH as i64))]
    pub max_depth: Option<u32>,

    /// Trace pixels one by one in scan order instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Send image to TEV for real-time visualization
    #[arg(long)]
    pub tev: bool,

    /// TEV client IP address and port (automatically enables --tev)
    #[arg(long)]
    pub tev_address: Option<String>,

    /// Output file path (.png for clamped 8-bit, .exr for linear HDR)
    #[arg(short, long, default_value = "output.png")]
    pub output: PathBuf,
}
