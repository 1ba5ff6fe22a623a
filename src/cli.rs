use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pixtrace::{
    ColorMode, ColorSimplification, OptimizationLevel, PixtraceResult, QualityTier, Settings,
};

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(author, version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalOptions {
    /// Increase log verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a raster image into an SVG document
    Convert(ConvertCommand),
    /// Print the color palette the full-color classifier would build
    Palette(PaletteCommand),
}

#[derive(Args, Debug)]
pub struct ConvertCommand {
    /// Input image path
    pub input: PathBuf,
    /// Output path (defaults to input name with `.svg`, or `.json` with --json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Write the conversion record (svg plus sizes) as JSON instead of bare SVG
    #[arg(long)]
    pub json: bool,
    /// Save the pre-processed raster the engine traced (defaults to `<name>-prepared.png`)
    #[arg(long = "export-prepared", value_name = "PATH", num_args = 0..=1)]
    pub export_prepared: Option<Option<PathBuf>>,
    #[command(flatten)]
    pub settings: SettingsArgs,
}

#[derive(Args, Debug)]
pub struct PaletteCommand {
    /// Input image path
    pub input: PathBuf,
    #[command(flatten)]
    pub settings: SettingsArgs,
}

/// Conversion settings. Flags override values from `--settings`.
#[derive(Args, Debug)]
pub struct SettingsArgs {
    /// Settings as JSON text, e.g. `{"colorMode":"grayscale","detailLevel":90}`
    #[arg(long, env = "PIXTRACE_SETTINGS")]
    pub settings: Option<String>,
    /// Palette sampling density
    #[arg(long, value_enum)]
    pub quality: Option<QualityArg>,
    /// Color reduction mode
    #[arg(long = "color-mode", value_enum)]
    pub color_mode: Option<ColorModeArg>,
    /// Palette quantization strength
    #[arg(long, value_enum)]
    pub simplification: Option<SimplificationArg>,
    /// Detail level (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub detail: Option<u8>,
    /// Smoothing strength (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub smoothing: Option<u8>,
    /// Output optimization level
    #[arg(long, value_enum)]
    pub optimization: Option<OptimizationArg>,
    /// Skip the gaussian noise-reduction pass
    #[arg(long = "no-noise-reduction")]
    pub no_noise_reduction: bool,
}

impl SettingsArgs {
    /// Build the effective settings: JSON text first, then explicit flags on top.
    pub fn resolve(&self) -> PixtraceResult<Settings> {
        let mut settings = match &self.settings {
            Some(text) => Settings::from_json(text)?,
            None => Settings::default(),
        };
        if let Some(quality) = self.quality {
            settings = settings.with_quality_tier(quality.into());
        }
        if let Some(mode) = self.color_mode {
            settings = settings.with_color_mode(mode.into());
        }
        if let Some(simplification) = self.simplification {
            settings = settings.with_color_simplification(simplification.into());
        }
        if let Some(detail) = self.detail {
            settings = settings.with_detail_level(detail);
        }
        if let Some(smoothing) = self.smoothing {
            settings = settings.with_smoothing_strength(smoothing);
        }
        if let Some(optimization) = self.optimization {
            settings = settings.with_optimization_level(optimization.into());
        }
        if self.no_noise_reduction {
            settings = settings.with_noise_reduction(false);
        }
        Ok(settings)
    }
}

/// Palette sampling density.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum QualityArg {
    UltraHigh,
    High,
    Medium,
    Low,
}

impl From<QualityArg> for QualityTier {
    fn from(value: QualityArg) -> Self {
        match value {
            QualityArg::UltraHigh => QualityTier::UltraHigh,
            QualityArg::High => QualityTier::High,
            QualityArg::Medium => QualityTier::Medium,
            QualityArg::Low => QualityTier::Low,
        }
    }
}

/// Color reduction modes.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ColorModeArg {
    FullColor,
    Grayscale,
    BlackWhite,
}

impl From<ColorModeArg> for ColorMode {
    fn from(value: ColorModeArg) -> Self {
        match value {
            ColorModeArg::FullColor => ColorMode::FullColor,
            ColorModeArg::Grayscale => ColorMode::Grayscale,
            ColorModeArg::BlackWhite => ColorMode::BlackWhite,
        }
    }
}

/// Palette quantization strengths.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SimplificationArg {
    Precise,
    Balanced,
    Simplified,
}

impl From<SimplificationArg> for ColorSimplification {
    fn from(value: SimplificationArg) -> Self {
        match value {
            SimplificationArg::Precise => ColorSimplification::Precise,
            SimplificationArg::Balanced => ColorSimplification::Balanced,
            SimplificationArg::Simplified => ColorSimplification::Simplified,
        }
    }
}

/// Output optimization levels.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OptimizationArg {
    Maximum,
    High,
    Medium,
    Low,
}

impl From<OptimizationArg> for OptimizationLevel {
    fn from(value: OptimizationArg) -> Self {
        match value {
            OptimizationArg::Maximum => OptimizationLevel::Maximum,
            OptimizationArg::High => OptimizationLevel::High,
            OptimizationArg::Medium => OptimizationLevel::Medium,
            OptimizationArg::Low => OptimizationLevel::Low,
        }
    }
}
