use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::PixtraceResult;

/// Pixels with alpha at or below this value are transparent and never vectorized.
pub const ALPHA_THRESHOLD: u8 = 128;
/// Brightness below this value is foreground in black-white mode.
pub const BLACK_WHITE_THRESHOLD: u8 = 128;
/// Number of luminance bands used in grayscale mode.
pub const LUMINANCE_LEVELS: u8 = 16;

/// Sampling density of the palette builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualityTier {
    UltraHigh,
    #[default]
    High,
    Medium,
    Low,
}

/// How pixel colors are reduced to classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorMode {
    #[default]
    FullColor,
    Grayscale,
    BlackWhite,
}

/// Quantization strength of the full-color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorSimplification {
    Precise,
    #[default]
    Balanced,
    Simplified,
}

/// How aggressively the emitted document is stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptimizationLevel {
    Maximum,
    #[default]
    High,
    Medium,
    Low,
}

impl OptimizationLevel {
    /// Whether the XML declaration is dropped from the output.
    pub fn strips_declaration(self) -> bool {
        matches!(self, OptimizationLevel::Maximum | OptimizationLevel::High)
    }
}

/// Options controlling a single conversion.
///
/// Field names serialize in camelCase so the record matches the settings text
/// sent by web clients; the older form names are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[serde(alias = "quality")]
    pub quality_tier: QualityTier,
    pub color_mode: ColorMode,
    pub color_simplification: ColorSimplification,
    /// 0-100, higher keeps finer palette sampling.
    pub detail_level: u8,
    /// 0-100, higher keeps more path points.
    #[serde(alias = "smoothing")]
    pub smoothing_strength: u8,
    /// Applied while preparing the image, before the engine runs.
    #[serde(alias = "noiseReduction")]
    pub noise_reduction_enabled: bool,
    pub optimization_level: OptimizationLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality_tier: QualityTier::High,
            color_mode: ColorMode::FullColor,
            color_simplification: ColorSimplification::Balanced,
            detail_level: 75,
            smoothing_strength: 50,
            noise_reduction_enabled: true,
            optimization_level: OptimizationLevel::High,
        }
    }
}

impl Settings {
    /// Parse settings text, failing on malformed input.
    pub fn from_json(text: &str) -> PixtraceResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse settings text field by field, keeping the defaults for fields that fail.
    ///
    /// Percentages are rounded and clamped to 0-100. Text that is not a JSON
    /// object falls back to the defaults entirely.
    pub fn from_json_lenient(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::default();
        }
        let fields = match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(fields)) => fields,
            Ok(other) => {
                log::warn!("Settings are not an object, using defaults: {other}");
                return Self::default();
            }
            Err(err) => {
                log::warn!("Failed to parse settings, using defaults: {err}");
                return Self::default();
            }
        };

        let mut accepted = Map::new();
        let mut settings = Self::default();
        for (key, value) in fields {
            let mut candidate = accepted.clone();
            candidate.insert(key.clone(), clamp_percentage(&key, value));
            match serde_json::from_value::<Self>(Value::Object(candidate.clone())) {
                Ok(parsed) => {
                    accepted = candidate;
                    settings = parsed;
                }
                Err(err) => log::warn!("Ignoring setting `{key}`: {err}"),
            }
        }
        settings
    }

    pub fn with_quality_tier(mut self, tier: QualityTier) -> Self {
        self.quality_tier = tier;
        self
    }

    pub fn with_color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    pub fn with_color_simplification(mut self, simplification: ColorSimplification) -> Self {
        self.color_simplification = simplification;
        self
    }

    pub fn with_detail_level(mut self, level: u8) -> Self {
        self.detail_level = level.min(100);
        self
    }

    pub fn with_smoothing_strength(mut self, strength: u8) -> Self {
        self.smoothing_strength = strength.min(100);
        self
    }

    pub fn with_noise_reduction(mut self, enabled: bool) -> Self {
        self.noise_reduction_enabled = enabled;
        self
    }

    pub fn with_optimization_level(mut self, level: OptimizationLevel) -> Self {
        self.optimization_level = level;
        self
    }

    /// Side of the square blocks averaged by the palette builder.
    pub fn block_size(&self) -> u32 {
        let base = match self.quality_tier {
            QualityTier::UltraHigh => return 1,
            QualityTier::High => 1,
            QualityTier::Medium => 2,
            QualityTier::Low => 4,
        };
        let coarsening = (100 - u32::from(self.detail_level.min(100))) / 40;
        base + coarsening
    }

    /// Channel rounding step for palette quantization.
    pub fn tolerance(&self) -> u32 {
        match self.color_simplification {
            ColorSimplification::Precise => 3,
            ColorSimplification::Balanced => 8,
            ColorSimplification::Simplified => 15,
        }
    }

    /// Maximum palette size, `None` when uncapped.
    pub fn palette_cap(&self) -> Option<usize> {
        match self.color_simplification {
            ColorSimplification::Precise => None,
            ColorSimplification::Balanced => Some(16),
            ColorSimplification::Simplified => Some(12),
        }
    }

    /// Maximum perpendicular deviation tolerated by path simplification.
    pub fn epsilon(&self) -> f64 {
        let strength = f64::from(self.smoothing_strength.min(100));
        ((100.0 - strength) * 0.1).max(0.5)
    }

    /// Number of moving-average passes applied after simplification.
    pub fn smoothing_passes(&self) -> usize {
        match self.smoothing_strength {
            0 => 0,
            76.. => 2,
            _ => 1,
        }
    }
}

/// Keys holding 0-100 percentages, including the web form alias.
const PERCENTAGE_KEYS: [&str; 3] = ["detailLevel", "smoothingStrength", "smoothing"];

fn clamp_percentage(key: &str, value: Value) -> Value {
    match value.as_f64() {
        Some(n) if PERCENTAGE_KEYS.contains(&key) => {
            Value::from(n.round().clamp(0.0, 100.0) as u8)
        }
        _ => value,
    }
}
