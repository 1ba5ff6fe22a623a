use image::{Rgb, RgbaImage};

use crate::config::{BLACK_WHITE_THRESHOLD, ColorMode, LUMINANCE_LEVELS, Settings};
use crate::palette::Palette;

/// Discrete label assigned to a visible pixel.
pub type ClassId = u32;

/// Reduces pixel colors to a small set of classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classifier {
    /// Nearest entry of a quantized palette; the class is the palette index.
    Palette(Palette),
    /// Fixed luminance bands, class 0 is darkest.
    Luminance { levels: u8 },
    /// Binary foreground split: class 1 when darker than the threshold.
    Threshold { value: u8 },
}

impl Classifier {
    /// Build the classifier for the color mode in `settings`.
    pub fn from_settings(image: &RgbaImage, settings: &Settings) -> Self {
        match settings.color_mode {
            ColorMode::FullColor => Classifier::Palette(Palette::from_settings(image, settings)),
            ColorMode::Grayscale => Classifier::Luminance {
                levels: LUMINANCE_LEVELS,
            },
            ColorMode::BlackWhite => Classifier::Threshold {
                value: BLACK_WHITE_THRESHOLD,
            },
        }
    }

    /// Class of a visible pixel, `None` only when the palette is empty.
    pub fn classify(&self, rgb: [u8; 3]) -> Option<ClassId> {
        match self {
            Classifier::Palette(palette) => palette
                .nearest(rgb)
                .and_then(|i| ClassId::try_from(i).ok()),
            Classifier::Luminance { levels } => {
                // floor(sum / 3 / 255 * steps) without leaving integers
                let steps = u32::from(levels.saturating_sub(1));
                Some((channel_sum(rgb) * steps / (3 * 255)) as ClassId)
            }
            Classifier::Threshold { value } => {
                Some(ClassId::from(channel_sum(rgb) < 3 * u32::from(*value)))
            }
        }
    }

    /// Fill color used when emitting shapes of `class`.
    pub fn fill_color(&self, class: ClassId) -> Rgb<u8> {
        match self {
            Classifier::Palette(palette) => usize::try_from(class)
                .ok()
                .and_then(|i| palette.entries().get(i))
                .map(|entry| entry.color)
                .unwrap_or(Rgb([0, 0, 0])),
            Classifier::Luminance { levels } => {
                let steps = u32::from(levels.saturating_sub(1).max(1));
                let gray = (u32::from(class) * 255 / steps).min(255) as u8;
                Rgb([gray, gray, gray])
            }
            Classifier::Threshold { .. } => {
                if class == 1 {
                    Rgb([0, 0, 0])
                } else {
                    Rgb([255, 255, 255])
                }
            }
        }
    }

    /// Number of classes this classifier can produce.
    pub fn class_count(&self) -> usize {
        match self {
            Classifier::Palette(palette) => palette.len(),
            Classifier::Luminance { levels } => usize::from(*levels),
            Classifier::Threshold { .. } => 2,
        }
    }
}

/// Sum of the three channels; the brightness is this divided by 3.
fn channel_sum(rgb: [u8; 3]) -> u32 {
    rgb.iter().map(|&c| u32::from(c)).sum()
}
