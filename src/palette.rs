use std::collections::HashMap;

use image::{Rgb, RgbaImage};

use crate::config::{ALPHA_THRESHOLD, Settings};

/// A representative color and the number of visible pixels folded into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub color: Rgb<u8>,
    pub weight: u64,
}

/// Quantized full-color palette, ordered by descending weight.
///
/// Entries with equal weight are ordered by their color tuple so the order
/// (and therefore capping and nearest-color ties) never depends on hashing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Build a palette with the block size, tolerance, and cap derived from `settings`.
    pub fn from_settings(image: &RgbaImage, settings: &Settings) -> Self {
        Self::build(
            image,
            settings.block_size(),
            settings.tolerance(),
            settings.palette_cap(),
        )
    }

    /// Average visible pixels over non-overlapping `block_size` squares, round each
    /// channel to a multiple of `tolerance`, and accumulate the results.
    pub fn build(
        image: &RgbaImage,
        block_size: u32,
        tolerance: u32,
        cap: Option<usize>,
    ) -> Self {
        let block_size = block_size.max(1);
        let (w, h) = image.dimensions();
        let mut weights: HashMap<[u8; 3], u64> = HashMap::new();

        for by in (0..h).step_by(block_size as usize) {
            for bx in (0..w).step_by(block_size as usize) {
                let mut sum = [0u64; 3];
                let mut count = 0u64;
                for y in by..(by + block_size).min(h) {
                    for x in bx..(bx + block_size).min(w) {
                        let px = image.get_pixel(x, y);
                        if px[3] > ALPHA_THRESHOLD {
                            sum[0] += u64::from(px[0]);
                            sum[1] += u64::from(px[1]);
                            sum[2] += u64::from(px[2]);
                            count += 1;
                        }
                    }
                }
                if count == 0 {
                    continue;
                }
                let key = sum.map(|channel| quantize_channel(channel / count, tolerance));
                *weights.entry(key).or_insert(0) += count;
            }
        }

        let mut entries: Vec<PaletteEntry> = weights
            .into_iter()
            .map(|(color, weight)| PaletteEntry {
                color: Rgb(color),
                weight,
            })
            .collect();
        entries.sort_by(|a, b| b.weight.cmp(&a.weight).then(a.color.0.cmp(&b.color.0)));
        if let Some(cap) = cap {
            entries.truncate(cap);
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the entry closest to `rgb` in Euclidean RGB distance.
    ///
    /// The first entry wins on equal distance. Returns `None` for an empty palette.
    pub fn nearest(&self, rgb: [u8; 3]) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (index, entry) in self.entries.iter().enumerate() {
            let dist = squared_distance(rgb, entry.color.0);
            if best.is_none_or(|(_, best_dist)| dist < best_dist) {
                best = Some((index, dist));
            }
        }
        best.map(|(index, _)| index)
    }
}

/// Round `value` to the nearest multiple of `tolerance`, clamped to a byte.
fn quantize_channel(value: u64, tolerance: u32) -> u8 {
    if tolerance == 0 {
        return value.min(255) as u8;
    }
    let tolerance = u64::from(tolerance);
    let rounded = (value + tolerance / 2) / tolerance * tolerance;
    rounded.min(255) as u8
}

// Squared distance keeps the ordering of the Euclidean one.
fn squared_distance(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&p, &q)| {
            let d = i32::from(p) - i32::from(q);
            (d * d) as u32
        })
        .sum()
}
