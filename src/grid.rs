use image::RgbaImage;

use crate::classify::{ClassId, Classifier};
use crate::config::ALPHA_THRESHOLD;
use crate::geom::GridPoint;

/// Dense per-pixel class labels; `None` marks transparent pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassGrid {
    width: u32,
    height: u32,
    labels: Vec<Option<ClassId>>,
}

impl ClassGrid {
    /// Label every visible pixel of `image` with its class.
    pub fn assign(image: &RgbaImage, classifier: &Classifier) -> Self {
        let (width, height) = image.dimensions();
        let labels = image
            .pixels()
            .map(|px| {
                if px[3] > ALPHA_THRESHOLD {
                    classifier.classify([px[0], px[1], px[2]])
                } else {
                    None
                }
            })
            .collect();
        Self {
            width,
            height,
            labels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Flat row-major index of `(x, y)`.
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Option<ClassId> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.labels[self.index(x, y)]
    }

    pub fn labels(&self) -> &[Option<ClassId>] {
        &self.labels
    }

    pub fn point_at(&self, index: usize) -> GridPoint {
        let w = self.width as usize;
        GridPoint::new((index % w) as u32, (index / w) as u32)
    }

    /// Distinct classes present in the grid, ascending.
    pub fn classes(&self) -> Vec<ClassId> {
        let mut seen: Vec<ClassId> = self.labels.iter().flatten().copied().collect();
        seen.sort_unstable();
        seen.dedup();
        seen
    }

    /// Number of pixels labelled `class`.
    pub fn count(&self, class: ClassId) -> usize {
        self.labels.iter().filter(|l| **l == Some(class)).count()
    }
}
