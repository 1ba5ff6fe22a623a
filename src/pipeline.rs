use image::RgbaImage;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::classify::{ClassId, Classifier};
use crate::config::Settings;
use crate::contour::trace_contour;
use crate::grid::ClassGrid;
use crate::segment::segment_class;
use crate::simplify::{SimplifiedPath, simplify_contour};
use crate::svg::{VectorDocument, VectorShape};

/// One region's outline before a fill color is attached.
#[derive(Debug, Clone)]
struct TracedRegion {
    class: ClassId,
    area: usize,
    path: SimplifiedPath,
}

/// Convert `image` into a vector document.
///
/// Pure and deterministic: equal inputs give equal documents, with or without
/// the `parallel` feature. Shapes are ordered by descending region area, so
/// regions enclosed by another region are painted on top of it.
pub fn vectorize(image: &RgbaImage, settings: &Settings) -> VectorDocument {
    let (width, height) = image.dimensions();
    let classifier = Classifier::from_settings(image, settings);
    if let Classifier::Palette(palette) = &classifier {
        log::debug!("Palette holds {} colors", palette.len());
    }

    let grid = ClassGrid::assign(image, &classifier);
    let classes = grid.classes();
    log::debug!("{} of {} classes are present", classes.len(), classifier.class_count());

    let mut traced: Vec<TracedRegion> = trace_classes(&grid, &classes, settings)
        .into_iter()
        .flatten()
        .collect();
    traced.sort_by(|a, b| b.area.cmp(&a.area));

    let shapes: Vec<VectorShape> = traced
        .into_iter()
        .filter(|t| !t.path.is_empty())
        .map(|t| VectorShape::new(t.path, classifier.fill_color(t.class)))
        .collect();
    log::debug!("Emitting {} shapes on a {width}x{height} canvas", shapes.len());

    VectorDocument::new(width, height, shapes)
}

#[cfg(feature = "parallel")]
fn trace_classes(
    grid: &ClassGrid,
    classes: &[ClassId],
    settings: &Settings,
) -> Vec<Vec<TracedRegion>> {
    classes
        .par_iter()
        .map(|&class| trace_class(grid, class, settings))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn trace_classes(
    grid: &ClassGrid,
    classes: &[ClassId],
    settings: &Settings,
) -> Vec<Vec<TracedRegion>> {
    classes
        .iter()
        .map(|&class| trace_class(grid, class, settings))
        .collect()
}

/// Segment, trace, and simplify every region of one class.
fn trace_class(grid: &ClassGrid, class: ClassId, settings: &Settings) -> Vec<TracedRegion> {
    let epsilon = settings.epsilon();
    let passes = settings.smoothing_passes();
    segment_class(grid, class)
        .into_iter()
        .map(|region| {
            let contour = trace_contour(&region, grid.width(), grid.height());
            TracedRegion {
                class,
                area: region.len(),
                path: simplify_contour(&contour, epsilon, passes),
            }
        })
        .collect()
}
