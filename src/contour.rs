//! Moore-neighbor boundary tracing.
//!
//! Each region is walked along its outer boundary, clockwise in image
//! coordinates, starting from its topmost-leftmost pixel. Only boundary pixels
//! (those touching a non-region or out-of-bounds 8-neighbor) are ever
//! visited, so interior pixels and holes never appear in the output.

use crate::geom::{Bounds, GridPoint};
use crate::segment::Region;

/// Hard upper bound on tracing steps, whatever the grid size.
pub const MAX_TRACE_STEPS: usize = 100_000;

/// Compass steps in clockwise order starting at "right" (y grows downwards).
const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Ordered outer boundary of one region. Closed: the last point connects back to the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contour {
    pub points: Vec<GridPoint>,
    /// Set when the step cap stopped the walk before it closed.
    pub truncated: bool,
}

impl Contour {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Membership bitmap of a region, local to its bounding box.
struct RegionMask {
    bounds: Bounds,
    bits: Vec<bool>,
}

impl RegionMask {
    fn new(region: &Region) -> Self {
        let bounds = region.bounds;
        let mut bits = vec![false; bounds.width() as usize * bounds.height() as usize];
        for p in &region.pixels {
            let i = (p.y - bounds.min_y) as usize * bounds.width() as usize
                + (p.x - bounds.min_x) as usize;
            bits[i] = true;
        }
        Self { bounds, bits }
    }

    fn contains(&self, p: GridPoint) -> bool {
        if !self.bounds.contains(p) {
            return false;
        }
        let i = (p.y - self.bounds.min_y) as usize * self.bounds.width() as usize
            + (p.x - self.bounds.min_x) as usize;
        self.bits[i]
    }

    fn contains_step(&self, p: GridPoint, (dx, dy): (i32, i32)) -> Option<GridPoint> {
        p.offset(dx, dy).filter(|n| self.contains(*n))
    }

    /// A region pixel with at least one 8-neighbor outside the region.
    fn is_boundary(&self, p: GridPoint) -> bool {
        DIRECTIONS
            .iter()
            .any(|step| self.contains_step(p, *step).is_none())
    }
}

/// First boundary neighbor of `current`, scanning clockwise from `dir`.
fn next_boundary(mask: &RegionMask, current: GridPoint, dir: usize) -> Option<(GridPoint, usize)> {
    (0..DIRECTIONS.len()).find_map(|i| {
        let d = (dir + i) % DIRECTIONS.len();
        mask.contains_step(current, DIRECTIONS[d])
            .filter(|n| mask.is_boundary(*n))
            .map(|n| (n, d))
    })
}

/// Trace the outer boundary of `region` on a `width` x `height` grid.
///
/// The walk stops when it returns to the start with more than three points
/// recorded, when it would repeat its first move from the start, when no
/// boundary neighbor exists (single pixels), or after
/// `min(width * height, MAX_TRACE_STEPS)` steps.
pub fn trace_contour(region: &Region, width: u32, height: u32) -> Contour {
    let Some(start) = region.top_left() else {
        return Contour::default();
    };
    let mask = RegionMask::new(region);
    let cap = (width as usize * height as usize).min(MAX_TRACE_STEPS);

    let mut points = vec![start];
    let mut current = start;
    let mut dir = 0;
    let mut first_move: Option<GridPoint> = None;

    for _ in 0..cap {
        let Some((next, moved)) = next_boundary(&mask, current, dir) else {
            return Contour {
                points,
                truncated: false,
            };
        };
        // Turn left: resume the scan two steps counter-clockwise of the move.
        dir = (moved + 6) % DIRECTIONS.len();
        if next == start {
            let resumed = next_boundary(&mask, start, dir).map(|(p, _)| p);
            if points.len() > 3 || resumed == first_move {
                return Contour {
                    points,
                    truncated: false,
                };
            }
        } else {
            first_move.get_or_insert(next);
            points.push(next);
        }
        current = next;
    }

    log::debug!(
        "Contour trace of class {} hit the {cap} step cap with {} points",
        region.class,
        points.len()
    );
    Contour {
        points,
        truncated: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;
    use crate::grid::ClassGrid;
    use crate::segment::segment_class;
    use image::{Rgba, RgbaImage};

    fn regions_from(rows: &[&str]) -> (Vec<Region>, u32, u32) {
        let h = rows.len() as u32;
        let w = rows[0].len() as u32;
        let mut image = RgbaImage::new(w, h);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    image.put_pixel(x as u32, y as u32, Rgba([0, 0, 0, 255]));
                }
            }
        }
        let grid = ClassGrid::assign(&image, &Classifier::Threshold { value: 128 });
        (segment_class(&grid, 1), w, h)
    }

    fn pts(coords: &[(u32, u32)]) -> Vec<GridPoint> {
        coords.iter().map(|&(x, y)| GridPoint::new(x, y)).collect()
    }

    #[test]
    fn empty_region_has_empty_contour() {
        let region = Region {
            class: 0,
            pixels: Vec::new(),
            bounds: Bounds::around(GridPoint::new(0, 0)),
        };
        assert!(trace_contour(&region, 4, 4).is_empty());
    }

    #[test]
    fn single_pixel_traces_to_one_point() {
        let (regions, w, h) = regions_from(&["   ", " # ", "   "]);
        let contour = trace_contour(&regions[0], w, h);
        assert_eq!(contour.points, pts(&[(1, 1)]));
        assert!(!contour.truncated);
    }

    #[test]
    fn two_by_two_square_visits_all_corners() {
        let (regions, w, h) = regions_from(&["##", "##"]);
        let contour = trace_contour(&regions[0], w, h);
        assert_eq!(contour.points, pts(&[(0, 0), (1, 0), (1, 1), (0, 1)]));
    }

    #[test]
    fn left_half_traces_rectangle() {
        let (regions, w, h) = regions_from(&["##  ", "##  ", "##  ", "##  "]);
        let contour = trace_contour(&regions[0], w, h);
        assert_eq!(
            contour.points,
            pts(&[
                (0, 0),
                (1, 0),
                (1, 1),
                (1, 2),
                (1, 3),
                (0, 3),
                (0, 2),
                (0, 1)
            ])
        );
    }

    #[test]
    fn interior_pixels_are_skipped() {
        let (regions, w, h) = regions_from(&["###", "###", "###"]);
        let contour = trace_contour(&regions[0], w, h);
        assert_eq!(contour.len(), 8);
        assert!(!contour.points.contains(&GridPoint::new(1, 1)));
    }

    #[test]
    fn two_pixel_bar_stops_after_repeating_first_move() {
        let (regions, w, h) = regions_from(&["##"]);
        let contour = trace_contour(&regions[0], w, h);
        assert_eq!(contour.points, pts(&[(0, 0), (1, 0)]));
        assert!(!contour.truncated);
    }

    #[test]
    fn ring_traces_outer_boundary_only() {
        let (regions, w, h) = regions_from(&["####", "#  #", "#  #", "####"]);
        let contour = trace_contour(&regions[0], w, h);
        assert_eq!(contour.len(), 12);
        assert_eq!(contour.points[0], GridPoint::new(0, 0));
    }

    #[test]
    fn step_cap_marks_truncation() {
        let (regions, _, _) = regions_from(&["###", "###", "###"]);
        let contour = trace_contour(&regions[0], 1, 3);
        assert_eq!(contour.len(), 4);
        assert!(contour.truncated);
    }

    #[test]
    fn contour_points_belong_to_region() {
        let (regions, w, h) = regions_from(&[" ## ", "####", " ###", "  ##"]);
        for region in &regions {
            let contour = trace_contour(region, w, h);
            for p in &contour.points {
                assert!(region.pixels.contains(p));
            }
            for pair in contour.points.windows(2) {
                let dx = pair[0].x.abs_diff(pair[1].x);
                let dy = pair[0].y.abs_diff(pair[1].y);
                assert!(dx <= 1 && dy <= 1, "non-adjacent step {pair:?}");
            }
        }
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        fn adjacent(a: GridPoint, b: GridPoint) -> bool {
            a.x.abs_diff(b.x) <= 1 && a.y.abs_diff(b.y) <= 1
        }

        fn arb_blob() -> impl Strategy<Value = Vec<String>> {
            (1usize..10, 1usize..10).prop_flat_map(|(w, h)| {
                proptest::collection::vec(proptest::collection::vec(any::<bool>(), w), h)
                    .prop_map(|rows| {
                        rows.into_iter()
                            .map(|row| row.into_iter().map(|on| if on { '#' } else { ' ' }).collect())
                            .collect()
                    })
            })
        }

        proptest! {
            /// Untruncated contours close on themselves and only visit boundary pixels.
            #[test]
            fn contours_are_closed_boundary_loops(rows in arb_blob()) {
                let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
                let (regions, w, h) = regions_from(&rows);
                for region in &regions {
                    let contour = trace_contour(region, w, h);
                    prop_assert!(!contour.is_empty());
                    prop_assert_eq!(contour.points[0], region.top_left().unwrap());
                    if contour.truncated {
                        continue;
                    }

                    let first = contour.points[0];
                    let last = contour.points[contour.len() - 1];
                    prop_assert!(adjacent(last, first), "{:?} does not close to {:?}", last, first);
                    for pair in contour.points.windows(2) {
                        prop_assert!(adjacent(pair[0], pair[1]), "non-adjacent step {:?}", pair);
                    }

                    let mask = RegionMask::new(region);
                    for p in &contour.points {
                        prop_assert!(mask.contains(*p));
                        prop_assert!(mask.is_boundary(*p), "{:?} is interior", p);
                    }
                }
            }
        }
    }
}
