use std::collections::VecDeque;

use crate::classify::ClassId;
use crate::geom::{Bounds, GridPoint};
use crate::grid::ClassGrid;

/// A maximal 4-connected group of same-class pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub class: ClassId,
    /// Pixels in breadth-first discovery order; the first one is the seed.
    pub pixels: Vec<GridPoint>,
    pub bounds: Bounds,
}

impl Region {
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Topmost, then leftmost, pixel.
    pub fn top_left(&self) -> Option<GridPoint> {
        self.pixels.iter().copied().min_by_key(|p| (p.y, p.x))
    }
}

/// Split the pixels of `class` into 4-connected regions, seeded in row-major order.
pub fn segment_class(grid: &ClassGrid, class: ClassId) -> Vec<Region> {
    let (w, h) = (grid.width(), grid.height());
    let labels = grid.labels();
    let mut visited = vec![false; labels.len()];
    let mut queue = VecDeque::new();
    let mut regions = Vec::new();

    let idx = |x: u32, y: u32| -> usize { (y as usize) * (w as usize) + x as usize };

    for seed in 0..labels.len() {
        if visited[seed] || labels[seed] != Some(class) {
            continue;
        }
        let start = grid.point_at(seed);
        visited[seed] = true;
        queue.push_back(start);
        let mut pixels = Vec::new();
        let mut bounds = Bounds::around(start);

        while let Some(p) = queue.pop_front() {
            pixels.push(p);
            bounds.include(p);

            let mut visit = |x: u32, y: u32| {
                let nid = idx(x, y);
                if !visited[nid] && labels[nid] == Some(class) {
                    visited[nid] = true;
                    queue.push_back(GridPoint::new(x, y));
                }
            };
            if p.x > 0 {
                visit(p.x - 1, p.y);
            }
            if p.x + 1 < w {
                visit(p.x + 1, p.y);
            }
            if p.y > 0 {
                visit(p.x, p.y - 1);
            }
            if p.y + 1 < h {
                visit(p.x, p.y + 1);
            }
        }

        regions.push(Region {
            class,
            pixels,
            bounds,
        });
    }

    regions
}
