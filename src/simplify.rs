//! Path simplification (iterative Ramer-Douglas-Peucker) and light smoothing.
//!
//! Contours are closed loops whose first and last points are neighbors, so a
//! closed loop is simplified with its start point appended again: the first
//! chord then has zero length and the farthest point from the start (by plain
//! distance) becomes the second anchor.

use crate::contour::Contour;
use crate::geom::Point;

/// Chords shorter than this are treated as a single point.
const DEGENERATE_CHORD: f64 = 1e-9;

/// Smoothing is skipped for paths this short; a quadrilateral has no curve to smooth.
const MIN_SMOOTHED_POINTS: usize = 5;

/// Simplified and smoothed outline of one region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimplifiedPath {
    pub points: Vec<Point>,
}

impl SimplifiedPath {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Distance from `p` to the segment `a`-`b`, or to `a` when the segment is degenerate.
pub fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx.mul_add(dx, dy * dy);
    if length_sq < DEGENERATE_CHORD {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    p.distance(Point::new(t.mul_add(dx, a.x), t.mul_add(dy, a.y)))
}

/// Indices kept by Ramer-Douglas-Peucker on an open polyline, ascending.
///
/// Uses an explicit stack of index ranges instead of recursion. The first and
/// last points are always kept.
pub fn simplify_indices(points: &[Point], epsilon: f64) -> Vec<usize> {
    let n = points.len();
    if n < 3 {
        return (0..n).collect();
    }

    let mut kept = vec![false; n];
    kept[0] = true;
    kept[n - 1] = true;
    let mut stack = vec![(0, n - 1)];

    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let mut max_dist = 0.0;
        let mut max_idx = start;
        for i in (start + 1)..end {
            let d = segment_distance(points[i], points[start], points[end]);
            if d > max_dist {
                max_dist = d;
                max_idx = i;
            }
        }
        if max_dist > epsilon {
            kept[max_idx] = true;
            stack.push((max_idx, end));
            stack.push((start, max_idx));
        }
    }

    kept.iter()
        .enumerate()
        .filter_map(|(i, k)| k.then_some(i))
        .collect()
}

/// Simplify an open polyline.
pub fn simplify(points: &[Point], epsilon: f64) -> Vec<Point> {
    simplify_indices(points, epsilon)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

/// Simplify a closed loop given without its repeated start point.
pub fn simplify_closed(points: &[Point], epsilon: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let mut looped = points.to_vec();
    looped.push(points[0]);
    let mut kept = simplify(&looped, epsilon);
    kept.pop();
    kept
}

/// Apply `passes` rounds of 3-point moving average to the interior points.
pub fn smooth(points: &[Point], passes: usize) -> Vec<Point> {
    let mut current = points.to_vec();
    if current.len() < 3 {
        return current;
    }
    for _ in 0..passes {
        let mut next = current.clone();
        for i in 1..current.len() - 1 {
            let (prev, here, after) = (current[i - 1], current[i], current[i + 1]);
            next[i] = Point::new(
                (prev.x + here.x + after.x) / 3.0,
                (prev.y + here.y + after.y) / 3.0,
            );
        }
        current = next;
    }
    current
}

/// Epsilon for one contour: never more than a quarter of its larger extent,
/// never less than the 0.5 floor, so small shapes keep their corners.
pub fn contour_epsilon(points: &[Point], epsilon: f64) -> f64 {
    let Some(first) = points.first() else {
        return epsilon;
    };
    let (mut min, mut max) = (*first, *first);
    for p in points {
        min = Point::new(min.x.min(p.x), min.y.min(p.y));
        max = Point::new(max.x.max(p.x), max.y.max(p.y));
    }
    let extent = (max.x - min.x).max(max.y - min.y);
    epsilon.min(extent * 0.25).max(0.5)
}

/// Simplify and smooth a traced contour.
pub fn simplify_contour(contour: &Contour, epsilon: f64, passes: usize) -> SimplifiedPath {
    let points: Vec<Point> = contour.points.iter().map(|&p| Point::from(p)).collect();
    let epsilon = contour_epsilon(&points, epsilon);
    let simplified = simplify_closed(&points, epsilon);
    let points = if simplified.len() >= MIN_SMOOTHED_POINTS {
        smooth(&simplified, passes)
    } else {
        simplified
    };
    SimplifiedPath { points }
}
