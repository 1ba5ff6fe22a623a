use std::fmt::Write;
use std::sync::LazyLock;

use image::Rgb;
use regex::Regex;

use crate::config::OptimizationLevel;
use crate::simplify::SimplifiedPath;

/// Grid coordinates name pixels; paths run through pixel centers.
const PIXEL_CENTER: f64 = 0.5;

static XML_DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<\?xml[^>]*\?>").expect("static regex"));
static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n\t]+").expect("static regex"));
static BETWEEN_TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">\s+<").expect("static regex"));
static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").expect("static regex"));

/// One filled path of the output document.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorShape {
    pub path: SimplifiedPath,
    pub fill: Rgb<u8>,
}

impl VectorShape {
    pub fn new(path: SimplifiedPath, fill: Rgb<u8>) -> Self {
        Self { path, fill }
    }

    /// Path data using only move, line, and close commands.
    ///
    /// A single point becomes a zero-length closed segment so it still renders.
    pub fn path_data(&self) -> String {
        let points = &self.path.points;
        let mut d = String::new();
        let Some(first) = points.first() else {
            return d;
        };
        let _ = write!(
            d,
            "M{:.1},{:.1}",
            first.x + PIXEL_CENTER,
            first.y + PIXEL_CENTER
        );
        let rest = if points.len() == 1 {
            &points[..]
        } else {
            &points[1..]
        };
        for p in rest {
            let _ = write!(d, " L{:.1},{:.1}", p.x + PIXEL_CENTER, p.y + PIXEL_CENTER);
        }
        d.push_str(" Z");
        d
    }
}

/// Ordered shapes on a canvas of the processed image size.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorDocument {
    pub width: u32,
    pub height: u32,
    pub shapes: Vec<VectorShape>,
}

impl VectorDocument {
    pub fn new(width: u32, height: u32, shapes: Vec<VectorShape>) -> Self {
        Self {
            width,
            height,
            shapes,
        }
    }

    /// Serialize with declaration and one element per line.
    ///
    /// Each path is also stroked in its fill color with a one pixel width, so
    /// a path through pixel centers paints the full extent of its pixels.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
            w = self.width,
            h = self.height,
        );
        for shape in &self.shapes {
            let d = shape.path_data();
            if d.is_empty() {
                continue;
            }
            let color = hex_color(shape.fill);
            let _ = writeln!(
                out,
                r#"  <path fill="{color}" stroke="{color}" stroke-width="1" stroke-linejoin="round" stroke-linecap="round" d="{d}"/>"#,
            );
        }
        out.push_str("</svg>");
        out
    }

    /// Serialize and strip according to `level`.
    pub fn render(&self, level: OptimizationLevel) -> String {
        optimize_svg(&self.to_svg(), level)
    }
}

/// `#rrggbb` form of a color.
pub fn hex_color(color: Rgb<u8>) -> String {
    let Rgb([r, g, b]) = color;
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Drop the declaration at high levels, then remove line breaks and collapse whitespace.
pub fn optimize_svg(svg: &str, level: OptimizationLevel) -> String {
    let svg = if level.strips_declaration() {
        XML_DECLARATION.replace_all(svg, "")
    } else {
        svg.into()
    };
    let svg = LINE_BREAKS.replace_all(&svg, " ");
    let svg = BETWEEN_TAGS.replace_all(&svg, "><");
    let svg = SPACE_RUNS.replace_all(&svg, " ");
    svg.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;

    fn shape(points: &[(f64, f64)], fill: [u8; 3]) -> VectorShape {
        VectorShape::new(
            SimplifiedPath {
                points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            },
            Rgb(fill),
        )
    }

    #[test]
    fn path_data_uses_one_decimal_pixel_centers() {
        let s = shape(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)], [255, 0, 0]);
        assert_eq!(s.path_data(), "M0.5,0.5 L1.5,0.5 L1.5,1.5 L0.5,1.5 Z");
        let s = shape(&[(0.333, 2.666)], [0, 0, 0]);
        assert_eq!(s.path_data(), "M0.8,3.2 L0.8,3.2 Z");
    }

    #[test]
    fn empty_path_has_no_data_and_is_skipped() {
        let doc = VectorDocument::new(3, 3, vec![shape(&[], [1, 2, 3])]);
        assert_eq!(shape(&[], [1, 2, 3]).path_data(), "");
        assert!(!doc.to_svg().contains("<path"));
    }

    #[test]
    fn two_points_close_into_a_segment() {
        let s = shape(&[(0.0, 0.0), (3.0, 0.0)], [0, 0, 0]);
        assert_eq!(s.path_data(), "M0.5,0.5 L3.5,0.5 Z");
    }

    #[test]
    fn hex_is_lowercase_and_padded() {
        assert_eq!(hex_color(Rgb([255, 0, 10])), "#ff000a");
    }

    #[test]
    fn document_declares_canvas() {
        let doc = VectorDocument::new(4, 2, vec![shape(&[(0.0, 0.0)], [0, 0, 0])]);
        let svg = doc.to_svg();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"viewBox="0 0 4 2" width="4" height="2""#));
        assert!(svg.contains(r##"fill="#000000""##));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn high_levels_strip_declaration_and_whitespace() {
        let doc = VectorDocument::new(1, 1, vec![shape(&[(0.0, 0.0)], [0, 0, 0])]);
        for level in [OptimizationLevel::Maximum, OptimizationLevel::High] {
            let svg = doc.render(level);
            assert!(svg.starts_with("<svg"));
            assert!(!svg.contains('\n'));
            assert!(!svg.contains("> <"));
        }
    }

    #[test]
    fn low_levels_keep_declaration_but_strip_line_breaks() {
        let doc = VectorDocument::new(1, 1, Vec::new());
        for level in [OptimizationLevel::Medium, OptimizationLevel::Low] {
            let svg = doc.render(level);
            assert!(svg.starts_with("<?xml"));
            assert!(!svg.contains('\n'));
            assert!(!svg.contains('\t'));
        }
    }

    #[test]
    fn optimize_collapses_space_runs() {
        let svg = "<svg>\n\t<g   a=\"1\">  </g>\n</svg>";
        assert_eq!(optimize_svg(svg, OptimizationLevel::Low), "<svg><g a=\"1\"></g></svg>");
    }
}
