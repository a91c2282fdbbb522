use kurbo::{Affine, BezPath, Point, Rect, Size};

use crate::plan::model::{CanvasSpec, NormPoint, NormRect};

/// Base pixels per typographic point: plans are laid out at 100 px per inch.
pub const PX_PER_PT: f64 = 100.0 / 72.0;

/// Maps normalized plan coordinates into base pixel space.
///
/// Both axes use one affine transform each: `px = margin + n * (extent - 2 * margin)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanFrame {
    canvas: Size,
    margin: f64,
    xform: Affine,
}

impl PlanFrame {
    /// Frame for a validated canvas.
    pub fn new(canvas: &CanvasSpec) -> Self {
        let m = canvas.margin;
        let inner_w = canvas.width - 2.0 * m;
        let inner_h = canvas.height - 2.0 * m;
        Self {
            canvas: Size::new(canvas.width, canvas.height),
            margin: m,
            xform: Affine::new([inner_w, 0.0, 0.0, inner_h, m, m]),
        }
    }

    /// Full canvas size.
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Margin in base pixels.
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// The drawable area inside the margins.
    pub fn inner(&self) -> Rect {
        self.to_px_rect(NormRect {
            x: 0.0,
            y: 0.0,
            w: 1.0,
            h: 1.0,
        })
    }

    /// Normalized position to pixels.
    pub fn to_px(&self, p: NormPoint) -> Point {
        self.xform * Point::new(p.x, p.y)
    }

    /// Normalized extent to pixels (no margin offset).
    pub fn size_px(&self, w: f64, h: f64) -> Size {
        let [sx, _, _, sy, _, _] = self.xform.as_coeffs();
        Size::new(w * sx, h * sy)
    }

    /// Normalized rectangle to a pixel rectangle.
    pub fn to_px_rect(&self, r: NormRect) -> Rect {
        let origin = self.to_px(NormPoint { x: r.x, y: r.y });
        Rect::from_origin_size(origin, self.size_px(r.w, r.h))
    }

    /// Closed pixel-space path through normalized vertices.
    pub fn polygon(&self, pts: &[NormPoint]) -> BezPath {
        let mut path = BezPath::new();
        for (i, p) in pts.iter().enumerate() {
            let q = self.to_px(*p);
            if i == 0 {
                path.move_to(q);
            } else {
                path.line_to(q);
            }
        }
        if !pts.is_empty() {
            path.close_path();
        }
        path
    }
}

/// Mean of the vertices (the label anchor for polygons).
pub fn vertex_centroid(pts: &[Point]) -> Option<Point> {
    if pts.is_empty() {
        return None;
    }
    let n = pts.len() as f64;
    let (sx, sy) = pts
        .iter()
        .fold((0.0, 0.0), |(ax, ay), p| (ax + p.x, ay + p.y));
    Some(Point::new(sx / n, sy / n))
}
