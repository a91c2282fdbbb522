use std::fmt::Write as _;
use std::sync::Arc;

use resvg::tiny_skia;

use crate::annotate::items::PlantItem;
use crate::foundation::color::Color;
use crate::foundation::error::{YardError, YardResult};
use crate::foundation::raster::{parse_svg, pixmap_from_rgb, render_over};

/// Marker fill opacity, out of 255.
pub const MARKER_ALPHA: u8 = 235;

/// Allowed range for [`MarkerStyle::scale`].
pub const SCALE_RANGE: std::ops::RangeInclusive<u8> = 2..=6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerStyle {
    /// Relative marker size, see [`marker_radius`].
    pub scale: u8,
    pub fill: Color,
    pub text: Color,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            scale: 3,
            fill: Color::from_rgb_u32(0x4AC96E),
            text: Color::from_rgb_u32(0xFFFFFF),
        }
    }
}

/// Marker radius in pixels for a `w`×`h` image.
pub fn marker_radius(w: u32, h: u32, scale: u8) -> u32 {
    let factor = 0.02 + (f64::from(scale) - 3.0) * 0.005;
    (f64::from(w.min(h)) * factor) as u32
}

fn marker_svg(w: u32, h: u32, items: &[PlantItem], style: &MarkerStyle) -> String {
    let r = marker_radius(w, h, style.scale).max(1);
    let font_px = f64::from(r) * 1.1;
    let fill_opacity = f64::from(MARKER_ALPHA) / 255.0;

    let mut s = String::new();
    let _ = writeln!(
        s,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    for it in items {
        let x = (it.cx * f64::from(w)) as u32;
        let y = (it.cy * f64::from(h)) as u32;
        let _ = writeln!(
            s,
            r#"<circle cx="{x}" cy="{y}" r="{r}" fill="{}" fill-opacity="{fill_opacity:.4}"/>"#,
            style.fill.to_hex_rgb()
        );
        // 0.35em drops the baseline so the digits sit on the circle centre.
        let _ = writeln!(
            s,
            r#"<text x="{x}" y="{:.2}" font-family="'DejaVu Sans', sans-serif" font-weight="bold" font-size="{font_px:.2}" text-anchor="middle" fill="{}">{}</text>"#,
            f64::from(y) + font_px * 0.35 - f64::from(r) * 0.03,
            style.text.to_hex_rgb(),
            it.id
        );
    }
    s.push_str("</svg>\n");
    s
}

/// Draw a numbered marker for every item on a copy of `img`.
pub fn draw_markers(
    img: &image::RgbImage,
    items: &[PlantItem],
    style: &MarkerStyle,
    fontdb: Arc<usvg::fontdb::Database>,
) -> YardResult<tiny_skia::Pixmap> {
    if !SCALE_RANGE.contains(&style.scale) {
        return Err(YardError::validation(format!(
            "marker scale must be in {}..={}, got {}",
            SCALE_RANGE.start(),
            SCALE_RANGE.end(),
            style.scale
        )));
    }

    let (w, h) = img.dimensions();
    let mut pixmap = pixmap_from_rgb(img)?;
    let tree = parse_svg(&marker_svg(w, h, items, style), fontdb)?;
    render_over(&tree, &mut pixmap);
    Ok(pixmap)
}
