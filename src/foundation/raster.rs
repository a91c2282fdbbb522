use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use resvg::tiny_skia;

use crate::foundation::error::{YardError, YardResult};
use crate::foundation::fs::ensure_parent_dir;

/// Largest raster side we are willing to allocate.
pub const MAX_DIM: u32 = 16_384;

/// Font database for SVG text: system fonts plus any `fonts/` directories given.
pub fn build_fontdb(extra_dirs: &[&Path]) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    for dir in extra_dirs {
        if dir.is_dir() {
            db.load_fonts_dir(dir);
        }
    }
    tracing::debug!(faces = db.len(), "font database ready");
    Arc::new(db)
}

/// Every family name known to `db`.
pub fn font_families(db: &usvg::fontdb::Database) -> BTreeSet<String> {
    db.faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
        .collect()
}

/// Parse an SVG document using `fontdb` for text.
pub fn parse_svg(svg: &str, fontdb: Arc<usvg::fontdb::Database>) -> YardResult<usvg::Tree> {
    let opts = usvg::Options {
        fontdb,
        ..Default::default()
    };
    usvg::Tree::from_str(svg, &opts)
        .map_err(|e| YardError::image(format!("failed to parse generated svg: {e}")))
}

/// Pixel size of `tree` rendered at `scale`, bounded by [`MAX_DIM`].
pub fn raster_size(tree: &usvg::Tree, scale: f32) -> YardResult<(u32, u32)> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(YardError::validation("raster scale must be finite and > 0"));
    }
    let size = tree.size();
    let w = (size.width() * scale).ceil().max(1.0) as u32;
    let h = (size.height() * scale).ceil().max(1.0) as u32;
    if w > MAX_DIM || h > MAX_DIM {
        return Err(YardError::image(format!(
            "raster size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    Ok((w, h))
}

/// Rasterize `tree` into a fresh pixmap at `scale`.
pub fn rasterize(tree: &usvg::Tree, scale: f32) -> YardResult<tiny_skia::Pixmap> {
    let (w, h) = raster_size(tree, scale)?;
    let mut pixmap = tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| YardError::image("failed to allocate pixmap"))?;
    resvg::render(
        tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

/// Wrap an opaque RGB image as a pixmap so SVG overlays can be drawn on it.
pub fn pixmap_from_rgb(img: &image::RgbImage) -> YardResult<tiny_skia::Pixmap> {
    let (w, h) = img.dimensions();
    let size = tiny_skia::IntSize::from_wh(w, h)
        .ok_or_else(|| YardError::image(format!("invalid image size {w}x{h}")))?;
    let mut data = Vec::with_capacity((w as usize) * (h as usize) * 4);
    for px in img.pixels() {
        data.extend_from_slice(&[px[0], px[1], px[2], 255]);
    }
    tiny_skia::Pixmap::from_vec(data, size)
        .ok_or_else(|| YardError::image("failed to wrap image as pixmap"))
}

/// Draw `tree` on top of `pixmap` without scaling.
pub fn render_over(tree: &usvg::Tree, pixmap: &mut tiny_skia::Pixmap) {
    resvg::render(tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
}

/// Straight-alpha RGBA8 bytes of a premultiplied pixmap.
pub fn to_straight_rgba8(pixmap: &tiny_skia::Pixmap) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}

/// Write `pixmap` as a PNG, creating parent directories.
pub fn save_png(pixmap: &tiny_skia::Pixmap, out: &Path) -> YardResult<()> {
    ensure_parent_dir(out)?;
    let data = to_straight_rgba8(pixmap);
    image::save_buffer_with_format(
        out,
        &data,
        pixmap.width(),
        pixmap.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}

/// Escape text for use in SVG character data and attribute values.
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_db() -> Arc<usvg::fontdb::Database> {
        Arc::new(usvg::fontdb::Database::new())
    }

    #[test]
    fn rasterizes_scaled_rect() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="8">
            <rect x="0" y="0" width="10" height="8" fill="#ff0000"/></svg>"##;
        let tree = parse_svg(svg, empty_db()).unwrap();
        let pixmap = rasterize(&tree, 2.0).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (20, 16));
        let rgba = to_straight_rgba8(&pixmap);
        assert_eq!(&rgba[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn rejects_oversized_raster() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10000" height="10"/>"#;
        let tree = parse_svg(svg, empty_db()).unwrap();
        assert!(raster_size(&tree, 2.0).is_err());
        assert!(raster_size(&tree, 0.0).is_err());
    }

    #[test]
    fn overlay_keeps_background() {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([10, 20, 30]));
        let mut pixmap = pixmap_from_rgb(&img).unwrap();
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4">
            <rect x="0" y="0" width="2" height="4" fill="#ffffff"/></svg>"##;
        let tree = parse_svg(svg, empty_db()).unwrap();
        render_over(&tree, &mut pixmap);
        let rgba = to_straight_rgba8(&pixmap);
        assert_eq!(&rgba[0..4], &[255, 255, 255, 255]);
        assert_eq!(&rgba[12..16], &[10, 20, 30, 255]);
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(xml_escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }
}
