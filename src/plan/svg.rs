//! Translate a repaired [`PlanConfig`] into an SVG document.
//!
//! Shapes are emitted first, then paths, then all text, so labels always sit on top.

use kurbo::{Point, Rect};

use crate::foundation::color::Color;
use crate::foundation::raster::xml_escape;
use crate::plan::fonts::{FontChoice, house_label, zone_label};
use crate::plan::geometry::{PX_PER_PT, PlanFrame, vertex_centroid};
use crate::plan::model::{FeatureKind, PlanConfig, ZoneShape};
use crate::plan::presets::{
    DEFAULT_PATH_PRESET, DEFAULT_PRESET, Hatch, HatchKind, LABEL_STYLE, LineStyle, Style, preset,
    preset_or,
};

const FRAME_COLOR: Color = Color::from_rgb_u32(0x8D8D8D);
const TITLE_COLOR: Color = Color::from_rgb_u32(0x2E2E2E);
const CAPTION_COLOR: Color = Color::from_rgb_u32(0x555555);
const HOUSE_TEXT: Color = Color::from_rgb_u32(0xFFFFFF);

const FRAME_WIDTH_PT: f64 = 1.5;
const TITLE_PT: f64 = 20.0;
const HOUSE_LABEL_PT: f64 = 12.0;
const CAPTION_PT: f64 = 8.0;
const DEFAULT_LINEWIDTH_PT: f64 = 1.0;
const LINE_SPACING: f64 = 1.4;
const LABEL_PAD_EM: f64 = 0.4;

/// Build the SVG for `cfg` using `fonts` for labels.
pub fn build_svg(cfg: &PlanConfig, fonts: &FontChoice) -> String {
    let mut scene = Scene::new(cfg, fonts);
    scene.draw_all();
    scene.finish()
}

enum Geom {
    Rect { rect: Rect, rx: f64 },
    Path(String),
    Circle { center: Point, r: f64 },
}

#[derive(Clone, Copy)]
enum Weight {
    Normal,
    Bold,
}

struct Scene<'a> {
    cfg: &'a PlanConfig,
    frame: PlanFrame,
    fonts: &'a FontChoice,
    patterns: Vec<(Hatch, [u8; 4])>,
    defs: String,
    shapes: String,
    texts: String,
}

impl<'a> Scene<'a> {
    fn new(cfg: &'a PlanConfig, fonts: &'a FontChoice) -> Self {
        Self {
            cfg,
            frame: PlanFrame::new(&cfg.canvas),
            fonts,
            patterns: Vec::new(),
            defs: String::new(),
            shapes: String::new(),
            texts: String::new(),
        }
    }

    fn draw_all(&mut self) {
        self.draw_frame_and_title();
        self.draw_house();
        self.draw_zones();
        self.draw_paths();
        self.draw_features();
    }

    fn finish(self) -> String {
        let size = self.frame.canvas();
        let bg = self.cfg.canvas.bg_color;
        let mut out = String::new();
        out.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{ff}">"#,
            w = num(size.width),
            h = num(size.height),
            ff = xml_escape(&self.fonts.font_family()),
        ));
        out.push('\n');
        if !self.defs.is_empty() {
            out.push_str("<defs>\n");
            out.push_str(&self.defs);
            out.push_str("</defs>\n");
        }
        out.push_str(&format!(
            r#"<rect x="0" y="0" width="{}" height="{}" {}/>"#,
            num(size.width),
            num(size.height),
            fill_attrs(Some(bg), 1.0),
        ));
        out.push('\n');
        out.push_str(&self.shapes);
        out.push_str(&self.texts);
        out.push_str("</svg>\n");
        out
    }

    fn draw_frame_and_title(&mut self) {
        let inner = self.frame.inner();
        self.push_geom(
            &Geom::Rect {
                rect: inner,
                rx: 0.0,
            },
            &format!(
                r#"fill="none" {}"#,
                stroke_attrs(Some(FRAME_COLOR), FRAME_WIDTH_PT, LineStyle::Solid, 1.0)
            ),
        );

        let size = self.frame.canvas();
        let title = self.cfg.title.clone();
        self.push_text(
            Point::new(size.width / 2.0, self.frame.margin() / 2.0),
            &[title],
            TITLE_PT,
            TITLE_COLOR,
            Weight::Bold,
        );
    }

    fn draw_house(&mut self) {
        let style = preset_or("house", DEFAULT_PRESET);
        let rect = self.frame.to_px_rect(self.cfg.house.rect);
        self.draw_styled(&Geom::Rect { rect, rx: 0.0 }, &style);
        self.push_text(
            rect.center(),
            &[house_label(self.fonts.mode).to_owned()],
            HOUSE_LABEL_PT,
            HOUSE_TEXT,
            Weight::Bold,
        );
    }

    fn draw_zones(&mut self) {
        let cfg = self.cfg;
        for zone in &cfg.zones {
            let style = preset_or(&zone.style_preset, DEFAULT_PRESET).merged(&zone.style_override);

            let (geom, anchor) = match &zone.shape {
                ZoneShape::Rect(r) => {
                    let rect = self.frame.to_px_rect(*r);
                    let radius = style.border_radius.unwrap_or(0.0);
                    let rx = if radius > 0.0 {
                        (radius * self.frame.inner().width())
                            .min(rect.width().abs() / 2.0)
                            .min(rect.height().abs() / 2.0)
                    } else {
                        0.0
                    };
                    (Geom::Rect { rect, rx }, Some(rect.center()))
                }
                ZoneShape::Polygon(pts) => {
                    let px: Vec<Point> = pts.iter().map(|p| self.frame.to_px(*p)).collect();
                    let d = self.frame.polygon(pts).to_svg();
                    (Geom::Path(d), vertex_centroid(&px))
                }
            };
            self.draw_styled(&geom, &style);

            if let Some(anchor) = anchor {
                let lines = zone_label(self.fonts.mode, &zone.name_cn, &zone.name_en);
                self.push_label_box(anchor, &lines);
            }
        }
    }

    fn draw_paths(&mut self) {
        let cfg = self.cfg;
        for path in &cfg.paths {
            if path.points.len() < 2 {
                continue;
            }
            let style = preset(&path.style_preset)
                .unwrap_or_else(|| preset_or(DEFAULT_PATH_PRESET, DEFAULT_PRESET));
            let pts: Vec<String> = path
                .points
                .iter()
                .map(|p| {
                    let q = self.frame.to_px(*p);
                    format!("{},{}", num(q.x), num(q.y))
                })
                .collect();
            let color = style.color.or(style.edgecolor);
            self.shapes.push_str(&format!(
                r#"<polyline points="{}" fill="none" {}/>"#,
                pts.join(" "),
                stroke_attrs(
                    color,
                    style.linewidth.unwrap_or(DEFAULT_LINEWIDTH_PT),
                    style.linestyle.unwrap_or_default(),
                    style.alpha.unwrap_or(1.0),
                ),
            ));
            self.shapes.push('\n');
        }
    }

    fn draw_features(&mut self) {
        let cfg = self.cfg;
        for feature in &cfg.features {
            let Some((kind, position, size)) = feature.drawable() else {
                continue;
            };
            let style = preset_or(&feature.style_preset, DEFAULT_PRESET);
            let center = self.frame.to_px(position);
            let fw = self.frame.size_px(size, size).width;
            let geom = match kind {
                FeatureKind::Tree => Geom::Circle {
                    center,
                    r: fw / 2.0,
                },
                FeatureKind::Lantern => Geom::Rect {
                    rect: Rect::from_center_size(center, (fw, fw)),
                    rx: 0.0,
                },
            };
            self.draw_styled(&geom, &style);
            if !feature.name_en.is_empty() {
                self.push_text(
                    Point::new(center.x, center.y + fw),
                    &[feature.name_en.clone()],
                    CAPTION_PT,
                    CAPTION_COLOR,
                    Weight::Normal,
                );
            }
        }
    }

    /// Fill, optional hatch overlay, then outline.
    fn draw_styled(&mut self, geom: &Geom, style: &Style) {
        let alpha = style.alpha.unwrap_or(1.0);
        let width = style.linewidth.unwrap_or(DEFAULT_LINEWIDTH_PT);
        let line = style.linestyle.unwrap_or_default();

        self.push_geom(geom, &format!(r#"{} stroke="none""#, fill_attrs(style.facecolor, alpha)));

        let mut edge = style.edgecolor;
        if let Some(hatch) = style.hatch {
            let color = style.hatch_color.or(style.edgecolor).unwrap_or(FRAME_COLOR);
            let id = self.hatch_pattern(hatch, color);
            self.push_geom(
                geom,
                &format!(
                    r#"fill="url(#{id})" fill-opacity="{}" stroke="none""#,
                    num(alpha.clamp(0.0, 1.0))
                ),
            );
            edge = Some(color);
        }

        self.push_geom(
            geom,
            &format!(r#"fill="none" {}"#, stroke_attrs(edge, width, line, alpha)),
        );
    }

    fn push_geom(&mut self, geom: &Geom, attrs: &str) {
        let el = match geom {
            Geom::Rect { rect, rx } => format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" {attrs}/>"#,
                num(rect.x0.min(rect.x1)),
                num(rect.y0.min(rect.y1)),
                num(rect.width().abs()),
                num(rect.height().abs()),
                num(*rx),
            ),
            Geom::Path(d) => format!(r#"<path d="{d}" {attrs}/>"#),
            Geom::Circle { center, r } => format!(
                r#"<circle cx="{}" cy="{}" r="{}" {attrs}/>"#,
                num(center.x),
                num(center.y),
                num(*r),
            ),
        };
        self.shapes.push_str(&el);
        self.shapes.push('\n');
    }

    fn hatch_pattern(&mut self, hatch: Hatch, color: Color) -> String {
        let key = (hatch, color.to_rgba8());
        if let Some(i) = self.patterns.iter().position(|p| *p == key) {
            return format!("hatch-{i}");
        }
        let id = format!("hatch-{}", self.patterns.len());
        self.patterns.push(key);

        let s = hatch.spacing_px();
        let h = s / 2.0;
        let q = s / 4.0;
        let body = match hatch.kind {
            HatchKind::Dots => format!(
                r#"<circle cx="{}" cy="{}" r="{}" {}/>"#,
                num(h),
                num(h),
                num((s * 0.12).max(0.8)),
                fill_attrs(Some(color), 1.0)
            ),
            kind => {
                let d = match kind {
                    HatchKind::Forward => format!(
                        "M0,{s} L{s},0 M{a},{q} L{q},{a} M{b},{c} L{c},{b}",
                        s = num(s),
                        q = num(q),
                        a = num(-q),
                        b = num(s - q),
                        c = num(s + q)
                    ),
                    HatchKind::Backward => format!(
                        "M0,0 L{s},{s} M{a},{b} L{q},{c} M{b},{a} L{c},{q}",
                        s = num(s),
                        q = num(q),
                        a = num(-q),
                        b = num(s - q),
                        c = num(s + q)
                    ),
                    HatchKind::Cross => format!(
                        "M0,0 L{s},{s} M0,{s} L{s},0",
                        s = num(s)
                    ),
                    HatchKind::Grid => format!(
                        "M0,{h} L{s},{h} M{h},0 L{h},{s}",
                        s = num(s),
                        h = num(h)
                    ),
                    HatchKind::Horizontal => format!("M0,{h} L{s},{h}", s = num(s), h = num(h)),
                    HatchKind::Vertical | HatchKind::Dots => {
                        format!("M{h},0 L{h},{s}", s = num(s), h = num(h))
                    }
                };
                format!(
                    r#"<path d="{d}" fill="none" {}/>"#,
                    stroke_attrs(Some(color), 0.75, LineStyle::Solid, 1.0)
                )
            }
        };
        self.defs.push_str(&format!(
            r#"<pattern id="{id}" patternUnits="userSpaceOnUse" width="{w}" height="{w}">{body}</pattern>"#,
            w = num(s)
        ));
        self.defs.push('\n');
        id
    }

    fn push_text(&mut self, center: Point, lines: &[String], size_pt: f64, color: Color, weight: Weight) {
        if lines.iter().all(|l| l.is_empty()) {
            return;
        }
        let font_px = size_pt * PX_PER_PT;
        let line_h = font_px * LINE_SPACING;
        let top = center.y - line_h * lines.len() as f64 / 2.0;

        let weight_attr = match weight {
            Weight::Normal => "",
            Weight::Bold => r#" font-weight="bold""#,
        };
        let mut el = format!(
            r#"<text text-anchor="middle" font-size="{}"{weight_attr} {}>"#,
            num(font_px),
            fill_attrs(Some(color), 1.0)
        );
        for (i, line) in lines.iter().enumerate() {
            // Baseline sits roughly 0.35em below the line's vertical centre.
            let baseline = top + line_h * (i as f64 + 0.5) + font_px * 0.35;
            el.push_str(&format!(
                r#"<tspan x="{}" y="{}">{}</tspan>"#,
                num(center.x),
                num(baseline),
                xml_escape(line)
            ));
        }
        el.push_str("</text>\n");
        self.texts.push_str(&el);
    }

    fn push_label_box(&mut self, center: Point, lines: &[String]) {
        if lines.iter().all(|l| l.is_empty()) {
            return;
        }
        let font_px = LABEL_STYLE.font_size_pt * PX_PER_PT;
        let pad = LABEL_PAD_EM * font_px;
        let text_w = lines
            .iter()
            .map(|l| estimate_text_width(l, font_px))
            .fold(0.0, f64::max);
        let text_h = font_px * LINE_SPACING * lines.len() as f64;
        let rect = Rect::from_center_size(center, (text_w + 2.0 * pad, text_h + 2.0 * pad));

        self.texts.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" {} {}/>"#,
            num(rect.x0),
            num(rect.y0),
            num(rect.width()),
            num(rect.height()),
            num(pad),
            fill_attrs(Some(LABEL_STYLE.box_bg), 1.0),
            stroke_attrs(Some(LABEL_STYLE.box_edge), 1.0, LineStyle::Solid, 1.0),
        ));
        self.texts.push('\n');
        self.push_text(
            center,
            lines,
            LABEL_STYLE.font_size_pt,
            LABEL_STYLE.font_color,
            Weight::Normal,
        );
    }
}

/// Rough advance width: full-width for CJK, ~0.6em otherwise.
pub(crate) fn estimate_text_width(text: &str, font_px: f64) -> f64 {
    text.chars()
        .map(|c| if is_wide(c) { font_px } else { font_px * 0.6 })
        .sum()
}

fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F | 0x2E80..=0xA4CF | 0xAC00..=0xD7A3 | 0xF900..=0xFAFF | 0xFE30..=0xFE4F |
        0xFF00..=0xFF60 | 0xFFE0..=0xFFE6 | 0x20000..=0x3FFFD)
}

fn num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_owned() } else { s.to_owned() }
}

fn fill_attrs(color: Option<Color>, alpha: f64) -> String {
    match color {
        Some(c) if c.alpha() > 0.0 => format!(
            r#"fill="{}" fill-opacity="{}""#,
            c.to_hex_rgb(),
            num((c.alpha() * alpha).clamp(0.0, 1.0))
        ),
        _ => r#"fill="none""#.to_owned(),
    }
}

fn stroke_attrs(color: Option<Color>, width_pt: f64, line: LineStyle, alpha: f64) -> String {
    let Some(c) = color.filter(|c| c.alpha() > 0.0 && width_pt > 0.0) else {
        return r#"stroke="none""#.to_owned();
    };
    let width_px = width_pt * PX_PER_PT;
    let mut s = format!(
        r#"stroke="{}" stroke-opacity="{}" stroke-width="{}""#,
        c.to_hex_rgb(),
        num((c.alpha() * alpha).clamp(0.0, 1.0)),
        num(width_px)
    );
    if let Some(dash) = line.dash_array(width_px) {
        s.push_str(&format!(r#" stroke-dasharray="{dash}""#));
    }
    s
}

#[cfg(test)]
#[path = "../../tests/unit/plan/svg.rs"]
mod tests;
