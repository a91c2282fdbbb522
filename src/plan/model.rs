//! Typed garden-plan configuration, produced after repair.

use serde::{Deserialize, Deserializer};

use crate::foundation::color::Color;
use crate::plan::presets::{DEFAULT_PATH_PRESET, DEFAULT_PRESET, Style};

/// Canvas margin used when a config gives a canvas without one.
pub const DEFAULT_MARGIN: f64 = 40.0;
/// Canvas background used when a config gives a canvas without one.
pub const DEFAULT_BG: Color = Color::from_rgb_u32(0xFDFBF8);

/// A point in normalized `[0, 1]` plan coordinates, written as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "[f64; 2]")]
pub struct NormPoint {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position (0 = top).
    pub y: f64,
}

impl From<[f64; 2]> for NormPoint {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// A rectangle in normalized plan coordinates, written as `[x, y, w, h]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "[f64; 4]")]
pub struct NormRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl From<[f64; 4]> for NormRect {
    fn from([x, y, w, h]: [f64; 4]) -> Self {
        Self { x, y, w, h }
    }
}

/// Canvas size in base pixels (100 per inch) plus margin and background.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CanvasSpec {
    /// Width in base pixels.
    pub width: f64,
    /// Height in base pixels.
    pub height: f64,
    /// Margin around the drawable frame.
    #[serde(default = "default_margin")]
    pub margin: f64,
    /// Background colour.
    #[serde(default = "default_bg")]
    pub bg_color: Color,
}

fn default_margin() -> f64 {
    DEFAULT_MARGIN
}

fn default_bg() -> Color {
    DEFAULT_BG
}

/// The house footprint.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct HouseSpec {
    /// Footprint rectangle.
    pub rect: NormRect,
}

/// A zone's geometry. A zone has exactly one.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneShape {
    /// Axis-aligned rectangle.
    Rect(NormRect),
    /// Closed polygon.
    Polygon(Vec<NormPoint>),
}

/// A planted or paved area.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ZoneDef")]
pub struct Zone {
    /// Identifier used in messages.
    pub id: Option<String>,
    /// Geometry.
    pub shape: ZoneShape,
    /// Preset name (already checked during repair).
    pub style_preset: String,
    /// Per-zone attribute overrides.
    pub style_override: Style,
    /// Chinese label.
    pub name_cn: String,
    /// English label.
    pub name_en: String,
}

#[derive(Deserialize)]
struct ZoneDef {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    rect: Option<NormRect>,
    #[serde(default)]
    polygon: Option<Vec<NormPoint>>,
    #[serde(default = "default_preset")]
    style_preset: String,
    #[serde(default)]
    style_override: Style,
    #[serde(default, deserialize_with = "label_text")]
    name_cn: String,
    #[serde(default, deserialize_with = "label_text")]
    name_en: String,
}

fn default_preset() -> String {
    DEFAULT_PRESET.to_owned()
}

impl TryFrom<ZoneDef> for Zone {
    type Error = String;

    fn try_from(def: ZoneDef) -> Result<Self, Self::Error> {
        let id = def.id.map(|v| id_string(&v));
        let shape = match (def.rect, def.polygon) {
            (Some(r), None) => ZoneShape::Rect(r),
            (None, Some(p)) => ZoneShape::Polygon(p),
            (Some(_), Some(_)) => {
                return Err(format!(
                    "zone '{}' has both 'rect' and 'polygon'",
                    id.as_deref().unwrap_or("?")
                ));
            }
            (None, None) => {
                return Err(format!(
                    "zone '{}' has no shape",
                    id.as_deref().unwrap_or("?")
                ));
            }
        };
        Ok(Self {
            id,
            shape,
            style_preset: def.style_preset,
            style_override: def.style_override,
            name_cn: def.name_cn,
            name_en: def.name_en,
        })
    }
}

/// Render an `id` field (string or number) for messages.
pub(crate) fn id_string(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Label text from any scalar, so `name_en: 2024` reads as "2024". `null` is empty.
fn label_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = serde_json::Value::deserialize(deserializer)?;
    Ok(match v {
        serde_json::Value::Null => String::new(),
        other => id_string(&other),
    })
}

/// A walkway drawn as a polyline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PathSpec {
    /// Polyline vertices; paths with fewer than two are not drawn.
    #[serde(default)]
    pub points: Vec<NormPoint>,
    /// Preset name.
    #[serde(default = "default_path_preset")]
    pub style_preset: String,
}

fn default_path_preset() -> String {
    DEFAULT_PATH_PRESET.to_owned()
}

/// Point feature kinds that have a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Drawn as a circle.
    Tree,
    /// Drawn as a square.
    Lantern,
}

impl FeatureKind {
    /// Parse the `type` field.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tree" => Some(Self::Tree),
            "lantern" => Some(Self::Lantern),
            _ => None,
        }
    }
}

/// A point feature (tree, lantern). Incomplete features are skipped when drawing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Feature {
    /// `tree` or `lantern`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Centre.
    #[serde(default)]
    pub position: Option<NormPoint>,
    /// Diameter / side length as a fraction of the inner width.
    #[serde(default)]
    pub size: Option<f64>,
    /// Preset name.
    #[serde(default = "default_preset")]
    pub style_preset: String,
    /// Caption.
    #[serde(default, deserialize_with = "label_text")]
    pub name_en: String,
}

impl Feature {
    /// Kind, position and size when all are present and the kind is drawable.
    pub fn drawable(&self) -> Option<(FeatureKind, NormPoint, f64)> {
        let kind = FeatureKind::parse(self.kind.as_deref()?)?;
        Some((kind, self.position?, self.size?))
    }
}

/// A repaired garden-plan scene.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlanConfig {
    /// Heading drawn above the frame.
    #[serde(deserialize_with = "label_text")]
    pub title: String,
    /// Canvas.
    pub canvas: CanvasSpec,
    /// House footprint.
    pub house: HouseSpec,
    /// Zones in draw order.
    pub zones: Vec<Zone>,
    /// Paths in draw order.
    #[serde(default)]
    pub paths: Vec<PathSpec>,
    /// Features in draw order.
    #[serde(default)]
    pub features: Vec<Feature>,
}
