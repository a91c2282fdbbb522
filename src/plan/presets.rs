//! Static style presets for garden-plan shapes.

use serde::Deserialize;

use crate::foundation::color::Color;

/// Stroke pattern, written with the usual short names (`-`, `--`, `:`, `-.`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    /// Continuous line.
    #[default]
    Solid,
    /// Long dashes.
    Dashed,
    /// Dots.
    Dotted,
    /// Dash, dot, dash.
    DashDot,
}

impl LineStyle {
    /// SVG `stroke-dasharray` for a stroke of `width_px`, or `None` for solid lines.
    ///
    /// Segment lengths scale with the line width.
    pub fn dash_array(self, width_px: f64) -> Option<String> {
        let pattern: &[f64] = match self {
            Self::Solid => return None,
            Self::Dashed => &[3.7, 1.6],
            Self::Dotted => &[1.0, 1.65],
            Self::DashDot => &[6.4, 1.6, 1.0, 1.6],
        };
        let w = width_px.max(1.0);
        let parts: Vec<String> = pattern.iter().map(|p| format!("{:.2}", p * w)).collect();
        Some(parts.join(","))
    }
}

impl<'de> Deserialize<'de> for LineStyle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.trim() {
            "-" | "solid" => Ok(Self::Solid),
            "--" | "dashed" => Ok(Self::Dashed),
            ":" | "dotted" => Ok(Self::Dotted),
            "-." | "dashdot" => Ok(Self::DashDot),
            other => Err(serde::de::Error::custom(format!(
                "unknown linestyle \"{other}\" (expected -, --, : or -.)"
            ))),
        }
    }
}

/// Hatch motif drawn over a shape's fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HatchKind {
    /// `.` or `o`
    Dots,
    /// `/`
    Forward,
    /// `\`
    Backward,
    /// `x`
    Cross,
    /// `+`
    Grid,
    /// `-`
    Horizontal,
    /// `|`
    Vertical,
}

/// Hatch motif plus density (how many times the motif character was repeated).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hatch {
    /// Motif.
    pub kind: HatchKind,
    /// Repetition count, at least 1.
    pub density: u8,
}

impl Hatch {
    /// Tile size in pixels; denser hatches use smaller tiles.
    pub fn spacing_px(self) -> f64 {
        (18.0 / f64::from(self.density.max(1))).max(3.0)
    }
}

impl<'de> Deserialize<'de> for Hatch {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let s = s.trim();
        let mut chars = s.chars();
        let Some(first) = chars.next() else {
            return Err(serde::de::Error::custom("hatch pattern must not be empty"));
        };
        let kind = match first {
            '.' | 'o' | 'O' => HatchKind::Dots,
            '/' => HatchKind::Forward,
            '\\' => HatchKind::Backward,
            'x' | 'X' => HatchKind::Cross,
            '+' => HatchKind::Grid,
            '-' => HatchKind::Horizontal,
            '|' => HatchKind::Vertical,
            other => {
                return Err(serde::de::Error::custom(format!(
                    "unknown hatch character '{other}'"
                )));
            }
        };
        let density = s.chars().filter(|c| *c == first).count().min(8) as u8;
        Ok(Self { kind, density })
    }
}

/// Drawing attributes. Every field is optional so presets and overrides share one type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Fill colour.
    pub facecolor: Option<Color>,
    /// Outline colour.
    pub edgecolor: Option<Color>,
    /// Line colour for paths.
    pub color: Option<Color>,
    /// Stroke width in points.
    pub linewidth: Option<f64>,
    /// Stroke pattern.
    pub linestyle: Option<LineStyle>,
    /// Opacity applied to fill and stroke.
    pub alpha: Option<f64>,
    /// Hatch overlay.
    pub hatch: Option<Hatch>,
    /// Hatch colour; also replaces the outline colour when hatching.
    pub hatch_color: Option<Color>,
    /// Corner radius as a fraction of the plan's inner width.
    pub border_radius: Option<f64>,
}

impl Style {
    /// `self` with every field set in `over` replaced.
    pub fn merged(self, over: &Style) -> Style {
        Style {
            facecolor: over.facecolor.or(self.facecolor),
            edgecolor: over.edgecolor.or(self.edgecolor),
            color: over.color.or(self.color),
            linewidth: over.linewidth.or(self.linewidth),
            linestyle: over.linestyle.or(self.linestyle),
            alpha: over.alpha.or(self.alpha),
            hatch: over.hatch.or(self.hatch),
            hatch_color: over.hatch_color.or(self.hatch_color),
            border_radius: over.border_radius.or(self.border_radius),
        }
    }

    const EMPTY: Style = Style {
        facecolor: None,
        edgecolor: None,
        color: None,
        linewidth: None,
        linestyle: None,
        alpha: None,
        hatch: None,
        hatch_color: None,
        border_radius: None,
    };
}

/// Preset used when a zone or feature names an unknown preset.
pub const DEFAULT_PRESET: &str = "default";
/// Preset used for paths without a valid preset.
pub const DEFAULT_PATH_PRESET: &str = "path_stone";

const fn rgb(v: u32) -> Option<Color> {
    Some(Color::from_rgb_u32(v))
}

const fn hatch(kind: HatchKind, density: u8) -> Option<Hatch> {
    Some(Hatch { kind, density })
}

static PRESETS: [(&str, Style); 9] = [
    (
        "default",
        Style {
            facecolor: rgb(0xEAEAEA),
            edgecolor: rgb(0xBDBDBD),
            linewidth: Some(1.0),
            alpha: Some(0.8),
            ..Style::EMPTY
        },
    ),
    (
        "house",
        Style {
            facecolor: rgb(0xC5B4A5),
            edgecolor: rgb(0x8D8D8D),
            linewidth: Some(0.5),
            ..Style::EMPTY
        },
    ),
    (
        "zen_garden",
        Style {
            facecolor: rgb(0xEAE8E4),
            edgecolor: rgb(0xA0A0A0),
            linewidth: Some(1.5),
            hatch: hatch(HatchKind::Dots, 3),
            hatch_color: rgb(0xBDBDBD),
            ..Style::EMPTY
        },
    ),
    (
        "lawn",
        Style {
            facecolor: rgb(0xC4D6A4),
            edgecolor: rgb(0x7E9C6B),
            linewidth: Some(2.0),
            linestyle: Some(LineStyle::Dashed),
            hatch: hatch(HatchKind::Dots, 3),
            hatch_color: rgb(0xAEC08D),
            border_radius: Some(0.05),
            ..Style::EMPTY
        },
    ),
    (
        "deck",
        Style {
            facecolor: rgb(0xD3BFA8),
            edgecolor: rgb(0x8D7A68),
            linewidth: Some(1.5),
            hatch: hatch(HatchKind::Forward, 3),
            hatch_color: rgb(0xAF9E8E),
            border_radius: Some(0.03),
            ..Style::EMPTY
        },
    ),
    (
        "water_feature",
        Style {
            facecolor: rgb(0xB8D4E3),
            edgecolor: rgb(0x7BA2B8),
            linewidth: Some(1.5),
            alpha: Some(0.7),
            ..Style::EMPTY
        },
    ),
    (
        "path_stone",
        Style {
            color: rgb(0x795548),
            linestyle: Some(LineStyle::Dotted),
            linewidth: Some(3.5),
            ..Style::EMPTY
        },
    ),
    (
        "feature_tree",
        Style {
            facecolor: rgb(0x9CB89C),
            edgecolor: rgb(0x6B8E6B),
            alpha: Some(0.85),
            ..Style::EMPTY
        },
    ),
    (
        "feature_lantern",
        Style {
            facecolor: rgb(0x606060),
            edgecolor: rgb(0x303030),
            ..Style::EMPTY
        },
    ),
];

/// Look up a preset by name.
pub fn preset(name: &str) -> Option<Style> {
    PRESETS.iter().find(|(n, _)| *n == name).map(|(_, s)| *s)
}

/// Look up a preset, falling back to `fallback` (which must exist).
pub fn preset_or(name: &str, fallback: &str) -> Style {
    preset(name).or_else(|| preset(fallback)).unwrap_or_default()
}

/// All preset names in declaration order.
pub fn preset_names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|(n, _)| *n)
}

/// Text style shared by zone labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    /// Font size in points.
    pub font_size_pt: f64,
    /// Text colour.
    pub font_color: Color,
    /// Label box fill.
    pub box_bg: Color,
    /// Label box outline.
    pub box_edge: Color,
}

/// Zone label style.
pub const LABEL_STYLE: LabelStyle = LabelStyle {
    font_size_pt: 10.0,
    font_color: Color::from_rgb_u32(0x2E2E2E),
    box_bg: Color::rgba(1.0, 1.0, 1.0, 0.85),
    box_edge: Color::rgba(0.74, 0.74, 0.74, 0.9),
};
