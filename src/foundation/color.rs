use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Straight-alpha RGBA colour with channels in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
    /// Alpha.
    pub a: f64,
}

impl Color {
    /// Build from normalized channels.
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit channels.
    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            f64::from(a) / 255.0,
        )
    }

    /// Opaque colour from a `0xRRGGBB` literal.
    pub const fn from_rgb_u32(v: u32) -> Self {
        Self::rgba(
            ((v >> 16) & 0xff) as f64 / 255.0,
            ((v >> 8) & 0xff) as f64 / 255.0,
            (v & 0xff) as f64 / 255.0,
            1.0,
        )
    }

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    /// Quantize to 8-bit channels (straight alpha).
    pub fn to_rgba8(self) -> [u8; 4] {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a)]
    }

    /// `#rrggbb` form, dropping alpha. Pair with [`Color::alpha`] for SVG `*-opacity`.
    pub fn to_hex_rgb(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Alpha clamped to `0..=1`.
    pub fn alpha(self) -> f64 {
        self.a.clamp(0.0, 1.0)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(c) = named(s) {
            return Ok(c);
        }
        parse_hex(s)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Str(String),
            RgbaObj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Str(s) => s.parse().map_err(serde::de::Error::custom),
            Repr::RgbaObj { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::rgba(*r, *g, *b, 1.0)),
                [r, g, b, a] => Ok(Self::rgba(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn named(s: &str) -> Option<Color> {
    let c = match s.to_ascii_lowercase().as_str() {
        "white" => Color::rgba8(255, 255, 255, 255),
        "black" => Color::rgba8(0, 0, 0, 255),
        "red" => Color::rgba8(255, 0, 0, 255),
        "green" => Color::rgba8(0, 128, 0, 255),
        "blue" => Color::rgba8(0, 0, 255, 255),
        "gray" | "grey" => Color::rgba8(128, 128, 128, 255),
        "none" | "transparent" => Color::TRANSPARENT,
        _ => return None,
    };
    Some(c)
}

fn parse_hex(s: &str) -> Result<Color, String> {
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err(format!("invalid colour \"{s}\""));
    }

    let (r, g, b, a) = match s.len() {
        3 => {
            let r = hex_byte(&s[0..1].repeat(2))?;
            let g = hex_byte(&s[1..2].repeat(2))?;
            let b = hex_byte(&s[2..3].repeat(2))?;
            (r, g, b, 255)
        }
        6 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            255,
        ),
        8 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ),
        _ => {
            return Err(
                "colour must be #RGB, #RRGGBB, #RRGGBBAA or a known name (case-insensitive)"
                    .to_owned(),
            );
        }
    };

    Ok(Color::rgba8(r, g, b, a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_hex_forms() {
        let c: Color = "#ff0000".parse().unwrap();
        assert_eq!(c, Color::rgba(1.0, 0.0, 0.0, 1.0));

        let c: Color = "#555".parse().unwrap();
        assert_eq!(c.to_rgba8(), [0x55, 0x55, 0x55, 255]);

        let c: Color = serde_json::from_value(json!("#0000ff80")).unwrap();
        assert!((c.b - 1.0).abs() < 1e-9);
        assert!((c.a - (128.0 / 255.0)).abs() < 1e-9);
    }

    #[test]
    fn parses_tuple_and_object() {
        let c: Color = serde_json::from_value(json!([1.0, 1.0, 1.0, 0.85])).unwrap();
        assert_eq!(c, Color::rgba(1.0, 1.0, 1.0, 0.85));

        let c: Color = serde_json::from_value(json!({"r": 0.25, "g": 0.5, "b": 0.75})).unwrap();
        assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 1.0));
    }

    #[test]
    fn names_and_rejects() {
        assert_eq!("White".parse::<Color>().unwrap().to_hex_rgb(), "#ffffff");
        assert_eq!("none".parse::<Color>().unwrap().alpha(), 0.0);
        assert!("#12345".parse::<Color>().is_err());
        assert!("chartreuse-ish".parse::<Color>().is_err());
        assert!(serde_json::from_value::<Color>(json!([0.1, 0.2])).is_err());
    }
}
