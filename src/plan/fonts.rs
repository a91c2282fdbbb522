use std::collections::BTreeSet;

/// Which names go into zone labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelMode {
    /// Chinese over English.
    #[default]
    Bilingual,
    /// English only.
    En,
    /// Chinese only.
    Cn,
}

impl LabelMode {
    fn needs_cjk(self) -> bool {
        matches!(self, Self::Bilingual | Self::Cn)
    }
}

/// CJK families tried in order when labels contain Chinese.
pub const CJK_CANDIDATES: [&str; 7] = [
    "Noto Sans CJK SC",
    "Source Han Sans SC",
    "Microsoft YaHei",
    "PingFang SC",
    "Hiragino Sans GB",
    "DengXian",
    "SimHei",
];

const LATIN_FALLBACK: &str = "DejaVu Sans";

/// Outcome of font resolution for a requested [`LabelMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontChoice {
    /// Mode actually used (may have fallen back to [`LabelMode::En`]).
    pub mode: LabelMode,
    /// CJK family in use, if any.
    pub cjk_family: Option<String>,
    /// `true` when the requested mode could not be honoured.
    pub fell_back: bool,
}

impl FontChoice {
    /// Value for an SVG `font-family` attribute.
    pub fn font_family(&self) -> String {
        match &self.cjk_family {
            Some(cjk) => format!("'{cjk}', '{LATIN_FALLBACK}', sans-serif"),
            None => format!("'{LATIN_FALLBACK}', sans-serif"),
        }
    }

    /// One-line description for the run log.
    pub fn describe(&self) -> String {
        match (&self.cjk_family, self.fell_back) {
            (Some(f), _) => format!("Using CJK font: {f}"),
            (None, true) => "No CJK font found. Falling back to English-only labels.".to_owned(),
            (None, false) => "Using English-only labels.".to_owned(),
        }
    }
}

/// Pick fonts for `requested` from the installed `families`.
pub fn resolve_fonts(requested: LabelMode, families: &BTreeSet<String>) -> FontChoice {
    if !requested.needs_cjk() {
        return FontChoice {
            mode: LabelMode::En,
            cjk_family: None,
            fell_back: false,
        };
    }
    match CJK_CANDIDATES.iter().find(|c| families.contains(**c)) {
        Some(f) => FontChoice {
            mode: requested,
            cjk_family: Some((*f).to_owned()),
            fell_back: false,
        },
        None => FontChoice {
            mode: LabelMode::En,
            cjk_family: None,
            fell_back: true,
        },
    }
}

/// Label lines for a zone.
pub fn zone_label(mode: LabelMode, name_cn: &str, name_en: &str) -> Vec<String> {
    match mode {
        LabelMode::Bilingual => vec![name_cn.to_owned(), name_en.to_owned()],
        LabelMode::Cn => vec![name_cn.to_owned()],
        LabelMode::En => vec![name_en.to_owned()],
    }
}

/// Caption drawn inside the house footprint.
pub fn house_label(mode: LabelMode) -> &'static str {
    match mode {
        LabelMode::Bilingual => "住宅 / House",
        LabelMode::Cn => "住宅",
        LabelMode::En => "House",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fams(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn english_never_needs_cjk() {
        let c = resolve_fonts(LabelMode::En, &fams(&[]));
        assert_eq!(c.mode, LabelMode::En);
        assert!(!c.fell_back);
        assert_eq!(c.font_family(), "'DejaVu Sans', sans-serif");
    }

    #[test]
    fn first_available_candidate_wins() {
        let c = resolve_fonts(
            LabelMode::Bilingual,
            &fams(&["SimHei", "PingFang SC", "Arial"]),
        );
        assert_eq!(c.mode, LabelMode::Bilingual);
        assert_eq!(c.cjk_family.as_deref(), Some("PingFang SC"));
        assert!(c.describe().contains("PingFang SC"));
    }

    #[test]
    fn missing_cjk_falls_back_to_english() {
        let c = resolve_fonts(LabelMode::Cn, &fams(&["DejaVu Sans"]));
        assert_eq!(c.mode, LabelMode::En);
        assert!(c.fell_back);
        assert!(c.describe().contains("Falling back"));
    }

    #[test]
    fn labels_follow_mode() {
        assert_eq!(zone_label(LabelMode::Bilingual, "草坪", "Lawn"), ["草坪", "Lawn"]);
        assert_eq!(zone_label(LabelMode::En, "草坪", "Lawn"), ["Lawn"]);
        assert_eq!(house_label(LabelMode::Cn), "住宅");
    }
}
