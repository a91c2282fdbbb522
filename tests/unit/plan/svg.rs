use std::sync::Arc;

use serde_json::json;

use super::*;
use crate::plan::fonts::LabelMode;
use crate::plan::validate::validate_and_fix;

fn english() -> FontChoice {
    FontChoice {
        mode: LabelMode::En,
        cjk_family: None,
        fell_back: false,
    }
}

fn config(extra: serde_json::Value) -> PlanConfig {
    let mut doc = json!({
        "title": "Plan <A & B>",
        "canvas": {"width": 1000, "height": 600, "margin": 50, "bg_color": "#FDFBF8"},
        "house": {"rect": [0.0, 0.0, 1.0, 0.2]},
        "zones": []
    });
    for (k, v) in extra.as_object().unwrap() {
        doc[k] = v.clone();
    }
    validate_and_fix(doc).into_config().unwrap()
}

#[test]
fn document_has_canvas_size_background_and_house() {
    let svg = build_svg(&config(json!({})), &english());
    assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="1000" height="600""#));
    assert!(svg.contains(r##"fill="#fdfbf8""##));
    // House: inner width 900, 20% of inner height 500.
    assert!(svg.contains(r##"<rect x="50" y="50" width="900" height="100" rx="0" fill="#c5b4a5""##));
    assert!(svg.contains(">House</tspan>"));
    assert!(svg.contains("Plan &lt;A &amp; B&gt;"));
}

#[test]
fn lawn_zone_gets_rounded_corners_dashes_and_hatch() {
    let cfg = config(json!({
        "zones": [{"id": "l", "rect": [0.1, 0.3, 0.5, 0.5], "style_preset": "lawn",
                   "name_en": "Lawn", "name_cn": "草坪"}]
    }));
    let svg = build_svg(&cfg, &english());
    // border_radius 0.05 of the 900px inner width.
    assert!(svg.contains(r#"rx="45""#));
    assert!(svg.contains(r#"<pattern id="hatch-0""#));
    assert!(svg.contains(r##"fill="url(#hatch-0)""##));
    assert!(svg.contains("stroke-dasharray"));
    // Hatched shapes are outlined in the hatch colour.
    assert!(svg.contains(r##"stroke="#aec08d""##));
    assert!(svg.contains(">Lawn</tspan>"));
    assert!(!svg.contains("草坪"));
}

#[test]
fn shared_hatches_reuse_one_pattern() {
    let cfg = config(json!({
        "zones": [
            {"rect": [0.0, 0.3, 0.2, 0.2], "style_preset": "deck"},
            {"rect": [0.5, 0.3, 0.2, 0.2], "style_preset": "deck"}
        ]
    }));
    let svg = build_svg(&cfg, &english());
    assert_eq!(svg.matches("<pattern ").count(), 1);
}

#[test]
fn override_changes_fill() {
    let cfg = config(json!({
        "zones": [{"rect": [0.0, 0.3, 0.2, 0.2], "style_preset": "water_feature",
                   "style_override": {"facecolor": "#123456", "alpha": 0.5}}]
    }));
    let svg = build_svg(&cfg, &english());
    assert!(svg.contains(r##"fill="#123456" fill-opacity="0.5""##));
}

#[test]
fn polygon_paths_and_features_are_drawn() {
    let cfg = config(json!({
        "zones": [{"id": "p", "polygon": [[0.0, 0.5], [1.0, 0.5], [0.5, 1.0]],
                   "style_preset": "zen_garden", "name_en": "Gravel"}],
        "paths": [{"points": [[0.0, 0.4], [1.0, 0.4]]}],
        "features": [
            {"type": "tree", "position": [0.5, 0.5], "size": 0.1, "style_preset": "feature_tree",
             "name_en": "Maple"},
            {"type": "lantern", "position": [0.2, 0.5], "size": 0.02, "style_preset": "feature_lantern"}
        ]
    }));
    let svg = build_svg(&cfg, &english());
    let poly = svg
        .lines()
        .find(|l| l.starts_with("<path d=\"M50"))
        .unwrap();
    assert!(poly.contains("950") && poly.contains("550") && poly.contains('Z'));
    assert!(svg.contains(r#"<polyline points="50,250 950,250""#));
    assert!(svg.contains(r##"stroke="#795548""##));
    // Tree diameter = 0.1 * 900.
    assert!(svg.contains(r#"<circle cx="500" cy="300" r="45""#));
    assert!(svg.contains(">Maple</tspan>"));
    assert!(svg.contains(r##"fill="#606060""##));
}

#[test]
fn generated_document_parses() {
    let cfg = config(json!({
        "zones": [{"rect": [0.1, 0.3, 0.5, 0.5], "style_preset": "lawn", "name_en": "Lawn"}]
    }));
    let svg = build_svg(&cfg, &english());
    let tree = crate::foundation::raster::parse_svg(&svg, Arc::new(usvg::fontdb::Database::new()));
    assert!(tree.is_ok());
}

#[test]
fn wide_glyphs_count_full_width() {
    assert_eq!(estimate_text_width("ab", 10.0), 12.0);
    assert_eq!(estimate_text_width("草坪", 10.0), 20.0);
}
