use serde_json::json;

use super::*;
use crate::plan::model::ZoneShape;

fn minimal() -> Value {
    json!({
        "title": "Back yard",
        "canvas": {"width": 800, "height": 500, "margin": 20, "bg_color": "#FFFFFF"},
        "house": {"rect": [0.0, 0.0, 1.0, 0.2]},
        "zones": [
            {"id": "lawn", "rect": [0.1, 0.3, 0.5, 0.5], "style_preset": "lawn",
             "name_en": "Lawn", "name_cn": "草坪"}
        ]
    })
}

#[test]
fn clean_config_has_no_messages() {
    let r = validate_and_fix(minimal());
    assert!(r.fixes.is_empty(), "{:?}", r.fixes);
    assert!(r.warnings.is_empty(), "{:?}", r.warnings);
    assert!(!r.is_fatal());
    let cfg = r.into_config().unwrap();
    assert_eq!(cfg.title, "Back yard");
    assert_eq!(cfg.zones.len(), 1);
    assert!(cfg.paths.is_empty());
}

#[test]
fn missing_zones_is_filled_with_empty_list_and_reported() {
    let mut doc = minimal();
    doc.as_object_mut().unwrap().remove("zones");

    let r = validate_and_fix(doc);
    assert_eq!(
        r.fixes,
        vec!["Top-level key 'zones' was missing. Added default values.".to_string()]
    );
    let cfg = r.into_config().unwrap();
    assert!(cfg.zones.is_empty());
}

#[test]
fn empty_document_is_fully_defaulted() {
    let r = validate_and_fix(json!({}));
    assert_eq!(r.fixes.len(), 4);
    let cfg = r.into_config().unwrap();
    assert_eq!(cfg.title, DEFAULT_TITLE);
    assert_eq!(cfg.canvas.width, 1600.0);
    assert_eq!(cfg.canvas.margin, 60.0);
    assert_eq!(cfg.house.rect.h, 0.15);
}

#[test]
fn house_without_rect_gets_default() {
    let mut doc = minimal();
    doc["house"] = json!({});
    let r = validate_and_fix(doc);
    assert!(r.fixes.iter().any(|f| f.contains("'house' section was missing 'rect'")));
    assert!(!r.is_fatal());
}

#[test]
fn unknown_preset_falls_back_to_default_with_warning() {
    let mut doc = minimal();
    doc["zones"][0]["style_preset"] = json!("moat");
    let r = validate_and_fix(doc);
    assert_eq!(r.warnings.len(), 1);
    assert!(r.warnings[0].contains("Zone 'lawn' has invalid style_preset: 'moat'"));
    let cfg = r.into_config().unwrap();
    assert_eq!(cfg.zones[0].style_preset, "default");
}

#[test]
fn missing_preset_is_also_a_warning() {
    let mut doc = minimal();
    doc["zones"][0].as_object_mut().unwrap().remove("style_preset");
    let r = validate_and_fix(doc);
    assert!(r.warnings[0].contains("'None'"));
    assert!(!r.is_fatal());
}

#[test]
fn shapeless_zone_is_fatal_and_uses_index_for_name() {
    let mut doc = minimal();
    doc["zones"] = json!([{"style_preset": "deck"}]);
    let r = validate_and_fix(doc);
    assert!(r.is_fatal());
    assert!(r.config.is_none());
    assert!(r.errors[0].starts_with("Zone '1' has no shape"));
}

#[test]
fn zone_with_two_shapes_is_fatal() {
    let mut doc = minimal();
    doc["zones"][0]["polygon"] = json!([[0.0, 0.0], [1.0, 0.0], [0.5, 1.0]]);
    let r = validate_and_fix(doc);
    assert!(r.is_fatal());
    assert!(r.errors[0].contains("exactly one shape"));
}

#[test]
fn polygon_needs_three_points() {
    let mut doc = minimal();
    doc["zones"] = json!([{"id": "pond", "style_preset": "water_feature",
                           "polygon": [[0.1, 0.1], [0.2, 0.2]]}]);
    let r = validate_and_fix(doc);
    assert!(r.errors[0].contains("at least 3 points"));

    let mut doc = minimal();
    doc["zones"] = json!([{"id": "pond", "style_preset": "water_feature",
                           "polygon": [[0.1, 0.1], [0.2, 0.2], [0.1, 0.3]]}]);
    let cfg = validate_and_fix(doc).into_config().unwrap();
    assert!(matches!(&cfg.zones[0].shape, ZoneShape::Polygon(p) if p.len() == 3));
}

#[test]
fn out_of_range_coordinates_warn_but_render() {
    let mut doc = minimal();
    doc["zones"][0]["rect"] = json!([0.8, 0.3, 0.5, 0.5]);
    let r = validate_and_fix(doc);
    assert!(r.warnings.iter().any(|w| w.contains("outside [0, 1]")));
    assert!(!r.is_fatal());
}

#[test]
fn bad_canvas_is_fatal() {
    let mut doc = minimal();
    doc["canvas"]["margin"] = json!(300);
    let r = validate_and_fix(doc);
    assert!(r.errors[0].contains("no drawable area"));

    let mut doc = minimal();
    doc["canvas"]["width"] = json!(-5);
    assert!(validate_and_fix(doc).is_fatal());
}

#[test]
fn invalid_override_is_dropped_with_warning() {
    let mut doc = minimal();
    doc["zones"][0]["style_override"] = json!({"linestyle": "wavy"});
    let r = validate_and_fix(doc);
    assert!(r.warnings[0].contains("invalid style_override"));
    let cfg = r.into_config().unwrap();
    assert_eq!(cfg.zones[0].style_override, Style::default());
}

#[test]
fn incomplete_paths_and_features_warn() {
    let mut doc = minimal();
    doc["paths"] = json!([{"style_preset": "gravel", "points": [[0.0, 0.0], [1.0, 1.0]]},
                          {"points": [[0.5, 0.5]]}]);
    doc["features"] = json!([{"type": "tree", "position": [0.5, 0.5]},
                             {"type": "bench", "position": [0.5, 0.5], "size": 0.02}]);
    let r = validate_and_fix(doc);
    assert!(r.warnings.iter().any(|w| w.contains("Falling back to 'path_stone'")));
    assert!(r.warnings.iter().any(|w| w.contains("fewer than 2 points")));
    assert!(r.warnings.iter().any(|w| w.contains("missing size")));
    assert!(r.warnings.iter().any(|w| w.contains("unknown type")));
    let cfg = r.into_config().unwrap();
    assert_eq!(cfg.paths[0].style_preset, "path_stone");
    assert!(cfg.features.iter().all(|f| f.drawable().is_none()));
}

#[test]
fn feature_with_non_text_type_is_skipped_not_fatal() {
    let mut doc = minimal();
    doc["features"] = json!([{"type": 1, "position": [0.5, 0.5], "size": 0.05},
                             {"type": 2, "size": 0.05}]);
    let r = validate_and_fix(doc);
    assert!(r.errors.is_empty(), "{:?}", r.errors);
    assert!(r.warnings.iter().any(|w| w.contains("Feature #1 has unknown type 1")));
    assert!(r.warnings.iter().any(|w| w.contains("Feature #2 is missing position")));
    let cfg = r.into_config().unwrap();
    assert_eq!(cfg.features.len(), 2);
    assert!(cfg.features.iter().all(|f| f.kind.is_none() && f.drawable().is_none()));
}

#[test]
fn numeric_title_and_names_render_as_text() {
    let mut doc = minimal();
    doc["title"] = json!(2024);
    doc["zones"][0]["name_en"] = json!(2024);
    doc["zones"][0]["name_cn"] = json!(7);
    doc["features"] = json!([{"type": "tree", "position": [0.5, 0.5], "size": 0.05,
                              "name_en": 3}]);
    let r = validate_and_fix(doc);
    assert!(r.errors.is_empty(), "{:?}", r.errors);
    let cfg = r.into_config().unwrap();
    assert_eq!(cfg.title, "2024");
    assert_eq!(cfg.zones[0].name_en, "2024");
    assert_eq!(cfg.zones[0].name_cn, "7");
    assert_eq!(cfg.features[0].name_en, "3");
}

#[test]
fn non_mapping_root_is_fatal() {
    let r = validate_and_fix(json!([1, 2, 3]));
    assert!(r.errors[0].contains("but got list"));
    assert!(r.into_config().is_err());
}
