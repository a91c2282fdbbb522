//! Single-pass repair of a loaded plan document.
//!
//! Repair edits the dynamic document in place: missing sections get defaults (a *fix*), bad
//! but recoverable values are replaced (a *warning*), and anything that cannot be drawn is an
//! *error*. A typed [`PlanConfig`] is only produced when there are no errors.

use serde_json::{Map, Value, json};

use crate::foundation::error::{YardError, YardResult};
use crate::plan::model::{DEFAULT_MARGIN, PlanConfig, id_string};
use crate::plan::presets::{DEFAULT_PATH_PRESET, DEFAULT_PRESET, Style, preset};

/// Title used when a config has none.
pub const DEFAULT_TITLE: &str = "Garden Plan (Auto-Generated)";

const REQUIRED_KEYS: [&str; 4] = ["title", "canvas", "house", "zones"];

fn default_section(key: &str) -> Value {
    match key {
        "title" => json!(DEFAULT_TITLE),
        "canvas" => json!({"width": 1600, "height": 1000, "margin": 60, "bg_color": "#FDFBF8"}),
        "house" => json!({"rect": default_house_rect()}),
        _ => json!([]),
    }
}

fn default_house_rect() -> Value {
    json!([0.0, 0.0, 1.0, 0.15])
}

/// Outcome of [`validate_and_fix`].
#[derive(Debug, Clone, Default)]
pub struct Repair {
    /// Typed config; `None` whenever `errors` is non-empty.
    pub config: Option<PlanConfig>,
    /// Defaults that were filled in.
    pub fixes: Vec<String>,
    /// Values that were replaced or will be skipped.
    pub warnings: Vec<String>,
    /// Problems that prevent rendering.
    pub errors: Vec<String>,
}

impl Repair {
    /// `true` when the config cannot be rendered.
    pub fn is_fatal(&self) -> bool {
        !self.errors.is_empty() || self.config.is_none()
    }

    /// The typed config, or a validation error joining every error message.
    pub fn into_config(self) -> YardResult<PlanConfig> {
        match self.config {
            Some(cfg) if self.errors.is_empty() => Ok(cfg),
            _ => Err(YardError::validation(self.errors.join("; "))),
        }
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

/// Repair `doc` and convert it to a [`PlanConfig`].
pub fn validate_and_fix(mut doc: Value) -> Repair {
    let mut r = Repair::default();

    if !doc.is_object() {
        r.errors.push(format!(
            "Config file is invalid. Expected a mapping (JSON object), but got {}.",
            type_name(&doc)
        ));
        return r;
    }
    let Some(root) = doc.as_object_mut() else {
        return r;
    };

    for key in REQUIRED_KEYS {
        if !root.contains_key(key) {
            root.insert(key.to_owned(), default_section(key));
            r.fixes
                .push(format!("Top-level key '{key}' was missing. Added default values."));
        }
    }

    check_canvas(root, &mut r);
    check_house(root, &mut r);
    check_zones(root, &mut r);
    check_paths(root, &mut r);
    check_features(root, &mut r);

    if r.errors.is_empty() {
        match serde_json::from_value::<PlanConfig>(doc) {
            Ok(cfg) => r.config = Some(cfg),
            Err(e) => r
                .errors
                .push(format!("Config does not match the expected structure: {e}")),
        }
    }
    r
}

fn check_canvas(root: &mut Map<String, Value>, r: &mut Repair) {
    let Some(Value::Object(canvas)) = root.get_mut("canvas") else {
        r.errors.push("'canvas' must be a mapping.".to_owned());
        return;
    };

    for (key, default) in [("width", 1600), ("height", 1000)] {
        if !canvas.contains_key(key) {
            canvas.insert(key.to_owned(), json!(default));
            r.fixes
                .push(format!("'canvas' section was missing '{key}'. Added a default."));
        }
    }

    let width = canvas.get("width").and_then(Value::as_f64);
    let height = canvas.get("height").and_then(Value::as_f64);
    let margin = match canvas.get("margin") {
        None => Some(DEFAULT_MARGIN),
        Some(v) => v.as_f64(),
    };

    let (Some(w), Some(h)) = (width, height) else {
        r.errors
            .push("'canvas' width and height must be numbers.".to_owned());
        return;
    };
    if w <= 0.0 || h <= 0.0 {
        r.errors.push(format!(
            "'canvas' width and height must be positive (got {w} x {h})."
        ));
        return;
    }
    match margin {
        Some(m) if m >= 0.0 && 2.0 * m < w && 2.0 * m < h => {}
        Some(m) => r.errors.push(format!(
            "'canvas' margin {m} leaves no drawable area on a {w} x {h} canvas."
        )),
        None => r.errors.push("'canvas' margin must be a number.".to_owned()),
    }
}

fn check_house(root: &mut Map<String, Value>, r: &mut Repair) {
    let Some(Value::Object(house)) = root.get_mut("house") else {
        r.errors.push("'house' must be a mapping.".to_owned());
        return;
    };
    if !house.contains_key("rect") {
        house.insert("rect".to_owned(), default_house_rect());
        r.fixes
            .push("'house' section was missing 'rect' key. Added a default.".to_owned());
    }
    if let Some(rect) = house.get("rect") {
        check_rect(rect, "House", r);
    }
}

fn numbers(v: &Value) -> Option<Vec<f64>> {
    v.as_array()?.iter().map(Value::as_f64).collect()
}

fn check_rect(rect: &Value, who: &str, r: &mut Repair) {
    match numbers(rect) {
        Some(v) if v.len() == 4 => {
            if v.iter().any(|c| !(0.0..=1.0).contains(c)) {
                r.warnings.push(format!(
                    "{who} rect has values outside [0, 1]; drawing as given."
                ));
            }
            if v[2] <= 0.0 || v[3] <= 0.0 {
                r.warnings
                    .push(format!("{who} rect has a non-positive width or height."));
            }
        }
        _ => r
            .errors
            .push(format!("{who} rect must be a list of 4 numbers [x, y, w, h].")),
    }
}

/// Check a list of `[x, y]` points. Returns the point count, or `None` if malformed.
fn check_points(points: &Value, who: &str, r: &mut Repair) -> Option<usize> {
    let list = points.as_array()?;
    let mut out_of_range = false;
    for p in list {
        let v = numbers(p)?;
        if v.len() != 2 {
            return None;
        }
        out_of_range |= v.iter().any(|c| !(0.0..=1.0).contains(c));
    }
    if out_of_range {
        r.warnings.push(format!(
            "{who} has points outside [0, 1]; drawing as given."
        ));
    }
    Some(list.len())
}

fn check_zones(root: &mut Map<String, Value>, r: &mut Repair) {
    let Some(Value::Array(zones)) = root.get_mut("zones") else {
        r.errors.push("'zones' must be a list.".to_owned());
        return;
    };

    for (i, zone) in zones.iter_mut().enumerate() {
        let Value::Object(z) = zone else {
            r.errors.push(format!("Zone #{} is not a mapping.", i + 1));
            continue;
        };
        let id = z
            .get("id")
            .map(id_string)
            .unwrap_or_else(|| (i + 1).to_string());

        let preset_name = z.get("style_preset").and_then(Value::as_str);
        if preset_name.and_then(preset).is_none() {
            let shown = match z.get("style_preset") {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => "None".to_owned(),
            };
            r.warnings.push(format!(
                "Zone '{id}' has invalid style_preset: '{shown}'. Falling back to '{DEFAULT_PRESET}'."
            ));
            z.insert("style_preset".to_owned(), json!(DEFAULT_PRESET));
        }

        if let Some(over) = z.get("style_override")
            && let Err(e) = serde_json::from_value::<Style>(over.clone())
        {
            r.warnings.push(format!(
                "Zone '{id}' has an invalid style_override ({e}). Ignoring it."
            ));
            z.remove("style_override");
        }

        let who = format!("Zone '{id}'");
        match (z.get("rect"), z.get("polygon")) {
            (None, None) => r.errors.push(format!(
                "Zone '{id}' has no shape (missing 'rect' or 'polygon'). It will not be drawn."
            )),
            (Some(_), Some(_)) => r.errors.push(format!(
                "Zone '{id}' has both 'rect' and 'polygon'; a zone must have exactly one shape."
            )),
            (Some(rect), None) => check_rect(rect, &who, r),
            (None, Some(poly)) => match check_points(poly, &who, r) {
                Some(n) if n >= 3 => {}
                Some(n) => r.errors.push(format!(
                    "Zone '{id}' polygon needs at least 3 points (got {n})."
                )),
                None => r.errors.push(format!(
                    "Zone '{id}' polygon must be a list of [x, y] points."
                )),
            },
        }
    }
}

fn check_paths(root: &mut Map<String, Value>, r: &mut Repair) {
    let paths = root
        .entry("paths")
        .or_insert_with(|| Value::Array(Vec::new()));
    if !paths.is_array() {
        r.warnings
            .push("'paths' is not a list. Ignoring it.".to_owned());
        *paths = Value::Array(Vec::new());
        return;
    }
    let Some(paths) = paths.as_array_mut() else {
        return;
    };

    for (i, path) in paths.iter_mut().enumerate() {
        if !path.is_object() {
            r.warnings
                .push(format!("Path #{} is not a mapping. Ignoring it.", i + 1));
            *path = json!({});
            continue;
        }
        let Some(p) = path.as_object_mut() else {
            continue;
        };
        let who = format!("Path #{}", i + 1);

        if let Some(name) = p.get("style_preset")
            && name.as_str().and_then(preset).is_none()
        {
            r.warnings.push(format!(
                "{who} has invalid style_preset: {name}. Falling back to '{DEFAULT_PATH_PRESET}'."
            ));
            p.insert("style_preset".to_owned(), json!(DEFAULT_PATH_PRESET));
        }

        match p.get("points") {
            None => r
                .warnings
                .push(format!("{who} has no 'points'. It will not be drawn.")),
            Some(points) => match check_points(points, &who, r) {
                Some(n) if n >= 2 => {}
                Some(_) => r
                    .warnings
                    .push(format!("{who} has fewer than 2 points. It will not be drawn.")),
                None => {
                    r.warnings.push(format!(
                        "{who} points must be a list of [x, y] points. It will not be drawn."
                    ));
                    p.remove("points");
                }
            },
        }
    }
}

fn check_features(root: &mut Map<String, Value>, r: &mut Repair) {
    let features = root
        .entry("features")
        .or_insert_with(|| Value::Array(Vec::new()));
    if !features.is_array() {
        r.warnings
            .push("'features' is not a list. Ignoring it.".to_owned());
        *features = Value::Array(Vec::new());
        return;
    }
    let Some(features) = features.as_array_mut() else {
        return;
    };

    for (i, feature) in features.iter_mut().enumerate() {
        if !feature.is_object() {
            r.warnings
                .push(format!("Feature #{} is not a mapping. Ignoring it.", i + 1));
            *feature = json!({});
            continue;
        }
        let Some(f) = feature.as_object_mut() else {
            continue;
        };
        let who = format!("Feature #{}", i + 1);

        if let Some(name) = f.get("style_preset")
            && name.as_str().and_then(preset).is_none()
        {
            r.warnings.push(format!(
                "{who} has invalid style_preset: {name}. Falling back to '{DEFAULT_PRESET}'."
            ));
            f.insert("style_preset".to_owned(), json!(DEFAULT_PRESET));
        }

        let missing: Vec<&str> = ["type", "position", "size"]
            .into_iter()
            .filter(|k| !f.contains_key(*k))
            .collect();
        if !missing.is_empty() {
            r.warnings.push(format!(
                "{who} is missing {}. It will not be drawn.",
                missing.join(", ")
            ));
        }

        if let Some(kind) = f.get("type")
            && !kind
                .as_str()
                .is_some_and(|t| matches!(t, "tree" | "lantern"))
        {
            r.warnings
                .push(format!("{who} has unknown type {kind}. It will not be drawn."));
            f.remove("type");
        }

        let pos_ok = f
            .get("position")
            .and_then(numbers)
            .is_some_and(|v| v.len() == 2);
        let size_ok = f
            .get("size")
            .and_then(Value::as_f64)
            .is_some_and(|s| s > 0.0);
        if !pos_ok || !size_ok {
            if missing.is_empty() {
                r.warnings.push(format!(
                    "{who} needs a [x, y] position and a positive size. It will not be drawn."
                ));
            }
            f.remove("position");
            f.remove("size");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/validate.rs"]
mod tests;
