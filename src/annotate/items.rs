use serde::Serialize;
use serde_json::Value;

use crate::foundation::error::{YardError, YardResult};

pub const DEFAULT_NAME_CN: &str = "未知植物";
pub const DEFAULT_NAME_EN: &str = "Unknown";

/// One identified plant, positioned in normalized image coordinates.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlantItem {
    pub id: u32,
    pub name_cn: String,
    pub name_en: String,
    pub reason: String,
    pub cx: f64,
    pub cy: f64,
}

/// Parse an items document, tolerating a surrounding Markdown code fence.
///
/// Accepts `{"items": [...]}` or a bare array. A document without `items` yields no items.
pub fn parse_items_text(text: &str) -> YardResult<Vec<Value>> {
    let mut s = text.trim();
    if s.is_empty() {
        return Err(YardError::validation("items text is empty"));
    }
    if s.starts_with("```") {
        s = s.trim_matches('`');
        s = s.strip_prefix("json").unwrap_or(s);
    }

    let doc: Value = serde_json::from_str(s.trim())
        .map_err(|e| YardError::validation(format!("items are not valid JSON: {e}")))?;
    match doc {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("items") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(YardError::validation(format!(
                "'items' must be a list, got {other}"
            ))),
        },
        other => Err(YardError::validation(format!(
            "items document must be an object or a list, got {other}"
        ))),
    }
}

fn number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        _ => None,
    }
}

fn text_or(v: Option<&Value>, default: &str) -> String {
    match v {
        None | Some(Value::Null) => default.to_owned(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn coord(item: &serde_json::Map<String, Value>, key: &str, pos: usize) -> YardResult<f64> {
    let raw = match item.get(key) {
        None | Some(Value::Null) => 0.5,
        Some(v) => number(v).ok_or_else(|| {
            YardError::validation(format!("item {pos}: '{key}' is not a number: {v}"))
        })?,
    };
    Ok(((raw * 1000.0).round() / 1000.0).clamp(0.0, 1.0))
}

/// Fill defaults and bring coordinates into range.
///
/// Missing or zero ids become the 1-based position. Coordinates default to 0.5, are rounded to
/// three decimals and clamped to [0, 1].
pub fn normalize_items(items: &[Value]) -> YardResult<Vec<PlantItem>> {
    let mut out = Vec::with_capacity(items.len());
    for (i, raw) in items.iter().enumerate() {
        let pos = i + 1;
        let Some(item) = raw.as_object() else {
            return Err(YardError::validation(format!(
                "item {pos} must be an object, got {raw}"
            )));
        };

        let id = match item.get("id") {
            None | Some(Value::Null) => 0.0,
            Some(v) => number(v).ok_or_else(|| {
                YardError::validation(format!("item {pos}: 'id' is not a number: {v}"))
            })?,
        };
        let id = id.trunc();
        let id = if id >= 1.0 && id <= f64::from(u32::MAX) {
            id as u32
        } else {
            pos as u32
        };

        out.push(PlantItem {
            id,
            name_cn: text_or(item.get("name_cn"), DEFAULT_NAME_CN),
            name_en: text_or(item.get("name_en"), DEFAULT_NAME_EN),
            reason: text_or(item.get("reason"), ""),
            cx: coord(item, "cx", pos)?,
            cy: coord(item, "cy", pos)?,
        });
    }
    Ok(out)
}
