//! Textual encoding of snapshot leaves.
//!
//! Scene files keep every leaf as a string, numbers included: vectors are
//! written as `"%f %f %f"`, quaternions as `"%f %f %f %f"` (x y z w) and type
//! tags as `"%i"`. The helpers here produce that text and read it back with
//! explicit errors instead of trusting the document.

use glam::{Quat, Vec3};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::Snapshot;

/// Failure reading a snapshot document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: missing or mistyped field `{field}`")]
    MalformedSnapshot { field: String },
    #[error("malformed snapshot: field `{field}` has unreadable value {value:?}")]
    InvalidValue { field: String, value: String },
    #[error("unknown {kind} type tag {tag}")]
    UnknownEntityType { kind: &'static str, tag: i32 },
}

impl SnapshotError {
    pub fn missing(field: &str) -> Self {
        SnapshotError::MalformedSnapshot {
            field: field.to_string(),
        }
    }

    pub fn invalid(field: &str, value: &str) -> Self {
        SnapshotError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

// ── Writing ─────────────────────────────────────────────────────

pub fn format_float(value: f32) -> String {
    format!("{:.6}", value)
}

pub fn format_int(value: i32) -> String {
    value.to_string()
}

pub fn format_vec3(v: Vec3) -> String {
    format!("{:.6} {:.6} {:.6}", v.x, v.y, v.z)
}

pub fn format_quat(q: Quat) -> String {
    format!("{:.6} {:.6} {:.6} {:.6}", q.x, q.y, q.z, q.w)
}

pub fn format_rgb(rgb: [u8; 3]) -> String {
    format!("{} {} {}", rgb[0], rgb[1], rgb[2])
}

/// Braced upper-case GUID form, e.g. `{6B29FC40-CA47-1067-B31D-00DD010662DA}`.
pub fn format_id(id: Uuid) -> String {
    let mut buffer = Uuid::encode_buffer();
    id.braced().encode_upper(&mut buffer).to_string()
}

// ── Reading ─────────────────────────────────────────────────────

/// Scan `N` whitespace separated floats. Trailing values are ignored.
pub fn parse_floats<const N: usize>(field: &str, text: &str) -> Result<[f32; N], SnapshotError> {
    let mut out = [0.0f32; N];
    let mut parts = text.split_whitespace();
    for slot in out.iter_mut() {
        let part = parts.next().ok_or_else(|| SnapshotError::invalid(field, text))?;
        *slot = part
            .parse::<f32>()
            .map_err(|_| SnapshotError::invalid(field, text))?;
    }
    Ok(out)
}

pub fn parse_float(field: &str, text: &str) -> Result<f32, SnapshotError> {
    let [v] = parse_floats::<1>(field, text)?;
    Ok(v)
}

pub fn parse_vec3(field: &str, text: &str) -> Result<Vec3, SnapshotError> {
    let [x, y, z] = parse_floats::<3>(field, text)?;
    Ok(Vec3::new(x, y, z))
}

pub fn parse_quat(field: &str, text: &str) -> Result<Quat, SnapshotError> {
    let [x, y, z, w] = parse_floats::<4>(field, text)?;
    let q = Quat::from_xyzw(x, y, z, w);
    // A zero quaternion cannot be normalized; treat it as identity like a fresh actor.
    if q.length_squared() <= f32::EPSILON {
        return Ok(Quat::IDENTITY);
    }
    Ok(q.normalize())
}

pub fn parse_int(field: &str, text: &str) -> Result<i32, SnapshotError> {
    text.split_whitespace()
        .next()
        .and_then(|part| part.parse::<i32>().ok())
        .ok_or_else(|| SnapshotError::invalid(field, text))
}

pub fn parse_rgb(field: &str, text: &str) -> Result<[u8; 3], SnapshotError> {
    let mut out = [0u8; 3];
    let mut parts = text.split_whitespace();
    for slot in out.iter_mut() {
        *slot = parts
            .next()
            .and_then(|part| part.parse::<u8>().ok())
            .ok_or_else(|| SnapshotError::invalid(field, text))?;
    }
    Ok(out)
}

pub fn parse_id(field: &str, text: &str) -> Result<Uuid, SnapshotError> {
    Uuid::parse_str(text.trim()).map_err(|_| SnapshotError::invalid(field, text))
}

// ── Field access ────────────────────────────────────────────────

/// The snapshot as a JSON object, or `MalformedSnapshot` naming `what`.
pub fn as_object<'a>(snapshot: &'a Snapshot, what: &str) -> Result<&'a Map<String, Value>, SnapshotError> {
    snapshot.as_object().ok_or_else(|| SnapshotError::missing(what))
}

pub fn str_field<'a>(snapshot: &'a Snapshot, field: &str) -> Result<&'a str, SnapshotError> {
    snapshot
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| SnapshotError::missing(field))
}

/// Optional nested object. Absent and `null` both read as `None`.
pub fn opt_object_field<'a>(snapshot: &'a Snapshot, field: &str) -> Result<Option<&'a Snapshot>, SnapshotError> {
    match snapshot.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) if value.is_object() => Ok(Some(value)),
        Some(_) => Err(SnapshotError::missing(field)),
    }
}

pub fn array_field<'a>(snapshot: &'a Snapshot, field: &str) -> Result<&'a [Value], SnapshotError> {
    snapshot
        .get(field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| SnapshotError::missing(field))
}

pub fn float_field(snapshot: &Snapshot, field: &str) -> Result<f32, SnapshotError> {
    parse_float(field, str_field(snapshot, field)?)
}

pub fn int_field(snapshot: &Snapshot, field: &str) -> Result<i32, SnapshotError> {
    parse_int(field, str_field(snapshot, field)?)
}

pub fn vec3_field(snapshot: &Snapshot, field: &str) -> Result<Vec3, SnapshotError> {
    parse_vec3(field, str_field(snapshot, field)?)
}

pub fn quat_field(snapshot: &Snapshot, field: &str) -> Result<Quat, SnapshotError> {
    parse_quat(field, str_field(snapshot, field)?)
}

pub fn rgb_field(snapshot: &Snapshot, field: &str) -> Result<[u8; 3], SnapshotError> {
    parse_rgb(field, str_field(snapshot, field)?)
}

pub fn id_field(snapshot: &Snapshot, field: &str) -> Result<Uuid, SnapshotError> {
    parse_id(field, str_field(snapshot, field)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_vec3_six_decimals() {
        assert_eq!(format_vec3(Vec3::new(1.0, -2.5, 0.0)), "1.000000 -2.500000 0.000000");
    }

    #[test]
    fn test_format_quat_order_is_xyzw() {
        assert_eq!(format_quat(Quat::IDENTITY), "0.000000 0.000000 0.000000 1.000000");
    }

    #[test]
    fn test_parse_vec3_ignores_extra_whitespace() {
        let v = parse_vec3("position", "  1.5   2 -3 ").unwrap();
        assert_eq!(v, Vec3::new(1.5, 2.0, -3.0));
    }

    #[test]
    fn test_parse_vec3_short_is_invalid() {
        let err = parse_vec3("scale", "1 2").unwrap_err();
        assert_eq!(err, SnapshotError::invalid("scale", "1 2"));
    }

    #[test]
    fn test_parse_quat_normalizes() {
        let q = parse_quat("rotation", "0 0 0 2").unwrap();
        assert!((q.w - 1.0).abs() < 1e-6);
        let zero = parse_quat("rotation", "0 0 0 0").unwrap();
        assert_eq!(zero, Quat::IDENTITY);
    }

    #[test]
    fn test_parse_rgb_rejects_out_of_range() {
        assert_eq!(parse_rgb("background_color", "10 20 30").unwrap(), [10, 20, 30]);
        assert!(parse_rgb("background_color", "10 20 300").is_err());
    }

    #[test]
    fn test_id_round_trip_braced() {
        let id = crate::new_id();
        let text = format_id(id);
        assert!(text.starts_with('{') && text.ends_with('}'));
        assert_eq!(text, text.to_uppercase());
        assert_eq!(parse_id("id", &text).unwrap(), id);
    }

    #[test]
    fn test_missing_field_names_it() {
        let doc = json!({ "name": "Camera 1" });
        assert_eq!(str_field(&doc, "name").unwrap(), "Camera 1");
        assert_eq!(
            str_field(&doc, "script").unwrap_err(),
            SnapshotError::missing("script")
        );
    }

    #[test]
    fn test_numeric_leaf_is_malformed() {
        // Leaves must be strings, a bare JSON number is rejected.
        let doc = json!({ "gizmo_snap_size": 0.5 });
        assert!(matches!(
            float_field(&doc, "gizmo_snap_size"),
            Err(SnapshotError::MalformedSnapshot { .. })
        ));
    }

    #[test]
    fn test_opt_object_field() {
        let doc = json!({ "collider": null, "bad": "x", "good": { "type": "0" } });
        assert!(opt_object_field(&doc, "collider").unwrap().is_none());
        assert!(opt_object_field(&doc, "absent").unwrap().is_none());
        assert!(opt_object_field(&doc, "good").unwrap().is_some());
        assert!(opt_object_field(&doc, "bad").is_err());
    }

    #[test]
    fn test_array_field() {
        let doc = json!({ "actors": [{}, {}] });
        assert_eq!(array_field(&doc, "actors").unwrap().len(), 2);
        assert!(array_field(&doc, "views").is_err());
    }
}
