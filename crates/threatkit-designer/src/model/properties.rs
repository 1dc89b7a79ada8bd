//! Flat property bags carried by components and connections.

use serde_json::{json, Map, Value};

use crate::geometry::Point;

/// Free-form `string -> value` mapping. Key order is irrelevant.
pub type PropertyBag = Map<String, Value>;

/// Well-known property keys.
pub mod keys {
    pub const POSITION: &str = "position";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const NAME: &str = "name";
    pub const PARENT: &str = "parent_id";
    pub const SELECTED: &str = "selected";
    /// Persisted on nodes dropped from container stencils, so custom
    /// container tags stay containers in any editor.
    pub const CONTAINER: &str = "container";

    /// Renderer-only hints that older documents may carry. They are
    /// accepted on input and never written back.
    pub const TRANSIENT: [&str; 4] = ["resizable", "min_width", "min_height", "label"];
}

pub fn read_f64(bag: &PropertyBag, key: &str) -> Option<f64> {
    bag.get(key).and_then(Value::as_f64).filter(|v| v.is_finite())
}

pub fn read_str<'a>(bag: &'a PropertyBag, key: &str) -> Option<&'a str> {
    bag.get(key).and_then(Value::as_str)
}

pub fn read_bool(bag: &PropertyBag, key: &str) -> Option<bool> {
    bag.get(key).and_then(Value::as_bool)
}

/// Reads a `{x, y}` object.
pub fn read_point(bag: &PropertyBag, key: &str) -> Option<Point> {
    let obj = bag.get(key)?.as_object()?;
    let x = obj.get("x")?.as_f64()?;
    let y = obj.get("y")?.as_f64()?;
    (x.is_finite() && y.is_finite()).then(|| Point::new(x, y))
}

/// Writes `value` under `key` unless the bag already holds the same number.
///
/// Leaves the stored representation alone when the value is unchanged, so an
/// integer `150` is not rewritten as `150.0`.
pub fn write_f64(bag: &mut PropertyBag, key: &str, value: f64) {
    if read_f64(bag, key) != Some(value) {
        bag.insert(key.to_string(), json!(value));
    }
}

/// Writes a `{x, y}` object unless the bag already holds the same point.
pub fn write_point(bag: &mut PropertyBag, key: &str, point: Point) {
    if read_point(bag, key) != Some(point) {
        bag.insert(key.to_string(), json!({ "x": point.x, "y": point.y }));
    }
}

/// Overwrites `target` with every key in `patch`.
pub fn merge_patch(target: &mut PropertyBag, patch: PropertyBag) {
    for (key, value) in patch {
        target.insert(key, value);
    }
}

/// Adds keys from `patch` that `target` does not already have.
///
/// Returns the number of keys added.
pub fn merge_missing(target: &mut PropertyBag, patch: PropertyBag) -> usize {
    let mut added = 0;
    for (key, value) in patch {
        if !target.contains_key(&key) {
            target.insert(key, value);
            added += 1;
        }
    }
    added
}

/// Removes renderer-only keys.
pub fn strip_transient(bag: &mut PropertyBag) {
    for key in keys::TRANSIENT {
        bag.remove(key);
    }
}
