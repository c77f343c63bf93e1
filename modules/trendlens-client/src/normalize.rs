// Response-shape normalization.
//
// Backends disagree on whether a list comes back bare, under `data`, or under
// a collection name like `posts`/`videos`. Matchers run in priority order and
// the first hit decides the shape.

use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Body is already an array.
    Array,
    /// `{ "data": [...] }`.
    DataArray,
    /// First array-valued property, in the response's own key order.
    NamedArray(String),
    /// Object with no array property, wrapped as one element.
    Singleton,
    /// Null or a scalar.
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub shape: Shape,
    pub data: Vec<Value>,
}

type Matcher = fn(&mut Value) -> Option<Normalized>;

const SHAPE_MATCHERS: &[Matcher] = &[
    match_array,
    match_data_array,
    match_named_array,
    match_singleton,
];

fn match_array(body: &mut Value) -> Option<Normalized> {
    match body {
        Value::Array(items) => Some(Normalized {
            shape: Shape::Array,
            data: std::mem::take(items),
        }),
        _ => None,
    }
}

fn match_data_array(body: &mut Value) -> Option<Normalized> {
    match body.get_mut("data") {
        Some(Value::Array(items)) => Some(Normalized {
            shape: Shape::DataArray,
            data: std::mem::take(items),
        }),
        _ => None,
    }
}

fn match_named_array(body: &mut Value) -> Option<Normalized> {
    let object = body.as_object_mut()?;
    let key = first_array_key(object)?;
    match object.get_mut(&key) {
        Some(Value::Array(items)) => Some(Normalized {
            data: std::mem::take(items),
            shape: Shape::NamedArray(key),
        }),
        _ => None,
    }
}

fn match_singleton(body: &mut Value) -> Option<Normalized> {
    match body {
        Value::Object(_) => Some(Normalized {
            shape: Shape::Singleton,
            data: vec![body.take()],
        }),
        _ => None,
    }
}

fn first_array_key(object: &Map<String, Value>) -> Option<String> {
    object
        .iter()
        .find(|(_, v)| v.is_array())
        .map(|(k, _)| k.clone())
}

/// Coerce any response body into a flat list of records.
pub fn normalize(mut body: Value) -> Normalized {
    SHAPE_MATCHERS
        .iter()
        .find_map(|matcher| matcher(&mut body))
        .unwrap_or(Normalized {
            shape: Shape::Empty,
            data: Vec::new(),
        })
}
