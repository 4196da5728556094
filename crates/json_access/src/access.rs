//! Path-based accessors over `serde_json` trees

use domain::Point;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::JsonAccessError;
use crate::path::{PathSegment, collect_keys, render_path};
use crate::point::as_point;

/// Read-only navigation of a JSON object by key path
///
/// Only [`JsonAccess::as_json_object`] has to be provided; every accessor is
/// built on top of it. Lookups walk one key per step and only ever descend
/// into objects: an array, scalar or missing key anywhere along the path
/// resolves to `None`.
pub trait JsonAccess {
    /// The object at the root of this document, if the root is an object
    fn as_json_object(&self) -> Option<&Map<String, Value>>;

    /// Element at `path`, or `None` if any step is missing or not an object
    ///
    /// An empty path resolves to `None`.
    fn get_element<I>(&self, path: I) -> Option<&Value>
    where
        I: IntoIterator,
        I::Item: PathSegment,
    {
        lookup(self.as_json_object()?, &collect_keys(path))
    }

    /// Element at `path`, or [`JsonAccessError::MissingField`]
    ///
    /// # Errors
    ///
    /// Returns an error naming the path when the element is absent.
    fn require<I>(&self, path: I) -> Result<&Value, JsonAccessError>
    where
        I: IntoIterator,
        I::Item: PathSegment,
    {
        let keys = collect_keys(path);
        self.as_json_object()
            .and_then(|root| lookup(root, &keys))
            .ok_or_else(|| JsonAccessError::missing(render_path(&keys)))
    }

    /// Number at `path`
    ///
    /// Strings holding a number are accepted; other kinds resolve to `None`.
    fn get_double<I>(&self, path: I) -> Option<f64>
    where
        I: IntoIterator,
        I::Item: PathSegment,
    {
        self.get_element(path).and_then(scalar_f64)
    }

    /// Integer at `path`
    ///
    /// Strings holding an integer are accepted; fractional numbers and other
    /// kinds resolve to `None`.
    fn get_long<I>(&self, path: I) -> Option<i64>
    where
        I: IntoIterator,
        I::Item: PathSegment,
    {
        self.get_element(path).and_then(scalar_i64)
    }

    /// Scalar at `path` rendered as text
    ///
    /// Numbers and booleans are rendered in their JSON form; `null` and
    /// containers resolve to `None`.
    fn get_string<I>(&self, path: I) -> Option<String>
    where
        I: IntoIterator,
        I::Item: PathSegment,
    {
        self.get_element(path).and_then(scalar_string)
    }

    /// Boolean at `path`, defaulting to `false`
    ///
    /// Flags in this API only matter when present and true, so absence and
    /// any non-boolean value read as `false`.
    fn get_boolean<I>(&self, path: I) -> bool
    where
        I: IntoIterator,
        I::Item: PathSegment,
    {
        match self.get_element(path) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(text)) => text == "true",
            _ => false,
        }
    }

    /// Object at `path`
    fn get_object<I>(&self, path: I) -> Option<&Map<String, Value>>
    where
        I: IntoIterator,
        I::Item: PathSegment,
    {
        self.get_element(path).and_then(Value::as_object)
    }

    /// Array at `path`
    fn get_array<I>(&self, path: I) -> Option<&[Value]>
    where
        I: IntoIterator,
        I::Item: PathSegment,
    {
        self.get_element(path)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    /// Array of scalars at `path`, each rendered as text
    ///
    /// # Errors
    ///
    /// Returns [`JsonAccessError::Malformed`] naming the first element that
    /// is `null` or a container.
    fn get_string_list<I>(&self, path: I) -> Result<Option<Vec<String>>, JsonAccessError>
    where
        I: IntoIterator,
        I::Item: PathSegment,
    {
        let keys = collect_keys(path);
        decode_array(self.as_json_object(), &keys, |item| {
            scalar_string(item).ok_or("expected a string")
        })
    }

    /// Array of numbers at `path`
    ///
    /// # Errors
    ///
    /// Returns [`JsonAccessError::Malformed`] naming the first element that
    /// is not a number.
    fn get_double_list<I>(&self, path: I) -> Result<Option<Vec<f64>>, JsonAccessError>
    where
        I: IntoIterator,
        I::Item: PathSegment,
    {
        let keys = collect_keys(path);
        decode_array(self.as_json_object(), &keys, |item| {
            scalar_f64(item).ok_or("expected a number")
        })
    }

    /// Decode the sub-tree at `path` into `T`
    ///
    /// Unknown fields in the input are ignored and missing `Option` fields
    /// decode as `None`, so API additions never break decoding.
    ///
    /// # Errors
    ///
    /// Returns [`JsonAccessError::Decode`] if a field required by `T` is
    /// missing or has the wrong type.
    fn deserialize<T, I>(&self, path: I) -> Result<Option<T>, JsonAccessError>
    where
        T: DeserializeOwned,
        I: IntoIterator,
        I::Item: PathSegment,
    {
        let keys = collect_keys(path);
        self.as_json_object()
            .and_then(|root| lookup(root, &keys))
            .map(|value| decode(value, render_path(&keys)))
            .transpose()
    }

    /// Decode the array at `path` into a list of `T`
    ///
    /// # Errors
    ///
    /// Returns [`JsonAccessError::Decode`] for the first element that does
    /// not decode; no partial list is returned.
    fn deserialize_list<T, I>(&self, path: I) -> Result<Option<Vec<T>>, JsonAccessError>
    where
        T: DeserializeOwned,
        I: IntoIterator,
        I::Item: PathSegment,
    {
        let keys = collect_keys(path);
        let Some(items) = self
            .as_json_object()
            .and_then(|root| lookup(root, &keys))
            .and_then(Value::as_array)
        else {
            return Ok(None);
        };

        let base = render_path(&keys);
        items
            .iter()
            .enumerate()
            .map(|(index, item)| decode(item, format!("{base}.{index}")))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Point stored as a `lat`/`lng` object at `path`
    ///
    /// # Errors
    ///
    /// Returns [`JsonAccessError::MissingField`] if the object has `lng` but
    /// no `lat`.
    fn get_point<I>(&self, path: I) -> Result<Option<Point>, JsonAccessError>
    where
        I: IntoIterator,
        I::Item: PathSegment,
    {
        let keys = collect_keys(path);
        match self.as_json_object().and_then(|root| lookup(root, &keys)) {
            Some(Value::Object(object)) => {
                as_point(object).map_err(|e| e.within(&render_path(&keys)))
            },
            _ => Ok(None),
        }
    }
}

impl JsonAccess for Value {
    fn as_json_object(&self) -> Option<&Map<String, Value>> {
        self.as_object()
    }
}

impl JsonAccess for Map<String, Value> {
    fn as_json_object(&self) -> Option<&Map<String, Value>> {
        Some(self)
    }
}

impl<T: JsonAccess + ?Sized> JsonAccess for &T {
    fn as_json_object(&self) -> Option<&Map<String, Value>> {
        (**self).as_json_object()
    }
}

fn lookup<'a>(root: &'a Map<String, Value>, keys: &[String]) -> Option<&'a Value> {
    let (first, rest) = keys.split_first()?;
    rest.iter()
        .try_fold(root.get(first)?, |current, key| current.as_object()?.get(key))
}

fn decode<T: DeserializeOwned>(value: &Value, path: String) -> Result<T, JsonAccessError> {
    T::deserialize(value).map_err(|source| JsonAccessError::Decode { path, source })
}

fn decode_array<T>(
    root: Option<&Map<String, Value>>,
    keys: &[String],
    convert: impl Fn(&Value) -> Result<T, &'static str>,
) -> Result<Option<Vec<T>>, JsonAccessError> {
    let Some(items) = root
        .and_then(|root| lookup(root, keys))
        .and_then(Value::as_array)
    else {
        return Ok(None);
    };

    let base = render_path(keys);
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            convert(item).map_err(|reason| JsonAccessError::malformed(format!("{base}.{index}"), reason))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn scalar_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn scalar_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use serde::Deserialize;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "total_results": 2,
            "rate": { "limit": 2500, "remaining": "2499", "reset": 1_700_000_000 },
            "status": { "code": 200, "message": "OK" },
            "flags": { "on": true, "off": false, "text": "true", "number": 1 },
            "results": [
                { "confidence": 9, "formatted": "Wattstraße 11, Berlin" }
            ],
            "codes": ["DE-BE", "DE"],
            "mixed": ["DE", { "not": "a string" }],
            "numbers": [1, 2.5, "3"],
            "bad_numbers": [1, "two"],
            "geometry": { "lat": 52.54, "lng": 13.39 },
            "lng_only": { "lng": 13.39 },
            "0": { "nested": "numeric key" }
        })
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Status {
        code: u16,
        message: Option<String>,
        details: Option<String>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Entry {
        confidence: f64,
        formatted: String,
    }

    #[test]
    fn test_get_element_walks_objects() {
        let doc = sample();
        assert_eq!(doc.get_element(["status", "code"]), Some(&json!(200)));
        assert_eq!(doc.get_element(["status"]).map(Value::is_object), Some(true));
    }

    #[test]
    fn test_get_element_absent_cases() {
        let doc = sample();
        assert!(doc.get_element(["nope"]).is_none());
        assert!(doc.get_element(["status", "code", "deeper"]).is_none());
        // arrays are not indexed
        assert!(doc.get_element(path!["results", 0]).is_none());
        assert!(doc.get_element(Vec::<String>::new()).is_none());
        assert!(json!([1, 2]).get_element(["0"]).is_none());
        assert!(json!("scalar").get_element(["a"]).is_none());
    }

    #[test]
    fn test_numeric_key_is_stringified() {
        let doc = sample();
        assert_eq!(
            doc.get_string(path![0, "nested"]),
            Some("numeric key".to_string())
        );
    }

    #[test]
    fn test_require() {
        let doc = sample();
        assert!(doc.require(["total_results"]).is_ok());

        let err = doc.require(["rate", "missing"]).unwrap_err();
        assert!(matches!(err, JsonAccessError::MissingField { .. }));
        assert_eq!(err.path(), "rate.missing");
    }

    #[test]
    fn test_scalar_accessors() {
        let doc = sample();
        assert_eq!(doc.get_long(["total_results"]), Some(2));
        assert_eq!(doc.get_double(["geometry", "lat"]), Some(52.54));
        assert_eq!(doc.get_long(["rate", "remaining"]), Some(2499));
        assert_eq!(doc.get_string(["status", "message"]), Some("OK".to_string()));
        assert_eq!(doc.get_string(["status", "code"]), Some("200".to_string()));
    }

    #[test]
    fn test_scalar_kind_mismatch_is_absent() {
        let doc = sample();
        assert_eq!(doc.get_double(["status", "message"]), None);
        assert_eq!(doc.get_long(["geometry", "lat"]), None);
        assert_eq!(doc.get_string(["status"]), None);
        assert_eq!(doc.get_double(["results"]), None);
    }

    #[test]
    fn test_get_boolean_defaults_to_false() {
        let doc = sample();
        assert!(doc.get_boolean(["flags", "on"]));
        assert!(doc.get_boolean(["flags", "text"]));
        assert!(!doc.get_boolean(["flags", "off"]));
        assert!(!doc.get_boolean(["flags", "number"]));
        assert!(!doc.get_boolean(["flags", "missing"]));
    }

    #[test]
    fn test_container_accessors() {
        let doc = sample();
        assert!(doc.get_object(["status"]).is_some());
        assert!(doc.get_object(["results"]).is_none());
        assert_eq!(doc.get_array(["results"]).map(<[Value]>::len), Some(1));
        assert!(doc.get_array(["status"]).is_none());
    }

    #[test]
    fn test_string_list() {
        let doc = sample();
        assert_eq!(
            doc.get_string_list(["codes"]).unwrap(),
            Some(vec!["DE-BE".to_string(), "DE".to_string()])
        );
        assert_eq!(doc.get_string_list(["missing"]).unwrap(), None);

        let err = doc.get_string_list(["mixed"]).unwrap_err();
        assert!(matches!(err, JsonAccessError::Malformed { .. }));
        assert_eq!(err.path(), "mixed.1");
    }

    #[test]
    fn test_double_list() {
        let doc = sample();
        assert_eq!(
            doc.get_double_list(["numbers"]).unwrap(),
            Some(vec![1.0, 2.5, 3.0])
        );

        let err = doc.get_double_list(["bad_numbers"]).unwrap_err();
        assert_eq!(err.path(), "bad_numbers.1");
    }

    #[test]
    fn test_deserialize_ignores_unknown_and_defaults_options() {
        let doc = json!({"status": {"code": 200, "extra": [1, 2, 3]}});
        let status: Option<Status> = doc.deserialize(["status"]).unwrap();
        assert_eq!(
            status,
            Some(Status {
                code: 200,
                message: None,
                details: None,
            })
        );
    }

    #[test]
    fn test_deserialize_absent() {
        let doc = sample();
        let status: Option<Status> = doc.deserialize(["missing"]).unwrap();
        assert!(status.is_none());
    }

    #[test]
    fn test_deserialize_missing_required_field() {
        let doc = json!({"status": {"message": "OK"}});
        let err = doc.deserialize::<Status, _>(["status"]).unwrap_err();
        assert!(matches!(err, JsonAccessError::Decode { .. }));
        assert_eq!(err.path(), "status");
        assert!(err.to_string().contains("code"));
    }

    #[test]
    fn test_deserialize_list() {
        let doc = sample();
        let entries: Vec<Entry> = doc.deserialize_list(["results"]).unwrap().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].formatted, "Wattstraße 11, Berlin");
    }

    #[test]
    fn test_deserialize_list_fails_on_one_bad_element() {
        let doc = json!({"results": [
            { "confidence": 9, "formatted": "ok" },
            { "confidence": "high" },
            { "confidence": 1, "formatted": "also ok" }
        ]});
        let err = doc.deserialize_list::<Entry, _>(["results"]).unwrap_err();
        assert!(matches!(err, JsonAccessError::Decode { .. }));
        assert_eq!(err.path(), "results.1");
    }

    #[test]
    fn test_get_point() {
        let doc = sample();
        let point = doc.get_point(["geometry"]).unwrap().unwrap();
        assert_eq!(point.coordinates(), [13.39, 52.54]);
        assert!(doc.get_point(["status"]).unwrap().is_none());
        assert!(doc.get_point(["missing"]).unwrap().is_none());

        let err = doc.get_point(["lng_only"]).unwrap_err();
        assert_eq!(err.path(), "lng_only.lat");
    }

    #[test]
    fn test_map_and_reference_impls() {
        let doc = sample();
        let map = doc.as_object().unwrap();
        assert_eq!(map.get_long(["total_results"]), Some(2));

        let by_ref = &map;
        assert_eq!(by_ref.get_long(["total_results"]), Some(2));
    }
}
