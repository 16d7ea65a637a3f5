//! Request parameter types.
//!
//! # Design
//! A request body is always a JSON object. Callers may hand it over in three
//! shapes: object text, a list of string pairs, or an already-built map. All
//! three go through `IntoParameters`, so each verb on `HttpsClient` has one
//! generic signature instead of one overload per shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ClientError;

/// An ordered pair of strings used to build request parameters ad hoc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePair {
    pub key: String,
    pub value: String,
}

impl KeyValuePair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for KeyValuePair {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

/// JSON object sent as a request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(Map<String, Value>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse object text. Blank text means "no parameters".
    pub fn from_json_str(raw: &str) -> Result<Option<Self>, ClientError> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str::<Map<String, Value>>(raw)
            .map(|map| Some(Self(map)))
            .map_err(|e| ClientError::InvalidParameters(e.to_string()))
    }

    /// Build from string pairs. A repeated key keeps its last value.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = &'a KeyValuePair>,
    {
        pairs
            .into_iter()
            .map(|pair| (pair.key.clone(), Value::String(pair.value.clone())))
            .collect::<Map<_, _>>()
            .into()
    }

    /// Insert a value, returning the one it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Compact JSON text of the object.
    pub fn to_json_string(&self) -> Result<String, ClientError> {
        serde_json::to_string(&self.0).map_err(|e| ClientError::InvalidParameters(e.to_string()))
    }
}

impl From<Map<String, Value>> for Parameters {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<KeyValuePair> for Parameters {
    fn from_iter<I: IntoIterator<Item = KeyValuePair>>(iter: I) -> Self {
        iter.into_iter()
            .map(|pair| (pair.key, Value::String(pair.value)))
            .collect::<Map<_, _>>()
            .into()
    }
}

/// Conversion into optional request parameters.
///
/// `Ok(None)` means the request carries no body.
pub trait IntoParameters {
    fn into_parameters(self) -> Result<Option<Parameters>, ClientError>;
}

impl IntoParameters for () {
    fn into_parameters(self) -> Result<Option<Parameters>, ClientError> {
        Ok(None)
    }
}

impl<T: IntoParameters> IntoParameters for Option<T> {
    fn into_parameters(self) -> Result<Option<Parameters>, ClientError> {
        match self {
            Some(inner) => inner.into_parameters(),
            None => Ok(None),
        }
    }
}

impl IntoParameters for &str {
    fn into_parameters(self) -> Result<Option<Parameters>, ClientError> {
        Parameters::from_json_str(self)
    }
}

impl IntoParameters for String {
    fn into_parameters(self) -> Result<Option<Parameters>, ClientError> {
        Parameters::from_json_str(&self)
    }
}

impl IntoParameters for &String {
    fn into_parameters(self) -> Result<Option<Parameters>, ClientError> {
        Parameters::from_json_str(self)
    }
}

impl IntoParameters for &[KeyValuePair] {
    fn into_parameters(self) -> Result<Option<Parameters>, ClientError> {
        Ok(Some(Parameters::from_pairs(self)))
    }
}

impl<const N: usize> IntoParameters for [KeyValuePair; N] {
    fn into_parameters(self) -> Result<Option<Parameters>, ClientError> {
        Ok(Some(self.into_iter().collect()))
    }
}

impl IntoParameters for Vec<KeyValuePair> {
    fn into_parameters(self) -> Result<Option<Parameters>, ClientError> {
        Ok(Some(self.into_iter().collect()))
    }
}

impl IntoParameters for Parameters {
    fn into_parameters(self) -> Result<Option<Parameters>, ClientError> {
        Ok(Some(self))
    }
}

impl IntoParameters for &Parameters {
    fn into_parameters(self) -> Result<Option<Parameters>, ClientError> {
        Ok(Some(self.clone()))
    }
}

impl IntoParameters for Map<String, Value> {
    fn into_parameters(self) -> Result<Option<Parameters>, ClientError> {
        Ok(Some(Parameters(self)))
    }
}

impl IntoParameters for Value {
    fn into_parameters(self) -> Result<Option<Parameters>, ClientError> {
        match self {
            Value::Null => Ok(None),
            Value::Object(map) => Ok(Some(Parameters(map))),
            other => Err(ClientError::InvalidParameters(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }
}
