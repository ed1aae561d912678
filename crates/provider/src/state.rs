//! Terraform State Management
//!
//! Typed local state and its MessagePack encoding.

use std::collections::BTreeMap;

use fortiform_common::{Result, Scalar};
use serde::{Deserialize, Serialize};

/// Value of a local state attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum StateValue {
    /// No value. Setting it removes the attribute.
    #[default]
    Null,
    Scalar(Scalar),
    Records(Vec<State>),
}

impl StateValue {
    pub fn is_null(&self) -> bool {
        matches!(self, StateValue::Null)
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            StateValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_records(&self) -> Option<&[State]> {
        match self {
            StateValue::Records(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar()?.as_str()
    }

    pub fn shape(&self) -> &'static str {
        match self {
            StateValue::Null => "null",
            StateValue::Scalar(Scalar::Bool(_)) => "boolean",
            StateValue::Scalar(Scalar::Int(_)) => "integer",
            StateValue::Scalar(Scalar::String(_)) => "string",
            StateValue::Records(_) => "list of records",
        }
    }
}

impl From<Scalar> for StateValue {
    fn from(s: Scalar) -> Self {
        StateValue::Scalar(s)
    }
}

impl From<&str> for StateValue {
    fn from(s: &str) -> Self {
        StateValue::Scalar(s.into())
    }
}

impl From<String> for StateValue {
    fn from(s: String) -> Self {
        StateValue::Scalar(s.into())
    }
}

impl From<i64> for StateValue {
    fn from(n: i64) -> Self {
        StateValue::Scalar(n.into())
    }
}

impl From<i32> for StateValue {
    fn from(n: i32) -> Self {
        StateValue::Scalar(n.into())
    }
}

impl From<bool> for StateValue {
    fn from(b: bool) -> Self {
        StateValue::Scalar(b.into())
    }
}

impl From<Vec<State>> for StateValue {
    fn from(records: Vec<State>) -> Self {
        StateValue::Records(records)
    }
}

/// Attributes of one resource instance (or one block record), keyed by local name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(BTreeMap<String, StateValue>);

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, name: &str, value: impl Into<StateValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&StateValue> {
        self.0.get(name)
    }

    /// Set an attribute; `Null` removes it
    pub fn set(&mut self, name: &str, value: impl Into<StateValue>) {
        match value.into() {
            StateValue::Null => {
                self.0.remove(name);
            }
            v => {
                self.0.insert(name.to_string(), v);
            }
        }
    }

    /// Whether the attribute is configured. An empty record list counts as unset.
    pub fn is_set(&self, name: &str) -> bool {
        is_set(self.get(name))
    }

    /// Look up a dotted path such as `ntpserver.0.key`
    pub fn get_path(&self, path: &str) -> Option<&StateValue> {
        let mut segments = path.split('.');
        let mut current = self.get(segments.next()?)?;
        while let Some(segment) = segments.next() {
            let records = current.as_records()?;
            let index: usize = segment.parse().ok()?;
            let name = segments.next()?;
            current = records.get(index)?.get(name)?;
        }
        Some(current)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_str()
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name)?.as_scalar()?.as_i64()
    }

    pub fn records(&self, name: &str) -> &[State] {
        self.get(name).and_then(|v| v.as_records()).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StateValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn is_set(value: Option<&StateValue>) -> bool {
    match value {
        None | Some(StateValue::Null) => false,
        Some(StateValue::Records(r)) => !r.is_empty(),
        Some(StateValue::Scalar(_)) => true,
    }
}

/// Handle the lifecycle controller mutates: identifier plus attributes.
/// An empty `id` means the resource does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceData {
    pub id: String,
    pub state: State,
}

impl ResourceData {
    pub fn new(state: State) -> Self {
        Self {
            id: String::new(),
            state,
        }
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: State::new(),
        }
    }

    pub fn exists(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Decode state from MessagePack bytes. Empty input is an empty state.
pub fn decode_state(data: &[u8]) -> Result<State> {
    if data.is_empty() {
        return Ok(State::new());
    }
    Ok(rmp_serde::from_slice(data)?)
}

/// Encode state as MessagePack bytes
pub fn encode_state(state: &State) -> Result<Vec<u8>> {
    Ok(rmp_serde::to_vec_named(state)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ntp_state() -> State {
        State::new().with("ntpsync", "enable").with(
            "ntpserver",
            vec![
                State::new().with("id", 1).with("server", "ntp1.example.com"),
                State::new()
                    .with("id", 2)
                    .with("server", "ntp2.example.com")
                    .with("key", "secret123"),
            ],
        )
    }

    #[test]
    fn test_set_null_removes() {
        let mut state = State::new().with("status", "enable");
        assert!(state.is_set("status"));

        state.set("status", StateValue::Null);
        assert!(state.get("status").is_none());
        assert!(state.is_empty());
    }

    #[test]
    fn test_zero_value_is_set() {
        let state = State::new().with("port", 0).with("server", "");
        assert!(state.is_set("port"));
        assert!(state.is_set("server"));
        assert!(!state.is_set("mode"));
    }

    #[test]
    fn test_empty_records_are_unset() {
        let state = State::new().with("interface", Vec::<State>::new());
        assert!(!state.is_set("interface"));
    }

    #[test]
    fn test_get_path() {
        let state = ntp_state();
        assert_eq!(state.get_path("ntpserver.1.key").and_then(|v| v.as_str()), Some("secret123"));
        assert_eq!(state.get_path("ntpserver.0.server").and_then(|v| v.as_str()), Some("ntp1.example.com"));
        assert!(state.get_path("ntpserver.0.key").is_none());
        assert!(state.get_path("ntpserver.5.key").is_none());
        assert!(state.get_path("ntpsync.0.key").is_none());
    }

    #[test]
    fn test_msgpack_encoding() {
        let state = ntp_state();
        let bytes = encode_state(&state).unwrap();
        let decoded = decode_state(&bytes).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode_state(&[]).unwrap().is_empty());
    }
}
