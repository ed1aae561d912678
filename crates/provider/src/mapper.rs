//! Wire <-> State Mapping
//!
//! `flatten` turns API responses into typed local state; `expand` turns local
//! state into API request bodies. Both are driven by the descriptor tables in
//! [`crate::schema`] and recurse into blocks to any depth.

use fortiform_common::{Error, Result, Scalar, WireObject, WireValue};
use tracing::{debug, warn};

use crate::schema::{Field, Kind, ResourceDescriptor};
use crate::state::{State, StateValue};

/// Options threaded through the mapper
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapContext {
    /// Always refresh block fields from the API, even when the local
    /// configuration does not declare them (import workflows)
    pub import_table: bool,
}

impl MapContext {
    pub fn import() -> Self {
        Self { import_table: true }
    }
}

/// Wire shapes for which a failed state write is tolerated. The API reports
/// some fields in a representation that does not match the schema (e.g. an
/// empty string for an unset integer); those leave the prior value in place.
pub fn api_patch(value: &WireValue) -> bool {
    matches!(
        value,
        WireValue::String(_) | WireValue::Number(_) | WireValue::List(_)
    )
}

fn member_path(parent: &str, index: usize, member: &str) -> String {
    format!("{}.{}.{}", parent, index, member)
}

fn state_write(path: &str, reason: impl Into<String>) -> Error {
    Error::StateWrite {
        field: path.to_string(),
        reason: reason.into(),
    }
}

fn expand_error(path: &str, reason: impl Into<String>) -> Error {
    Error::Expand {
        field: path.to_string(),
        reason: reason.into(),
    }
}

/// Flatten one wire value into its state representation.
///
/// `prior` is the whole prior state of the resource; `path` locates the field
/// inside it and is used to retain sensitive values the API does not return.
pub fn flatten(
    field: &Field,
    value: Option<&WireValue>,
    prior: &State,
    path: &str,
    ctx: &MapContext,
) -> Result<StateValue> {
    match field.kind {
        Kind::Block(members) => flatten_block(members, value, prior, path, ctx),
        kind => {
            let flattened = match value {
                None | Some(WireValue::Null) => StateValue::Null,
                Some(v) => StateValue::Scalar(to_scalar(kind, v).map_err(|r| state_write(path, r))?),
            };
            if field.sensitive {
                if let Some(retained) = prior
                    .get_path(path)
                    .and_then(|v| v.as_str())
                    .filter(|s| !s.is_empty())
                {
                    return Ok(StateValue::from(retained));
                }
            }
            Ok(flattened)
        }
    }
}

fn flatten_block(
    members: &[Field],
    value: Option<&WireValue>,
    prior: &State,
    path: &str,
    ctx: &MapContext,
) -> Result<StateValue> {
    let list = match value {
        None | Some(WireValue::Null) => return Ok(StateValue::Null),
        Some(WireValue::List(list)) => list,
        Some(other) => {
            return Err(state_write(path, format!("expected a list, got {}", other.shape())))
        }
    };
    if list.first().map_or(true, WireValue::is_null) {
        return Ok(StateValue::Null);
    }

    let mut records = Vec::with_capacity(list.len());
    for (index, element) in list.iter().enumerate() {
        let object = element.as_map().ok_or_else(|| {
            state_write(
                &format!("{}.{}", path, index),
                format!("expected an object, got {}", element.shape()),
            )
        })?;

        let mut record = State::new();
        for member in members {
            let wire = object.get(member.wire_name);
            // Members absent from the response are left out of the record,
            // except sensitive ones which may be retained from prior state.
            if wire.is_none() && !member.sensitive {
                continue;
            }
            let child_path = member_path(path, index, member.name);
            record.set(member.name, flatten(member, wire, prior, &child_path, ctx)?);
        }
        records.push(record);
    }
    Ok(StateValue::Records(records))
}

fn to_scalar(kind: Kind, value: &WireValue) -> std::result::Result<Scalar, String> {
    match (kind, value) {
        (Kind::String | Kind::Enum(_), WireValue::String(s)) => Ok(Scalar::String(s.clone())),
        (Kind::String | Kind::Enum(_), WireValue::Number(n)) => Ok(Scalar::String(n.to_string())),
        (Kind::Int, WireValue::Number(n)) => n
            .as_i64()
            .map(Scalar::Int)
            .ok_or_else(|| format!("{} is not an integer", n)),
        (Kind::Int, WireValue::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Scalar::Int)
            .map_err(|_| format!("{:?} is not an integer", s)),
        (Kind::Bool, WireValue::Bool(b)) => Ok(Scalar::Bool(*b)),
        (Kind::Bool, WireValue::String(s)) => match s.as_str() {
            "true" => Ok(Scalar::Bool(true)),
            "false" => Ok(Scalar::Bool(false)),
            _ => Err(format!("{:?} is not a boolean", s)),
        },
        (kind, other) => Err(format!("expected {}, got {}", kind, other.shape())),
    }
}

/// Refresh `state` from an API response.
///
/// Block fields are only refreshed when `ctx.import_table` is set or the
/// local state already declares the block. Every value is computed before
/// any is written, so on error `state` is unchanged.
pub fn refresh(
    descriptor: &ResourceDescriptor,
    object: &WireObject,
    state: &mut State,
    ctx: &MapContext,
) -> Result<()> {
    let mut staged = Vec::with_capacity(descriptor.fields.len());

    for field in descriptor.fields {
        if field.is_block() && !ctx.import_table && !state.is_set(field.name) {
            continue;
        }

        let wire = object.get(field.wire_name);
        match flatten(field, wire, state, field.name, ctx) {
            Ok(value) => staged.push((field.name, value)),
            Err(e @ Error::StateWrite { .. }) => match wire {
                Some(w) if api_patch(w) => {
                    warn!("{}: keeping prior value of {}: {}", descriptor.api_name, field.name, e);
                }
                _ => return Err(e),
            },
            Err(e) => return Err(e),
        }
    }

    debug!("Refreshed {} attributes of {}", staged.len(), descriptor.api_name);
    for (name, value) in staged {
        state.set(name, value);
    }
    Ok(())
}

/// Expand one state value into its wire representation.
///
/// `None` means the field is omitted from the request entirely.
pub fn expand(field: &Field, value: &StateValue, path: &str) -> Result<Option<WireValue>> {
    match (field.kind, value) {
        (_, StateValue::Null) => Ok(None),
        (Kind::Block(members), StateValue::Records(records)) => {
            // An empty leading record is how an empty block arrives from configuration.
            if records.first().map_or(true, State::is_empty) {
                return Ok(None);
            }
            let mut list = Vec::with_capacity(records.len());
            for (index, record) in records.iter().enumerate() {
                let mut object = WireObject::new();
                for member in members {
                    let Some(v) = record.get(member.name) else {
                        continue;
                    };
                    let child_path = member_path(path, index, member.name);
                    if let Some(w) = expand(member, v, &child_path)? {
                        object.insert(member.wire_name.to_string(), w);
                    }
                }
                list.push(WireValue::Map(object));
            }
            Ok(Some(WireValue::List(list)))
        }
        (Kind::Block(_), other) => Err(expand_error(
            path,
            format!("expected a list of records, got {}", other.shape()),
        )),
        (kind, StateValue::Scalar(scalar)) => {
            let matches = matches!(
                (kind, scalar),
                (Kind::String | Kind::Enum(_), Scalar::String(_))
                    | (Kind::Int, Scalar::Int(_))
                    | (Kind::Bool, Scalar::Bool(_))
            );
            if matches {
                Ok(Some(scalar.to_wire()))
            } else {
                Err(expand_error(path, format!("expected {}, got {}", kind, value.shape())))
            }
        }
        (kind, other) => Err(expand_error(path, format!("expected {}, got {}", kind, other.shape()))),
    }
}

/// Build the request body for `descriptor` from local state.
/// Unset fields are omitted so the API's own defaults apply.
pub fn get_object(descriptor: &ResourceDescriptor, state: &State) -> Result<WireObject> {
    let mut object = WireObject::new();
    for field in descriptor.fields {
        if !state.is_set(field.name) {
            continue;
        }
        let Some(value) = state.get(field.name) else {
            continue;
        };
        if let Some(wire) = expand(field, value, field.name)? {
            object.insert(field.wire_name.to_string(), wire);
        }
    }
    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTOM_FIELD_MEMBERS: &[Field] = &[
        Field::int("id", "id").range(0, 255),
        Field::string("name", "name").length(0, 35),
        Field::string("custom", "custom").length(0, 35),
    ];

    const SERVER_MEMBERS: &[Field] = &[
        Field::int("id", "id"),
        Field::string("server", "server"),
        Field::string("key", "key").optional().sensitive(),
        Field::int("key_id", "key-id"),
    ];

    static SYSLOG: ResourceDescriptor = ResourceDescriptor {
        type_name: "fortios_test_syslog",
        api_name: "TestSyslog",
        path: "test/syslog",
        singleton: true,
        mkey: None,
        description: "test",
        fields: &[
            Field::enumeration("status", "status", &["enable", "disable"]),
            Field::string("source_ip", "source-ip"),
            Field::int("port", "port"),
            Field::string("password", "password").optional().sensitive(),
            Field::block("custom_field_name", "custom-field-name", CUSTOM_FIELD_MEMBERS),
            Field::block("server", "server", SERVER_MEMBERS),
        ],
    };

    fn wire(json: serde_json::Value) -> WireObject {
        match WireValue::from(json) {
            WireValue::Map(m) => m,
            other => panic!("expected object, got {:?}", other),
        }
    }

    fn field(name: &str) -> &'static Field {
        SYSLOG.field(name).unwrap()
    }

    #[test]
    fn test_expand_translates_names() {
        let state = State::new().with("source_ip", "10.0.0.1").with("port", 514);
        let object = get_object(&SYSLOG, &state).unwrap();

        assert_eq!(object.get("source-ip"), Some(&WireValue::from("10.0.0.1")));
        assert_eq!(object.get("port"), Some(&WireValue::from(514)));
        assert!(object.get("source_ip").is_none());
    }

    #[test]
    fn test_flatten_translates_names() {
        let object = wire(serde_json::json!({"source-ip": "10.0.0.1"}));
        let mut state = State::new();
        refresh(&SYSLOG, &object, &mut state, &MapContext::default()).unwrap();

        assert_eq!(state.get_str("source_ip"), Some("10.0.0.1"));
    }

    #[test]
    fn test_expand_omits_unset_fields() {
        let state = State::new().with("status", "enable");
        let object = get_object(&SYSLOG, &state).unwrap();

        assert_eq!(object.len(), 1);
        assert!(!object.contains_key("port"));
        assert!(!object.contains_key("source-ip"));
    }

    #[test]
    fn test_expand_keeps_zero_values() {
        let state = State::new().with("port", 0).with("source_ip", "");
        let object = get_object(&SYSLOG, &state).unwrap();

        assert_eq!(object.get("port"), Some(&WireValue::from(0)));
        assert_eq!(object.get("source-ip"), Some(&WireValue::from("")));
    }

    #[test]
    fn test_expand_block_member_only_when_set() {
        let state = State::new().with(
            "custom_field_name",
            vec![State::new().with("id", 1).with("name", "user")],
        );
        let object = get_object(&SYSLOG, &state).unwrap();
        let records = object.get("custom-field-name").and_then(|v| v.as_list()).unwrap();

        let record = records[0].as_map().unwrap();
        assert_eq!(record.get("id"), Some(&WireValue::from(1)));
        assert_eq!(record.get("name"), Some(&WireValue::from("user")));
        assert!(!record.contains_key("custom"));
    }

    #[test]
    fn test_expand_empty_block_is_omitted() {
        let state = State::new().with("custom_field_name", Vec::<State>::new());
        let object = get_object(&SYSLOG, &state).unwrap();
        assert!(object.is_empty());

        let value = expand(field("custom_field_name"), &StateValue::Records(vec![]), "custom_field_name").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_expand_empty_first_record_is_omitted() {
        let state = State::new()
            .with("status", "enable")
            .with("custom_field_name", vec![State::new()]);
        let object = get_object(&SYSLOG, &state).unwrap();
        assert!(!object.contains_key("custom-field-name"));

        let records = StateValue::Records(vec![State::new(), State::new().with("id", 2)]);
        assert!(expand(field("custom_field_name"), &records, "custom_field_name").unwrap().is_none());
    }

    #[test]
    fn test_expand_shape_mismatch_fails() {
        let state = State::new().with("status", "enable").with("port", "not-a-number");
        let err = get_object(&SYSLOG, &state).unwrap_err();
        assert!(matches!(err, Error::Expand { ref field, .. } if field == "port"));
    }

    #[test]
    fn test_expand_nested_failure_names_member_path() {
        let state = State::new().with(
            "server",
            vec![State::new().with("id", 1), State::new().with("id", "two")],
        );
        let err = get_object(&SYSLOG, &state).unwrap_err();
        assert!(matches!(err, Error::Expand { ref field, .. } if field == "server.1.id"));
    }

    #[test]
    fn test_flatten_empty_block_normalizes() {
        let ctx = MapContext::import();
        let block = field("custom_field_name");
        let prior = State::new();

        for value in [
            None,
            Some(WireValue::Null),
            Some(WireValue::List(vec![])),
            Some(WireValue::List(vec![WireValue::Null])),
        ] {
            let flattened = flatten(block, value.as_ref(), &prior, "custom_field_name", &ctx).unwrap();
            assert_eq!(flattened, StateValue::Null);
        }
    }

    #[test]
    fn test_refresh_empty_block_clears_state() {
        let object = wire(serde_json::json!({"custom-field-name": [null]}));
        let mut state = State::new().with("custom_field_name", vec![State::new().with("id", 1)]);
        refresh(&SYSLOG, &object, &mut state, &MapContext::default()).unwrap();

        assert!(state.get("custom_field_name").is_none());
        assert_eq!(state, State::new());
    }

    #[test]
    fn test_flatten_sensitive_retains_prior() {
        let prior = State::new().with("password", "secret123");
        let flattened = flatten(
            field("password"),
            Some(&WireValue::from("")),
            &prior,
            "password",
            &MapContext::default(),
        )
        .unwrap();
        assert_eq!(flattened, StateValue::from("secret123"));
    }

    #[test]
    fn test_flatten_sensitive_without_prior_uses_wire() {
        let flattened = flatten(
            field("password"),
            Some(&WireValue::from("ENC xyz")),
            &State::new(),
            "password",
            &MapContext::default(),
        )
        .unwrap();
        assert_eq!(flattened, StateValue::from("ENC xyz"));
    }

    #[test]
    fn test_flatten_nested_sensitive_retains_prior() {
        let prior = State::new().with(
            "server",
            vec![
                State::new().with("id", 1).with("key", "secret123"),
                State::new().with("id", 2),
            ],
        );
        let object = wire(serde_json::json!({
            "server": [
                {"id": 1, "server": "a", "key": "", "key-id": 0},
                {"id": 2, "server": "b", "key-id": 0},
            ]
        }));
        let mut state = prior.clone();
        refresh(&SYSLOG, &object, &mut state, &MapContext::default()).unwrap();

        let records = state.records("server");
        assert_eq!(records[0].get_str("key"), Some("secret123"));
        assert!(records[1].get("key").is_none());
        assert_eq!(records[1].get_str("server"), Some("b"));
    }

    #[test]
    fn test_refresh_skips_undeclared_block() {
        let object = wire(serde_json::json!({
            "status": "enable",
            "custom-field-name": [{"id": 1, "name": "a", "custom": "b"}],
        }));

        let mut state = State::new();
        refresh(&SYSLOG, &object, &mut state, &MapContext::default()).unwrap();
        assert_eq!(state.get_str("status"), Some("enable"));
        assert!(state.get("custom_field_name").is_none());

        let mut state = State::new();
        refresh(&SYSLOG, &object, &mut state, &MapContext::import()).unwrap();
        assert_eq!(state.records("custom_field_name").len(), 1);
    }

    #[test]
    fn test_block_order_preserved() {
        let state = State::new().with(
            "custom_field_name",
            vec![
                State::new().with("id", 3).with("name", "c"),
                State::new().with("id", 1).with("name", "a"),
                State::new().with("id", 2).with("name", "b"),
            ],
        );
        let object = get_object(&SYSLOG, &state).unwrap();
        let ids: Vec<_> = object["custom-field-name"]
            .as_list()
            .unwrap()
            .iter()
            .map(|r| r.get("id").and_then(|v| v.as_i64()).unwrap())
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);

        let mut refreshed = State::new().with("custom_field_name", vec![State::new()]);
        refresh(&SYSLOG, &object, &mut refreshed, &MapContext::default()).unwrap();
        assert_eq!(refreshed, state);
    }

    #[test]
    fn test_round_trip() {
        let state = State::new()
            .with("status", "disable")
            .with("source_ip", "192.0.2.10")
            .with("port", 6514)
            .with(
                "custom_field_name",
                vec![State::new().with("id", 7).with("name", "n").with("custom", "c")],
            );
        let object = get_object(&SYSLOG, &state).unwrap();

        let mut flattened = State::new();
        refresh(&SYSLOG, &object, &mut flattened, &MapContext::import()).unwrap();
        assert_eq!(flattened, state);
    }

    #[test]
    fn test_refresh_tolerates_patched_values() {
        let object = wire(serde_json::json!({"status": "enable", "port": ""}));
        let mut state = State::new().with("port", 514);
        refresh(&SYSLOG, &object, &mut state, &MapContext::default()).unwrap();

        assert_eq!(state.get_i64("port"), Some(514));
        assert_eq!(state.get_str("status"), Some("enable"));
    }

    #[test]
    fn test_refresh_rejects_unpatched_values() {
        let object = wire(serde_json::json!({"status": "enable", "port": {"value": 1}}));
        let mut state = State::new().with("status", "disable");
        let err = refresh(&SYSLOG, &object, &mut state, &MapContext::default()).unwrap_err();

        assert!(matches!(err, Error::StateWrite { ref field, .. } if field == "port"));
        assert_eq!(state.get_str("status"), Some("disable"));
    }

    #[test]
    fn test_flatten_int_from_string() {
        let flattened = flatten(
            field("port"),
            Some(&WireValue::from("514")),
            &State::new(),
            "port",
            &MapContext::default(),
        )
        .unwrap();
        assert_eq!(flattened, StateValue::from(514));
    }

    #[test]
    fn test_api_patch() {
        assert!(api_patch(&WireValue::from("")));
        assert!(api_patch(&WireValue::from(0)));
        assert!(api_patch(&WireValue::List(vec![])));
        assert!(!api_patch(&WireValue::Null));
        assert!(!api_patch(&WireValue::Bool(true)));
        assert!(!api_patch(&WireValue::Map(WireObject::new())));
    }
}
