//! Configuration validation against resource descriptors

use fortiform_common::{Diagnostic, Scalar};

use crate::schema::{Constraint, Field, Kind, Mode, ResourceDescriptor};
use crate::state::{State, StateValue};

/// Validate a configured state. Block members are checked recursively and
/// diagnostics carry the dotted attribute path.
pub fn validate(descriptor: &ResourceDescriptor, state: &State) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    validate_fields(descriptor.fields, state, "", &mut diagnostics);
    diagnostics
}

/// Whether any diagnostic is an error
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

fn attribute_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn validate_fields(fields: &[Field], record: &State, prefix: &str, out: &mut Vec<Diagnostic>) {
    // Undeclared attributes are never sent, so they only warn.
    for (name, _) in record.iter() {
        if !fields.iter().any(|f| f.name == name) {
            out.push(Diagnostic::warning(
                attribute_path(prefix, name),
                "attribute is not part of the schema and is ignored",
            ));
        }
    }

    for field in fields {
        let path = attribute_path(prefix, field.name);

        match record.get(field.name).filter(|v| !v.is_null()) {
            None => {
                if field.mode == Mode::Required {
                    out.push(Diagnostic::error(path, "required attribute is not set"));
                }
            }
            Some(value) => {
                if field.mode == Mode::Computed {
                    out.push(Diagnostic::error(
                        path.clone(),
                        "attribute is computed and cannot be configured",
                    ));
                }
                validate_value(field, value, &path, out);
            }
        }
    }
}

fn validate_value(field: &Field, value: &StateValue, path: &str, out: &mut Vec<Diagnostic>) {
    match (field.kind, value) {
        (Kind::Block(members), StateValue::Records(records)) => {
            if records.is_empty() && field.mode == Mode::Required {
                out.push(Diagnostic::error(path, "at least one record is required"));
            }
            for (index, record) in records.iter().enumerate() {
                validate_fields(members, record, &format!("{}.{}", path, index), out);
            }
        }
        (Kind::Int, StateValue::Scalar(Scalar::Int(n))) => check_constraint(field, path, out, |c| match c {
            Constraint::IntRange { min, max } if *n < min || *n > max => {
                Some(format!("expected {} to be in the range ({} - {}), got {}", field.name, min, max, n))
            }
            _ => None,
        }),
        (Kind::String, StateValue::Scalar(Scalar::String(s))) => check_length(field, s, path, out),
        (Kind::Enum(allowed), StateValue::Scalar(Scalar::String(s))) => {
            if !allowed.iter().any(|a| *a == s.as_str()) {
                out.push(Diagnostic::error(
                    path,
                    format!("expected {} to be one of [{}], got {}", field.name, allowed.join(", "), s),
                ));
            }
            check_length(field, s, path, out);
        }
        (Kind::Bool, StateValue::Scalar(Scalar::Bool(_))) => {}
        (kind, other) => out.push(Diagnostic::error(
            path,
            format!("expected {}, got {}", kind, other.shape()),
        )),
    }
}

fn check_length(field: &Field, s: &str, path: &str, out: &mut Vec<Diagnostic>) {
    check_constraint(field, path, out, |c| match c {
        Constraint::Length { min, max } if s.len() < min || s.len() > max => Some(format!(
            "expected length of {} to be in the range ({} - {}), got {}",
            field.name,
            min,
            max,
            s.len()
        )),
        _ => None,
    })
}

fn check_constraint(
    field: &Field,
    path: &str,
    out: &mut Vec<Diagnostic>,
    check: impl FnOnce(Constraint) -> Option<String>,
) {
    if let Some(detail) = check(field.constraint) {
        out.push(Diagnostic::error(path, detail));
    }
}
