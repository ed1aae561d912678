//! Resource Schema Descriptors
//!
//! Every resource is described by a static table of [`Field`]s. The mapper,
//! the validator and the lifecycle controller are all driven by these tables.

/// Mutability class of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Required,
    Optional,
    Computed,
    OptionalComputed,
}

/// Value kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    Int,
    Bool,
    /// A string restricted to a fixed set of values
    Enum(&'static [&'static str]),
    /// An ordered list of records described by a nested field table
    Block(&'static [Field]),
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::String => write!(f, "string"),
            Kind::Int => write!(f, "integer"),
            Kind::Bool => write!(f, "boolean"),
            Kind::Enum(_) => write!(f, "enumerated string"),
            Kind::Block(_) => write!(f, "list of records"),
        }
    }
}

/// Value constraint checked during validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    None,
    IntRange { min: i64, max: i64 },
    Length { min: usize, max: usize },
}

/// Descriptor of one configuration field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Local (underscored) name
    pub name: &'static str,
    /// Wire (hyphenated) name
    pub wire_name: &'static str,
    pub kind: Kind,
    pub constraint: Constraint,
    pub mode: Mode,
    /// The API does not echo the real value back
    pub sensitive: bool,
}

impl Field {
    const fn new(name: &'static str, wire_name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            wire_name,
            kind,
            constraint: Constraint::None,
            mode: Mode::OptionalComputed,
            sensitive: false,
        }
    }

    pub const fn string(name: &'static str, wire_name: &'static str) -> Self {
        Self::new(name, wire_name, Kind::String)
    }

    pub const fn int(name: &'static str, wire_name: &'static str) -> Self {
        Self::new(name, wire_name, Kind::Int)
    }

    pub const fn boolean(name: &'static str, wire_name: &'static str) -> Self {
        Self::new(name, wire_name, Kind::Bool)
    }

    pub const fn enumeration(
        name: &'static str,
        wire_name: &'static str,
        values: &'static [&'static str],
    ) -> Self {
        Self::new(name, wire_name, Kind::Enum(values))
    }

    /// Blocks default to plain optional: they are only refreshed when declared
    pub const fn block(name: &'static str, wire_name: &'static str, members: &'static [Field]) -> Self {
        Self {
            mode: Mode::Optional,
            ..Self::new(name, wire_name, Kind::Block(members))
        }
    }

    pub const fn required(self) -> Self {
        Self { mode: Mode::Required, ..self }
    }

    pub const fn optional(self) -> Self {
        Self { mode: Mode::Optional, ..self }
    }

    pub const fn computed(self) -> Self {
        Self { mode: Mode::Computed, ..self }
    }

    pub const fn sensitive(self) -> Self {
        Self { sensitive: true, ..self }
    }

    pub const fn range(self, min: i64, max: i64) -> Self {
        Self {
            constraint: Constraint::IntRange { min, max },
            ..self
        }
    }

    pub const fn length(self, min: usize, max: usize) -> Self {
        Self {
            constraint: Constraint::Length { min, max },
            ..self
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self.kind, Kind::Block(_))
    }

    /// Member table of a block field
    pub fn members(&self) -> Option<&'static [Field]> {
        match self.kind {
            Kind::Block(members) => Some(members),
            _ => None,
        }
    }
}

/// Descriptor of one resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Terraform type name, e.g. `fortios_system_ntp`
    pub type_name: &'static str,
    /// API object name; doubles as the synthetic identifier when the API
    /// returns no mkey
    pub api_name: &'static str,
    /// REST path below the cmdb root, e.g. `system/ntp`
    pub path: &'static str,
    /// Settings objects exist exactly once and have no real create
    pub singleton: bool,
    /// Wire name of the field the API uses as mkey, if any
    pub mkey: Option<&'static str>,
    pub description: &'static str,
    pub fields: &'static [Field],
}

impl ResourceDescriptor {
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}
