use crate::constraint::ConstraintSet;
use serde::{Deserialize, Serialize};

/// Semantic kind of a parameter field.
///
/// Selects the comparison `min`/`max` apply: byte length for strings,
/// numeric value for integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Integer,
}

impl FieldKind {
    /// Integer types a field may be declared with.
    pub const INTEGER_TYPES: [&'static str; 7] = ["i8", "i16", "i32", "i64", "u8", "u16", "u32"];

    /// Map a declared Rust type name to a kind.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "String" => Some(FieldKind::String),
            n if Self::INTEGER_TYPES.contains(&n) => Some(FieldKind::Integer),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::String => write!(f, "string"),
            FieldKind::Integer => write!(f, "integer"),
        }
    }
}

/// Route, verb and auth requirement attached to one endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    /// Route the endpoint is dispatched on
    #[serde(default)]
    pub url: String,
    /// Whether the credential check runs before validation
    #[serde(default)]
    pub auth: bool,
    /// Required HTTP verb; `None` accepts any verb
    #[serde(default)]
    pub method: Option<String>,
}

impl Directive {
    /// Drop an empty verb and upper-case the rest.
    pub(crate) fn normalized(mut self) -> Self {
        self.method = self
            .method
            .map(|m| m.trim().to_ascii_uppercase())
            .filter(|m| !m.is_empty());
        self
    }
}

/// One input field of a parameter record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterField {
    /// Field identifier as declared
    pub name: String,
    pub kind: FieldKind,
    /// Declared Rust type (`String`, `i32`, ...)
    pub type_name: String,
    /// Raw constraint expression, empty when the field carries none
    pub expression: String,
    pub constraints: ConstraintSet,
}

impl ParameterField {
    /// Key the field is read from in the raw parameter map.
    pub fn lookup_key(&self) -> String {
        self.constraints.lookup_key(&self.name).into_owned()
    }
}

/// Named input shape of an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterRecord {
    pub name: String,
    pub fields: Vec<ParameterField>,
}

/// One exposed service method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Method identifier
    pub name: String,
    pub directive: Directive,
    /// Type name of the method's parameter record argument
    pub record: String,
    /// Record argument is taken as `&Record`
    pub record_by_ref: bool,
    /// Context argument is taken as `&RequestContext`
    pub context_by_ref: bool,
}

/// A receiver type grouping endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDeclaration {
    pub name: String,
    pub endpoints: Vec<Endpoint>,
}

/// Everything extracted from one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Services in declaration order
    pub services: Vec<ServiceDeclaration>,
    /// Discovered parameter records in declaration order
    pub records: Vec<ParameterRecord>,
}

impl Schema {
    /// Look a record up by type name.
    pub fn record(&self, name: &str) -> Option<&ParameterRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Look a service up by name.
    pub fn service(&self, name: &str) -> Option<&ServiceDeclaration> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Total number of endpoints across all services.
    pub fn endpoint_count(&self) -> usize {
        self.services.iter().map(|s| s.endpoints.len()).sum()
    }
}
