//! The `@canAccess` field directive.
//!
//! Gates are attached declaratively to field definitions, either in code next
//! to the schema or from configuration files, and validated as the schema is
//! built. A misconfigured attachment fails the build; it never turns into an
//! unprotected field at request time.

use rootcause::Report;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::ConfigurationError;
use crate::gate::AccessGate;

/// Name of the directive.
pub const DIRECTIVE_NAME: &str = "canAccess";

/// Name of the directive's role argument.
pub const REQUIRED_ROLE_ARGUMENT: &str = "requiredRole";

/// SDL definition of the directive.
pub const CAN_ACCESS_DEFINITION: &str = r#""""
Limit field access to users of a certain role.
"""
directive @canAccess(
  """
  The name of the role authorized users need to have.
  """
  requiredRole: String!
) on FIELD_DEFINITION"#;

/// Identifies a field as `Type.field`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldCoordinate {
    type_name: String,
    field_name: String,
}

impl FieldCoordinate {
    /// Creates a coordinate from its parts.
    #[must_use]
    pub fn new(type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            field_name: field_name.into(),
        }
    }

    /// Returns the parent type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the field name.
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }
}

impl fmt::Display for FieldCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.field_name)
    }
}

impl FromStr for FieldCoordinate {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigurationError::InvalidFieldCoordinate {
            input: s.to_string(),
        };
        let (type_name, field_name) = s.split_once('.').ok_or_else(invalid)?;
        if type_name.is_empty() || field_name.is_empty() || field_name.contains('.') {
            return Err(invalid());
        }
        Ok(Self::new(type_name, field_name))
    }
}

impl<'de> Deserialize<'de> for FieldCoordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One `@canAccess` attachment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CanAccess {
    /// The field the directive is attached to.
    pub field: FieldCoordinate,
    /// The `requiredRole` argument, if supplied.
    #[serde(default, rename = "requiredRole", alias = "required_role")]
    pub required_role: Option<String>,
}

impl CanAccess {
    /// Creates an attachment requiring `required_role` on `field`.
    #[must_use]
    pub fn new(field: FieldCoordinate, required_role: impl Into<String>) -> Self {
        Self {
            field,
            required_role: Some(required_role.into()),
        }
    }
}

/// Gates bound to schema fields.
#[derive(Debug, Clone, Default)]
pub struct FieldGates {
    gates: HashMap<FieldCoordinate, AccessGate>,
}

impl FieldGates {
    /// Starts binding gates.
    #[must_use]
    pub fn builder() -> FieldGatesBuilder {
        FieldGatesBuilder::default()
    }

    /// Returns the gate attached to `type_name.field_name`, if any.
    #[must_use]
    pub fn gate(&self, type_name: &str, field_name: &str) -> Option<&AccessGate> {
        self.gates.get(&FieldCoordinate::new(type_name, field_name))
    }

    /// Returns the number of gated fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Returns true if no field is gated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

/// Binds gates to fields, validating each attachment as it is made.
#[derive(Debug, Default)]
pub struct FieldGatesBuilder {
    gates: HashMap<FieldCoordinate, AccessGate>,
}

impl FieldGatesBuilder {
    /// Attaches a gate requiring `required_role` to `field`.
    ///
    /// # Errors
    ///
    /// `AtField` wrapping the configuration failure if the role is missing
    /// or empty, and `DuplicateAttachment` if the field is already gated.
    pub fn attach(
        mut self,
        field: FieldCoordinate,
        required_role: Option<&str>,
    ) -> Result<Self, Report<ConfigurationError>> {
        if self.gates.contains_key(&field) {
            return Err(ConfigurationError::DuplicateAttachment {
                field: field.to_string(),
            }
            .into());
        }
        let gate = AccessGate::configure(required_role)
            .map_err(|e| e.current_context().clone().at_field(&field))?;
        debug!(field = %field, required_role = %gate.required_role(), "gate attached");
        self.gates.insert(field, gate);
        Ok(self)
    }

    /// Attaches every declaration, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// See [`attach`](Self::attach).
    pub fn attach_all<I>(self, declarations: I) -> Result<Self, Report<ConfigurationError>>
    where
        I: IntoIterator<Item = CanAccess>,
    {
        declarations.into_iter().try_fold(self, |builder, decl| {
            builder.attach(decl.field, decl.required_role.as_deref())
        })
    }

    /// Finishes binding.
    #[must_use]
    pub fn build(self) -> FieldGates {
        FieldGates { gates: self.gates }
    }
}
