//! # Constraint Module
//!
//! Parses per-field constraint expressions into a [`ConstraintSet`].
//!
//! ## Grammar
//!
//! An expression is a comma-separated list of tokens. Each token is either a
//! bare keyword or a `key=value` pair:
//!
//! | Token              | Effect                                         |
//! |--------------------|------------------------------------------------|
//! | `required`         | value must be present and non-empty            |
//! | `min=<int>`        | lower bound (length for strings, value for ints)|
//! | `max=<int>`        | upper bound                                    |
//! | `paramname=<name>` | external lookup key                            |
//! | `enum=<a\|b\|c>`   | allowed values, declared order kept            |
//! | `default=<value>`  | enum default if an enum is declared, else standalone |
//!
//! Token order does not matter: `default=user,enum=user|admin` and
//! `enum=user|admin,default=user` produce the same set.
//!
//! ## Parse Modes
//!
//! [`ParseMode::Permissive`] ignores tokens it does not understand, which is
//! what existing declarations rely on. [`ParseMode::Strict`] turns them into
//! [`ConstraintError`]s at generation time.
//!
//! ```rust
//! use apigen::constraint::ConstraintSet;
//!
//! let set = ConstraintSet::parse("required,min=10");
//! assert!(set.required);
//! assert_eq!(set.min, Some(10));
//! ```

mod parse;


use serde::{Deserialize, Serialize};
use std::borrow::Cow;

pub use parse::{classify_token, unrecognized_tokens, ConstraintError, ParseMode, Token};

/// Allowed values for an enumerated field plus the value used when the
/// input is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumConstraint {
    /// Allowed values in declaration order
    pub values: Vec<String>,
    /// Value substituted for empty input
    pub default: Option<String>,
}

impl EnumConstraint {
    /// Whether `value` is one of the allowed values.
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// Parsed validation rules for one parameter field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintSet {
    /// Reject empty or absent values
    pub required: bool,
    /// Lower bound
    pub min: Option<i64>,
    /// Upper bound
    pub max: Option<i64>,
    /// External key used to look the value up (`paramname=`)
    pub param_name: Option<String>,
    /// Enumerated values (`enum=`), carrying the enum default
    pub enumeration: Option<EnumConstraint>,
    /// Standalone default, only set when no enum is declared
    pub default: Option<String>,
}

impl ConstraintSet {
    /// Parse an expression in permissive mode.
    ///
    /// Unknown tokens are skipped, so this never fails.
    pub fn parse(expr: &str) -> Self {
        parse::parse_tokens(expr, ParseMode::Permissive).unwrap_or_default()
    }

    /// Parse an expression with an explicit [`ParseMode`].
    pub fn parse_with(expr: &str, mode: ParseMode) -> Result<Self, ConstraintError> {
        parse::parse_tokens(expr, mode)
    }

    /// Key used to look the field up in the raw parameter map.
    ///
    /// `paramname=` wins; otherwise the field name lower-cased.
    pub fn lookup_key<'a>(&'a self, field_name: &str) -> Cow<'a, str> {
        match &self.param_name {
            Some(name) => Cow::Borrowed(name.as_str()),
            None => Cow::Owned(field_name.to_lowercase()),
        }
    }

    /// Value to use for an empty input, from either default form.
    pub fn fallback(&self) -> Option<&str> {
        self.default.as_deref().or_else(|| {
            self.enumeration
                .as_ref()
                .and_then(|e| e.default.as_deref())
        })
    }

    /// True when the expression declared nothing.
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }
}
