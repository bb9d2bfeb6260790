use super::{ConstraintSet, EnumConstraint};
use thiserror::Error;
use tracing::debug;

/// How to treat tokens the grammar does not recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Skip unknown tokens and malformed bounds
    #[default]
    Permissive,
    /// Reject unknown tokens and malformed bounds
    Strict,
}

/// Errors raised by [`ParseMode::Strict`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    #[error("unknown constraint token `{token}`")]
    UnknownToken { token: String },
    #[error("constraint `{key}` expects an integer, got `{value}`")]
    InvalidInteger { key: String, value: String },
}

/// One classified token of a constraint expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Required,
    Min(Result<i64, &'a str>),
    Max(Result<i64, &'a str>),
    ParamName(&'a str),
    Enum(Vec<&'a str>),
    Default(&'a str),
    Unknown(&'a str),
}

/// Classify a single trimmed, non-empty token.
pub fn classify_token(token: &str) -> Token<'_> {
    if token == "required" {
        return Token::Required;
    }
    let Some((key, value)) = token.split_once('=') else {
        return Token::Unknown(token);
    };
    match key {
        "min" => Token::Min(value.parse().map_err(|_| value)),
        "max" => Token::Max(value.parse().map_err(|_| value)),
        "paramname" => Token::ParamName(value),
        "enum" => Token::Enum(value.split('|').collect()),
        "default" => Token::Default(value),
        _ => Token::Unknown(token),
    }
}

fn tokens(expr: &str) -> impl Iterator<Item = &str> {
    expr.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// Tokens that permissive parsing would silently drop.
pub fn unrecognized_tokens(expr: &str) -> Vec<String> {
    tokens(expr)
        .filter(|t| {
            matches!(
                classify_token(t),
                Token::Unknown(_) | Token::Min(Err(_)) | Token::Max(Err(_))
            )
        })
        .map(str::to_string)
        .collect()
}

fn bound(key: &str, parsed: Result<i64, &str>, mode: ParseMode) -> Result<Option<i64>, ConstraintError> {
    match (parsed, mode) {
        (Ok(n), _) => Ok(Some(n)),
        (Err(value), ParseMode::Strict) => Err(ConstraintError::InvalidInteger {
            key: key.to_string(),
            value: value.to_string(),
        }),
        (Err(value), ParseMode::Permissive) => {
            debug!(key, value, "ignoring non-integer bound");
            Ok(None)
        }
    }
}

pub(super) fn parse_tokens(expr: &str, mode: ParseMode) -> Result<ConstraintSet, ConstraintError> {
    let mut set = ConstraintSet::default();
    let mut enum_values: Option<Vec<String>> = None;
    let mut default: Option<String> = None;

    for token in tokens(expr) {
        match classify_token(token) {
            Token::Required => set.required = true,
            Token::Min(parsed) => {
                if let Some(n) = bound("min", parsed, mode)? {
                    set.min = Some(n);
                }
            }
            Token::Max(parsed) => {
                if let Some(n) = bound("max", parsed, mode)? {
                    set.max = Some(n);
                }
            }
            Token::ParamName(name) => set.param_name = Some(name.to_string()),
            Token::Enum(values) => {
                enum_values = Some(values.into_iter().map(str::to_string).collect())
            }
            Token::Default(value) => default = Some(value.to_string()),
            Token::Unknown(token) => match mode {
                ParseMode::Strict => {
                    return Err(ConstraintError::UnknownToken {
                        token: token.to_string(),
                    })
                }
                ParseMode::Permissive => debug!(token, "ignoring unknown constraint token"),
            },
        }
    }

    // default attaches to the enum wherever the enum was declared
    match enum_values {
        Some(values) => set.enumeration = Some(EnumConstraint { values, default }),
        None => set.default = default,
    }
    Ok(set)
}
