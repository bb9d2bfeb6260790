//! Directive extraction from method attributes.
//!
//! Two forms are accepted:
//!
//! ```rust,ignore
//! #[apigen(url = "/user/create", auth = true, method = "POST")]
//! fn create(&self, ctx: &RequestContext, params: CreateParams) -> Result<User, ApiError>;
//!
//! /// apigen:api {"url": "/user/create", "auth": true, "method": "POST"}
//! fn create(&self, ctx: &RequestContext, params: CreateParams) -> Result<User, ApiError>;
//! ```
//!
//! The attribute wins when both are present.

use super::types::Directive;
use syn::{Attribute, Expr, ExprLit, Lit, LitBool, LitStr, Meta};

/// Where a directive came from, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveSource {
    Attribute,
    DocComment,
}

/// Outcome of looking for a directive on one method.
#[derive(Debug)]
pub enum Found {
    Directive(Directive, DirectiveSource),
    Malformed(String),
    None,
}

/// True if the attribute's last path segment is `name`.
pub(crate) fn attr_named(attr: &Attribute, name: &str) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|seg| seg.ident == name)
}

/// Find the directive on a method's attributes.
pub fn find_directive(attrs: &[Attribute], attr_name: &str, doc_marker: &str) -> Found {
    if let Some(attr) = attrs.iter().find(|a| attr_named(a, attr_name)) {
        return match parse_directive_attr(attr) {
            Ok(d) => Found::Directive(d.normalized(), DirectiveSource::Attribute),
            Err(err) => Found::Malformed(err.to_string()),
        };
    }

    for line in doc_lines(attrs) {
        if !line.contains(doc_marker) {
            continue;
        }
        let Some(block) = first_balanced_block(&line) else {
            tracing::debug!(line = %line.trim(), "directive marker without a brace block");
            return Found::None;
        };
        return match serde_json::from_str::<Directive>(block) {
            Ok(d) => Found::Directive(d.normalized(), DirectiveSource::DocComment),
            Err(err) => Found::Malformed(format!("{err} in `{block}`")),
        };
    }
    Found::None
}

/// Parse `#[apigen(url = "...", auth = true, method = "...")]`.
///
/// `#[apigen]` with no arguments is an endpoint on route `""` accepting any
/// verb. A bare `auth` flag means `auth = true`.
pub fn parse_directive_attr(attr: &Attribute) -> syn::Result<Directive> {
    let mut directive = Directive::default();
    if matches!(attr.meta, Meta::Path(_)) {
        return Ok(directive);
    }
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("url") {
            let s: LitStr = meta.value()?.parse()?;
            directive.url = s.value();
        } else if meta.path.is_ident("auth") {
            directive.auth = if meta.input.peek(syn::Token![=]) {
                let b: LitBool = meta.value()?.parse()?;
                b.value
            } else {
                true
            };
        } else if meta.path.is_ident("method") {
            let s: LitStr = meta.value()?.parse()?;
            directive.method = Some(s.value());
        } else {
            return Err(meta.error("expected `url`, `auth` or `method`"));
        }
        Ok(())
    })?;
    Ok(directive)
}

fn doc_lines(attrs: &[Attribute]) -> impl Iterator<Item = String> + '_ {
    attrs.iter().filter_map(|attr| match &attr.meta {
        Meta::NameValue(nv) if nv.path.is_ident("doc") => match &nv.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }) => Some(s.value()),
            _ => None,
        },
        _ => None,
    })
}

/// First `{ ... }` block with balanced braces, ignoring braces inside JSON
/// strings.
pub fn first_balanced_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}
