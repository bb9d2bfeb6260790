use super::directive::{attr_named, find_directive, Found};
use super::types::{
    Endpoint, FieldKind, ParameterField, ParameterRecord, Schema, ServiceDeclaration,
};
use crate::constraint::{ConstraintSet, ParseMode};
use crate::error::GenError;
use quote::ToTokens;
use syn::ext::IdentExt;
use syn::{Fields, FnArg, ImplItem, ImplItemFn, Item, ItemImpl, ItemStruct, LitStr, Type};
use tracing::{debug, warn};

/// Naming conventions and parse mode used while scanning a source file.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Constraint parse mode
    pub mode: ParseMode,
    /// Attribute carrying a structured directive (`#[apigen(...)]`)
    pub directive_attr: String,
    /// Doc-comment marker introducing a legacy JSON directive
    pub directive_marker: String,
    /// Field attribute carrying a constraint expression
    pub validator_attr: String,
    /// Substring that marks a struct as a parameter record
    pub record_marker: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            mode: ParseMode::Permissive,
            directive_attr: "apigen".to_string(),
            directive_marker: "apigen:api".to_string(),
            validator_attr: "apivalidator".to_string(),
            record_marker: "Params".to_string(),
        }
    }
}

/// Parse Rust source text and extract its schema.
///
/// A syntax error anywhere in the source aborts extraction.
pub fn extract_schema(source: &str, opts: &ExtractOptions) -> Result<Schema, GenError> {
    let file = syn::parse_file(source)?;
    extract_from_file(&file, opts)
}

/// Extract a schema from an already parsed file.
pub fn extract_from_file(file: &syn::File, opts: &ExtractOptions) -> Result<Schema, GenError> {
    let mut schema = Schema::default();

    for item in &file.items {
        match item {
            Item::Struct(s) if s.ident.to_string().contains(&opts.record_marker) => {
                let record = scan_record(s, opts)?;
                debug!(record = %record.name, fields = record.fields.len(), "discovered parameter record");
                schema.records.push(record);
            }
            Item::Impl(imp) => scan_impl(imp, opts, &mut schema)?,
            _ => {}
        }
    }

    Ok(schema)
}

fn scan_record(s: &ItemStruct, opts: &ExtractOptions) -> Result<ParameterRecord, GenError> {
    let record = s.ident.unraw().to_string();
    let named = match &s.fields {
        Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
        Fields::Unit => Vec::new(),
        Fields::Unnamed(_) => return Err(GenError::UnsupportedRecordShape { record }),
    };

    let mut fields = Vec::with_capacity(named.len());
    for field in named {
        let Some(ident) = &field.ident else { continue };
        // `r#type` is read from the `type` parameter
        let name = ident.unraw().to_string();
        let type_name = field_type_name(&field.ty).unwrap_or_default();
        let kind = FieldKind::from_type_name(&type_name).ok_or_else(|| {
            GenError::UnsupportedFieldType {
                record: record.clone(),
                field: name.clone(),
                ty: field.ty.to_token_stream().to_string(),
            }
        })?;

        let expression = match field.attrs.iter().find(|a| attr_named(a, &opts.validator_attr)) {
            Some(attr) => attr.parse_args::<LitStr>()?.value(),
            None => String::new(),
        };
        let constraints = ConstraintSet::parse_with(&expression, opts.mode).map_err(|source| {
            GenError::Constraint {
                record: record.clone(),
                field: name.clone(),
                source,
            }
        })?;

        fields.push(ParameterField {
            name,
            kind,
            type_name,
            expression,
            constraints,
        });
    }

    Ok(ParameterRecord { name: record, fields })
}

fn scan_impl(imp: &ItemImpl, opts: &ExtractOptions, schema: &mut Schema) -> Result<(), GenError> {
    if imp.trait_.is_some() {
        return Ok(());
    }
    let Some(service) = type_ident(&imp.self_ty) else {
        return Ok(());
    };

    for item in &imp.items {
        let ImplItem::Fn(method) = item else { continue };
        let Some(endpoint) = scan_method(&service, method, opts)? else {
            continue;
        };
        if !imp.generics.params.is_empty() {
            warn!(%service, method = %endpoint.name, "skipping endpoint on generic impl");
            continue;
        }
        push_endpoint(schema, &service, endpoint);
    }
    Ok(())
}

fn push_endpoint(schema: &mut Schema, service: &str, endpoint: Endpoint) {
    match schema.services.iter_mut().find(|s| s.name == service) {
        Some(existing) => existing.endpoints.push(endpoint),
        None => schema.services.push(ServiceDeclaration {
            name: service.to_string(),
            endpoints: vec![endpoint],
        }),
    }
}

fn scan_method(
    service: &str,
    method: &ImplItemFn,
    opts: &ExtractOptions,
) -> Result<Option<Endpoint>, GenError> {
    let name = method.sig.ident.unraw().to_string();
    let directive = match find_directive(&method.attrs, &opts.directive_attr, &opts.directive_marker) {
        Found::Directive(d, source) => {
            debug!(%service, method = %name, ?source, url = %d.url, "found directive");
            d
        }
        Found::Malformed(reason) => {
            return Err(GenError::InvalidDirective {
                service: service.to_string(),
                method: name,
                reason,
            })
        }
        Found::None => return Ok(None),
    };

    if method.sig.receiver().is_none() {
        warn!(%service, method = %name, "directive on a method without a receiver is ignored");
        return Ok(None);
    }

    if let Some(verb) = &directive.method {
        if http::Method::from_bytes(verb.as_bytes()).is_err() {
            return Err(GenError::InvalidVerb {
                service: service.to_string(),
                method: name,
                verb: verb.clone(),
            });
        }
    }

    let typed: Vec<&Type> = method
        .sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(pat) => Some(pat.ty.as_ref()),
            FnArg::Receiver(_) => None,
        })
        .collect();

    let (Some(context_ty), Some(record_ty)) = (typed.first(), typed.get(1)) else {
        return Err(GenError::InvalidRecordArgument {
            service: service.to_string(),
            method: name,
            reason: "takes no parameter record as its second argument".to_string(),
        });
    };
    let Some(record) = type_ident(record_ty) else {
        return Err(GenError::InvalidRecordArgument {
            service: service.to_string(),
            method: name,
            reason: format!(
                "its record argument `{}` is not a named type",
                record_ty.to_token_stream()
            ),
        });
    };

    Ok(Some(Endpoint {
        name,
        directive,
        record,
        record_by_ref: is_reference(record_ty),
        context_by_ref: is_reference(context_ty),
    }))
}

fn is_reference(ty: &Type) -> bool {
    matches!(ty, Type::Reference(_))
}

/// Plain path type without generics, e.g. `String` or `std::string::String`.
fn field_type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(p) if p.qself.is_none() => p
            .path
            .segments
            .last()
            .filter(|s| s.arguments.is_none())
            .map(|s| s.ident.to_string()),
        _ => None,
    }
}

/// Last path segment of a type, looking through references and parens.
fn type_ident(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(p) if p.qself.is_none() => {
            p.path.segments.last().map(|s| s.ident.unraw().to_string())
        }
        Type::Reference(r) => type_ident(&r.elem),
        Type::Paren(p) => type_ident(&p.elem),
        Type::Group(g) => type_ident(&g.elem),
        _ => None,
    }
}
