//! Rust source emission.
//!
//! Plans are turned into token streams with [`quote`], parsed back into a
//! [`syn::File`] and rendered with [`prettyplease`].

use super::plan::{EndpointPlan, ServicePlan};
use crate::constraint::ConstraintSet;
use crate::error::GenError;
use crate::schema::{FieldKind, ParameterField};
use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote};

/// Default path generated code reaches the runtime through.
pub const DEFAULT_RUNTIME_PATH: &str = "apigen::runtime";

const HEADER: &str = "\
// @generated by apigen. Do not edit by hand.
// Regenerate with `apigen <INPUT> <OUTPUT>`.

";

/// Knobs for the emitted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Path of the runtime module, e.g. `apigen::runtime`
    pub runtime_path: String,
    /// Emit `use super::*;` so the file can live in a child module of the
    /// declarations
    pub import_parent: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
            import_parent: true,
        }
    }
}

/// Render all service plans into one formatted Rust file.
pub fn emit_file(plans: &[ServicePlan], opts: &EmitOptions) -> Result<String, GenError> {
    let rt: syn::Path =
        syn::parse_str(&opts.runtime_path).map_err(|e| GenError::InvalidRuntimePath {
            path: opts.runtime_path.clone(),
            message: e.to_string(),
        })?;

    let mut items = Vec::with_capacity(plans.len() + 1);
    if opts.import_parent {
        items.push(quote! {
            #[allow(unused_imports)]
            use super::*;
        });
    }
    items.extend(plans.iter().map(|plan| emit_service(plan, &rt)));

    let tokens = quote! { #(#items)* };
    let file: syn::File = syn::parse2(tokens).map_err(|e| GenError::Emit {
        service: plans
            .iter()
            .map(|p| p.service.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        message: e.to_string(),
    })?;
    Ok(format!("{HEADER}{}", prettyplease::unparse(&file)))
}

/// Identifier for a declared name, raw when the name is a keyword.
fn rust_ident(name: &str) -> Ident {
    if syn::parse_str::<Ident>(name).is_ok() {
        format_ident!("{}", name)
    } else {
        Ident::new_raw(name, Span::call_site())
    }
}

fn emit_service(plan: &ServicePlan, rt: &syn::Path) -> TokenStream {
    let service = rust_ident(&plan.service);
    let endpoint_enum = rust_ident(&plan.endpoint_enum);
    let variants: Vec<_> = plan
        .endpoints
        .iter()
        .map(|e| rust_ident(&e.variant))
        .collect();
    let routes: Vec<_> = plan.endpoints.iter().map(|e| e.route.as_str()).collect();
    let handlers: Vec<_> = plan
        .endpoints
        .iter()
        .map(|e| rust_ident(&e.handler))
        .collect();
    let handler_fns = plan.endpoints.iter().map(|e| emit_handler(e, rt));
    let enum_doc = format!("Endpoints served by [`{}`].", plan.service);

    quote! {
        #[doc = #enum_doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum #endpoint_enum {
            #(#variants,)*
        }

        impl #endpoint_enum {
            pub const ALL: &'static [Self] = &[#(Self::#variants,)*];

            pub fn from_route(route: &str) -> Option<Self> {
                match route {
                    #(#routes => Some(Self::#variants),)*
                    _ => None,
                }
            }

            pub fn route(&self) -> &'static str {
                match self {
                    #(Self::#variants => #routes,)*
                }
            }
        }

        impl #service {
            /// Dispatch a request to the endpoint registered for its path.
            pub fn serve_http(
                &self,
                req: &#rt::ApiRequest,
                creds: &dyn #rt::CredentialValidator,
            ) -> #rt::ApiResponse {
                match #endpoint_enum::from_route(req.path()) {
                    #(Some(#endpoint_enum::#variants) => self.#handlers(req, creds),)*
                    None => #rt::ApiResponse::unknown_method(),
                }
            }

            #(#handler_fns)*
        }
    }
}

fn emit_handler(ep: &EndpointPlan, rt: &syn::Path) -> TokenStream {
    let handler = rust_ident(&ep.handler);
    let method = rust_ident(&ep.method);
    let name = ep.method.as_str();
    let verb = match ep.verb() {
        Some(v) => quote! { Some(#v) },
        None => quote! { None },
    };
    let auth = ep.requires_auth();

    let extract = if ep.record_found {
        let record = rust_ident(&ep.record);
        let inits: Vec<_> = ep.fields().map(|f| emit_field_init(f, rt)).collect();
        if inits.is_empty() {
            quote! { |_values| Ok(#record {}) }
        } else {
            quote! { |values| Ok(#record { #(#inits,)* }) }
        }
    } else {
        quote! { |_values| Ok(Default::default()) }
    };

    let ctx_arg = if ep.context_by_ref {
        quote! { &ctx }
    } else {
        quote! { ctx }
    };
    let params_arg = if ep.record_by_ref {
        quote! { &params }
    } else {
        quote! { params }
    };

    quote! {
        fn #handler(
            &self,
            req: &#rt::ApiRequest,
            creds: &dyn #rt::CredentialValidator,
        ) -> #rt::ApiResponse {
            #rt::serve_endpoint(
                req,
                creds,
                &#rt::EndpointGuard {
                    name: #name,
                    verb: #verb,
                    auth: #auth,
                },
                #extract,
                |ctx, params| self.#method(#ctx_arg, #params_arg),
            )
        }
    }
}

fn emit_field_init(field: &ParameterField, rt: &syn::Path) -> TokenStream {
    let ident = rust_ident(&field.name);
    let name = field.name.as_str();
    let constraints = emit_constraints(&field.constraints, rt);
    match field.kind {
        FieldKind::String => quote! {
            #ident: #rt::validate_str(#name, &#constraints, values)?
        },
        FieldKind::Integer => {
            let ty = format_ident!("{}", field.type_name);
            quote! {
                #ident: #rt::validate_int::<#ty>(#name, &#constraints, values)?
            }
        }
    }
}

fn opt_string(value: Option<&str>) -> TokenStream {
    match value {
        Some(v) => quote! { Some(#v.to_string()) },
        None => quote! { None },
    }
}

fn opt_int(value: Option<i64>) -> TokenStream {
    match value {
        Some(v) => quote! { Some(#v) },
        None => quote! { None },
    }
}

fn emit_constraints(set: &ConstraintSet, rt: &syn::Path) -> TokenStream {
    if set.is_unconstrained() {
        return quote! { #rt::ConstraintSet::default() };
    }
    let required = set.required;
    let min = opt_int(set.min);
    let max = opt_int(set.max);
    let param_name = opt_string(set.param_name.as_deref());
    let default = opt_string(set.default.as_deref());
    let enumeration = match &set.enumeration {
        Some(e) => {
            let values = &e.values;
            let enum_default = opt_string(e.default.as_deref());
            quote! {
                Some(#rt::EnumConstraint {
                    values: vec![#(#values.to_string()),*],
                    default: #enum_default,
                })
            }
        }
        None => quote! { None },
    };
    quote! {
        #rt::ConstraintSet {
            required: #required,
            min: #min,
            max: #max,
            param_name: #param_name,
            enumeration: #enumeration,
            default: #default,
        }
    }
}
