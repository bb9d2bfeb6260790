//! Marker macros for apigen declarations.
//!
//! Both macros leave the annotated code unchanged. They exist so that source
//! files read by the `apigen` generator also compile, and they reject
//! malformed arguments at compile time instead of at generation time.
//!
//! ```rust,ignore
//! use apigen_macros::{apigen, ApiParams};
//!
//! impl MyApi {
//!     #[apigen(url = "/user/create", auth, method = "POST")]
//!     pub fn create(&self, ctx: &RequestContext, params: CreateParams) -> Result<User, String> {
//!         // ...
//!     }
//! }
//!
//! #[derive(ApiParams)]
//! pub struct CreateParams {
//!     #[apivalidator("required,min=10")]
//!     pub login: String,
//! }
//! ```

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitBool, LitStr};

const INTEGER_TYPES: [&str; 7] = ["i8", "i16", "i32", "i64", "u8", "u16", "u32"];

fn is_http_token(verb: &str) -> bool {
    !verb.is_empty()
        && verb
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

/// Parse `url = "..", auth [= bool], method = ".."`.
fn check_directive(attr: TokenStream) -> syn::Result<()> {
    let mut url = None;
    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("url") {
            let lit: LitStr = meta.value()?.parse()?;
            url = Some(lit);
            Ok(())
        } else if meta.path.is_ident("auth") {
            if meta.input.peek(syn::Token![=]) {
                let _: LitBool = meta.value()?.parse()?;
            }
            Ok(())
        } else if meta.path.is_ident("method") {
            let lit: LitStr = meta.value()?.parse()?;
            let verb = lit.value();
            if !verb.trim().is_empty() && !is_http_token(verb.trim()) {
                return Err(syn::Error::new(
                    lit.span(),
                    format!("`{verb}` is not a valid HTTP method"),
                ));
            }
            Ok(())
        } else {
            Err(meta.error("expected `url`, `auth` or `method`"))
        }
    });
    syn::parse::Parser::parse(parser, attr)?;
    match url {
        Some(_) => Ok(()),
        None => Err(syn::Error::new(
            proc_macro2::Span::call_site(),
            "missing `url = \"...\"`",
        )),
    }
}

/// Mark a service method as an HTTP endpoint.
#[proc_macro_attribute]
pub fn apigen(attr: TokenStream, item: TokenStream) -> TokenStream {
    match check_directive(attr) {
        Ok(()) => item,
        Err(e) => {
            let err = e.to_compile_error();
            let item = proc_macro2::TokenStream::from(item);
            quote!(#err #item).into()
        }
    }
}

fn check_record(input: &DeriveInput) -> syn::Result<()> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "ApiParams can only be derived for structs",
        ));
    };
    let named = match &data.fields {
        Fields::Named(named) => &named.named,
        Fields::Unit => return Ok(()),
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "parameter records must use named fields",
            ))
        }
    };
    for field in named {
        let ty = &field.ty;
        let supported = match ty {
            syn::Type::Path(p) if p.qself.is_none() => p
                .path
                .get_ident()
                .map(|id| id == "String" || INTEGER_TYPES.iter().any(|t| id == t))
                .unwrap_or(false),
            _ => false,
        };
        if !supported {
            return Err(syn::Error::new_spanned(
                ty,
                "parameter fields must be String or one of i8, i16, i32, i64, u8, u16, u32",
            ));
        }
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("apivalidator")) {
            attr.parse_args::<LitStr>()?;
        }
    }
    Ok(())
}

/// Mark a struct as a parameter record and check its `#[apivalidator]`
/// attributes.
#[proc_macro_derive(ApiParams, attributes(apivalidator))]
pub fn derive_api_params(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match check_record(&input) {
        Ok(()) => TokenStream::new(),
        Err(e) => e.to_compile_error().into(),
    }
}
