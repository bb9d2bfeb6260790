#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::constraint::ParseMode;
use crate::error::GenError;

const SOURCE: &str = r#"
pub struct MyApi;

impl MyApi {
    #[apigen(url = "/user/profile")]
    pub fn profile(&self, ctx: &RequestContext, params: ProfileParams) -> Result<User, ApiError> {
        unimplemented!()
    }

    #[apigen(url = "/user/create", auth = true, method = "post")]
    pub fn create(&self, ctx: &RequestContext, params: &CreateParams) -> Result<NewUser, ApiError> {
        unimplemented!()
    }

    pub fn helper(&self) {}
}

pub struct ProfileParams {
    #[apivalidator("required")]
    pub login: String,
}

pub struct CreateParams {
    #[apivalidator("required,min=10")]
    pub login: String,
    #[apivalidator("paramname=full_name")]
    pub name: String,
    #[apivalidator("enum=user|moderator|admin,default=user")]
    pub status: String,
    #[apivalidator("min=0,max=128")]
    pub age: i32,
    pub nickname: String,
}

pub struct User {
    pub id: u64,
}
"#;

fn extract(src: &str) -> Schema {
    extract_schema(src, &ExtractOptions::default()).unwrap()
}

#[test]
fn test_extracts_services_and_endpoints_in_order() {
    let schema = extract(SOURCE);
    assert_eq!(schema.services.len(), 1);
    let svc = &schema.services[0];
    assert_eq!(svc.name, "MyApi");
    let names: Vec<_> = svc.endpoints.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["profile", "create"]);
    assert_eq!(schema.endpoint_count(), 2);
}

#[test]
fn test_directive_fields() {
    let schema = extract(SOURCE);
    let svc = schema.service("MyApi").unwrap();
    let profile = &svc.endpoints[0];
    assert_eq!(profile.directive.url, "/user/profile");
    assert!(!profile.directive.auth);
    assert_eq!(profile.directive.method, None);

    let create = &svc.endpoints[1];
    assert!(create.directive.auth);
    assert_eq!(create.directive.method.as_deref(), Some("POST"));
    assert_eq!(create.record, "CreateParams");
    assert!(create.record_by_ref);
    assert!(create.context_by_ref);
}

#[test]
fn test_records_named_params_only() {
    let schema = extract(SOURCE);
    let names: Vec<_> = schema.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["ProfileParams", "CreateParams"]);
    assert!(schema.record("User").is_none());
}

#[test]
fn test_record_fields_and_constraints() {
    let schema = extract(SOURCE);
    let rec = schema.record("CreateParams").unwrap();
    assert_eq!(rec.fields.len(), 5);

    let login = &rec.fields[0];
    assert_eq!(login.kind, FieldKind::String);
    assert_eq!(login.expression, "required,min=10");
    assert!(login.constraints.required);
    assert_eq!(login.constraints.min, Some(10));

    let name = &rec.fields[1];
    assert_eq!(name.lookup_key(), "full_name");

    let age = &rec.fields[3];
    assert_eq!(age.kind, FieldKind::Integer);
    assert_eq!(age.type_name, "i32");

    let nickname = &rec.fields[4];
    assert!(nickname.expression.is_empty());
    assert!(nickname.constraints.is_unconstrained());
    assert_eq!(nickname.lookup_key(), "nickname");
}

#[test]
fn test_legacy_doc_directive() {
    let src = r#"
        pub struct OtherApi;
        impl OtherApi {
            /// Creates a user.
            /// apigen:api {"url": "/user/create", "auth": true, "method": "POST"}
            pub fn create(&self, ctx: RequestContext, params: OtherCreateParams) -> Result<OtherUser, ApiError> {
                unimplemented!()
            }
        }
    "#;
    let schema = extract(src);
    let ep = &schema.services[0].endpoints[0];
    assert_eq!(ep.directive.url, "/user/create");
    assert!(ep.directive.auth);
    assert_eq!(ep.directive.method.as_deref(), Some("POST"));
    assert!(!ep.context_by_ref);
    assert!(!ep.record_by_ref);
}

#[test]
fn test_legacy_marker_without_block_is_skipped() {
    let src = r#"
        pub struct Api;
        impl Api {
            /// apigen:api but no object here
            pub fn noop(&self, ctx: &RequestContext, params: NoopParams) -> Result<(), ApiError> {
                Ok(())
            }
        }
    "#;
    assert!(extract(src).services.is_empty());
}

#[test]
fn test_malformed_legacy_json_is_fatal() {
    let src = r#"
        pub struct Api;
        impl Api {
            /// apigen:api {"url": }
            pub fn broken(&self, ctx: &RequestContext, params: P) -> Result<(), ApiError> {
                Ok(())
            }
        }
    "#;
    let err = extract_schema(src, &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, GenError::InvalidDirective { .. }), "{err}");
}

#[test]
fn test_unknown_directive_key_is_fatal() {
    let src = r#"
        pub struct Api;
        impl Api {
            #[apigen(url = "/x", colour = "red")]
            pub fn x(&self, ctx: &RequestContext, params: XParams) -> Result<(), ApiError> { Ok(()) }
        }
    "#;
    let err = extract_schema(src, &ExtractOptions::default()).unwrap_err();
    assert!(err.to_string().contains("expected `url`, `auth` or `method`"), "{err}");
}

#[test]
fn test_bare_auth_flag() {
    let src = r#"
        pub struct Api;
        impl Api {
            #[apigen(url = "/x", auth)]
            pub fn x(&self, ctx: &RequestContext, params: XParams) -> Result<(), ApiError> { Ok(()) }
        }
    "#;
    assert!(extract(src).services[0].endpoints[0].directive.auth);
}

#[test]
fn test_method_without_receiver_is_skipped() {
    let src = r#"
        pub struct Api;
        impl Api {
            #[apigen(url = "/x")]
            pub fn x(ctx: &RequestContext, params: XParams) -> Result<(), ApiError> { Ok(()) }
        }
    "#;
    assert!(extract(src).services.is_empty());
}

#[test]
fn test_trait_impls_are_ignored() {
    let src = r#"
        pub struct Api;
        impl Handler for Api {
            #[apigen(url = "/x")]
            fn x(&self, ctx: &RequestContext, params: XParams) -> Result<(), ApiError> { Ok(()) }
        }
    "#;
    assert!(extract(src).services.is_empty());
}

#[test]
fn test_missing_record_argument_is_fatal() {
    let src = r#"
        pub struct Api;
        impl Api {
            #[apigen(url = "/x")]
            pub fn x(&self, ctx: &RequestContext) -> Result<(), ApiError> { Ok(()) }
        }
    "#;
    let err = extract_schema(src, &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, GenError::InvalidRecordArgument { .. }));
}

#[test]
fn test_invalid_verb_is_fatal() {
    let src = r#"
        pub struct Api;
        impl Api {
            #[apigen(url = "/x", method = "GE T")]
            pub fn x(&self, ctx: &RequestContext, params: XParams) -> Result<(), ApiError> { Ok(()) }
        }
    "#;
    let err = extract_schema(src, &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, GenError::InvalidVerb { .. }), "{err}");
}

#[test]
fn test_unsupported_field_type_is_fatal() {
    let src = r#"
        pub struct BadParams {
            pub ratio: f64,
        }
    "#;
    let err = extract_schema(src, &ExtractOptions::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "field `BadParams.ratio` has unsupported type `f64` (expected String or an integer type)"
    );
}

#[test]
fn test_tuple_record_is_fatal() {
    let err = extract_schema("pub struct TupleParams(String);", &ExtractOptions::default())
        .unwrap_err();
    assert!(matches!(err, GenError::UnsupportedRecordShape { .. }));
}

#[test]
fn test_syntax_error_reports_location() {
    let err = extract_schema("pub struct Broken {\n  field String\n}", &ExtractOptions::default())
        .unwrap_err();
    match err {
        GenError::Syntax { line, .. } => assert_eq!(line, 2),
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn test_raw_identifiers_are_stored_unraw() {
    let schema = extract(
        r##"
        pub struct Api;
        impl Api {
            #[apigen(url = "/kind")]
            pub fn r#type(&self, ctx: &RequestContext, params: &KindParams) -> Result<(), E> { Ok(()) }
        }
        pub struct KindParams {
            #[apivalidator("required")]
            pub r#type: String,
            #[apivalidator("paramname=loop_count")]
            pub r#loop: i32,
        }
    "##,
    );
    let ep = &schema.services[0].endpoints[0];
    assert_eq!(ep.name, "type");
    assert_eq!(ep.record, "KindParams");

    let record = schema.record("KindParams").unwrap();
    assert_eq!(record.fields[0].name, "type");
    assert_eq!(record.fields[0].lookup_key(), "type");
    assert_eq!(record.fields[1].name, "loop");
    assert_eq!(record.fields[1].lookup_key(), "loop_count");
}

#[test]
fn test_strict_mode_rejects_unknown_tokens() {
    let src = r#"
        pub struct LoginParams {
            #[apivalidator("required,shiny")]
            pub login: String,
        }
    "#;
    let opts = ExtractOptions {
        mode: ParseMode::Strict,
        ..ExtractOptions::default()
    };
    let err = extract_schema(src, &opts).unwrap_err();
    assert_eq!(
        err.to_string(),
        "constraint on `LoginParams.login`: unknown constraint token `shiny`"
    );
    assert!(extract_schema(src, &ExtractOptions::default()).is_ok());
}

#[test]
fn test_multiple_impl_blocks_merge_into_one_service() {
    let src = r#"
        pub struct Api;
        impl Api {
            #[apigen(url = "/a")]
            pub fn a(&self, ctx: &RequestContext, params: AParams) -> Result<(), ApiError> { Ok(()) }
        }
        impl Api {
            #[apigen(url = "/b")]
            pub fn b(&self, ctx: &RequestContext, params: BParams) -> Result<(), ApiError> { Ok(()) }
        }
    "#;
    let schema = extract(src);
    assert_eq!(schema.services.len(), 1);
    assert_eq!(schema.services[0].endpoints.len(), 2);
}

#[test]
fn test_first_balanced_block() {
    assert_eq!(first_balanced_block(r#"x {"a": {"b": 1}} y {}"#), Some(r#"{"a": {"b": 1}}"#));
    assert_eq!(first_balanced_block(r#"{"url": "/a}b"}"#), Some(r#"{"url": "/a}b"}"#));
    assert_eq!(first_balanced_block("no braces"), None);
    assert_eq!(first_balanced_block("{ unterminated"), None);
}

#[test]
fn test_schema_serializes_to_json() {
    let schema = extract(SOURCE);
    let value = serde_json::to_value(&schema).unwrap();
    assert_eq!(value["services"][0]["name"], "MyApi");
    assert_eq!(value["records"][1]["fields"][3]["kind"], "integer");
}
