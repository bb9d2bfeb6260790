#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use http::header::{HeaderName, HeaderValue};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

fn values(pairs: &[(&str, &str)]) -> ParamValues {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn auth_header() -> HeaderName {
    HeaderName::from_static("x-auth")
}

// --- validate_str -------------------------------------------------------

#[test]
fn test_absent_optional_string_is_empty() {
    let set = ConstraintSet::default();
    assert_eq!(validate_str("Nickname", &set, &values(&[])).unwrap(), "");
}

#[test]
fn test_required_string_rejects_empty() {
    let set = ConstraintSet::parse("required");
    let err = validate_str("Login", &set, &values(&[("login", "")])).unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.message, "login must me not empty");
}

#[test]
fn test_string_length_bounds() {
    let set = ConstraintSet::parse("min=3,max=5");
    let err = validate_str("Code", &set, &values(&[("code", "ab")])).unwrap_err();
    assert_eq!(err.message, "code len must be >= 3");
    let err = validate_str("Code", &set, &values(&[("code", "abcdef")])).unwrap_err();
    assert_eq!(err.message, "code len must be <= 5");
    assert_eq!(
        validate_str("Code", &set, &values(&[("code", "abcd")])).unwrap(),
        "abcd"
    );
}

#[test]
fn test_string_length_counts_bytes() {
    let set = ConstraintSet::parse("max=2");
    // one character, three bytes
    let err = validate_str("Sym", &set, &values(&[("sym", "€")])).unwrap_err();
    assert_eq!(err.message, "sym len must be <= 2");
}

#[test]
fn test_max_checked_before_min() {
    let set = ConstraintSet::parse("min=10,max=1");
    let err = validate_str("X", &set, &values(&[("x", "abc")])).unwrap_err();
    assert_eq!(err.message, "x len must be <= 1");
}

#[test]
fn test_enum_default_on_empty() {
    let set = ConstraintSet::parse("enum=user|moderator|admin,default=user");
    assert_eq!(validate_str("Status", &set, &values(&[])).unwrap(), "user");
}

#[test]
fn test_enum_without_default_accepts_empty() {
    let set = ConstraintSet::parse("enum=a|b");
    assert_eq!(validate_str("Kind", &set, &values(&[])).unwrap(), "");
}

#[test]
fn test_enum_rejects_non_member_listing_values_in_order() {
    let set = ConstraintSet::parse("enum=user|moderator|admin,default=user");
    let err = validate_str("Status", &set, &values(&[("status", "root")])).unwrap_err();
    assert_eq!(err.message, "status must be one of [user, moderator, admin]");
}

#[test]
fn test_enum_accepts_member() {
    let set = ConstraintSet::parse("enum=user|moderator|admin");
    assert_eq!(
        validate_str("Status", &set, &values(&[("status", "admin")])).unwrap(),
        "admin"
    );
}

#[test]
fn test_standalone_default_substituted_before_bounds() {
    let set = ConstraintSet::parse("default=guest,min=3");
    assert_eq!(validate_str("Role", &set, &values(&[])).unwrap(), "guest");

    let short = ConstraintSet::parse("default=ab,min=3");
    let err = validate_str("Role", &short, &values(&[])).unwrap_err();
    assert_eq!(err.message, "role len must be >= 3");
}

#[test]
fn test_paramname_renames_lookup() {
    let set = ConstraintSet::parse("paramname=full_name,required");
    let vals = values(&[("name", "wrong"), ("full_name", "Ada Lovelace")]);
    assert_eq!(validate_str("Name", &set, &vals).unwrap(), "Ada Lovelace");

    let err = validate_str("Name", &set, &values(&[("name", "x")])).unwrap_err();
    assert_eq!(err.message, "full_name must me not empty");
}

#[test]
fn test_field_name_lower_cased_for_lookup() {
    let set = ConstraintSet::default();
    let vals = values(&[("userid", "7")]);
    assert_eq!(validate_str("UserID", &set, &vals).unwrap(), "7");
}

// --- validate_int -------------------------------------------------------

#[test]
fn test_absent_optional_int_is_zero() {
    let n: i32 = validate_int("Age", &ConstraintSet::default(), &values(&[])).unwrap();
    assert_eq!(n, 0);
}

#[test]
fn test_absent_int_uses_default() {
    let set = ConstraintSet::parse("default=18");
    let n: i32 = validate_int("Age", &set, &values(&[])).unwrap();
    assert_eq!(n, 18);
}

#[test]
fn test_non_numeric_int_rejected_before_bounds() {
    let set = ConstraintSet::parse("min=0,max=128");
    let err = validate_int::<i32>("Age", &set, &values(&[("age", "old")])).unwrap_err();
    assert_eq!(err.message, "age must be int");
}

#[test]
fn test_int_bounds() {
    let set = ConstraintSet::parse("min=0,max=128");
    let err = validate_int::<i32>("Age", &set, &values(&[("age", "129")])).unwrap_err();
    assert_eq!(err.message, "age must be <= 128");
    let err = validate_int::<i32>("Age", &set, &values(&[("age", "-1")])).unwrap_err();
    assert_eq!(err.message, "age must be >= 0");
    assert_eq!(
        validate_int::<i32>("Age", &set, &values(&[("age", "128")])).unwrap(),
        128
    );
}

#[test]
fn test_int_min_without_max_is_enforced() {
    let set = ConstraintSet::parse("min=5");
    let err = validate_int::<i64>("Count", &set, &values(&[("count", "4")])).unwrap_err();
    assert_eq!(err.message, "count must be >= 5");
}

#[test]
fn test_int_out_of_type_range_is_not_int() {
    let err = validate_int::<u8>("Level", &ConstraintSet::default(), &values(&[("level", "300")]))
        .unwrap_err();
    assert_eq!(err.message, "level must be int");
}

#[test]
fn test_required_int_rejects_empty() {
    let set = ConstraintSet::parse("required");
    let err = validate_int::<i32>("Age", &set, &values(&[])).unwrap_err();
    assert_eq!(err.message, "age must me not empty");
}

proptest! {
    #[test]
    fn prop_string_min_length(len in 0usize..40) {
        let set = ConstraintSet::parse("min=10");
        let value = "a".repeat(len);
        let result = validate_str("Login", &set, &values(&[("login", value.as_str())]));
        if len < 10 {
            prop_assert_eq!(result.unwrap_err().message, "login len must be >= 10");
        } else {
            prop_assert_eq!(result.unwrap(), value);
        }
    }

    #[test]
    fn prop_int_within_bounds_accepted(n in 0i32..=128) {
        let set = ConstraintSet::parse("min=0,max=128");
        let raw = n.to_string();
        let got: i32 = validate_int("Age", &set, &values(&[("age", raw.as_str())])).unwrap();
        prop_assert_eq!(got, n);
    }
}

// --- request ------------------------------------------------------------

#[test]
fn test_get_reads_query_first_occurrence_wins() {
    let req = ApiRequest::new(Method::GET, "/user/profile?login=a%20b&login=c");
    assert_eq!(req.path(), "/user/profile");
    assert_eq!(req.param_values()["login"], "a b");
}

#[test]
fn test_post_reads_body_last_occurrence_wins() {
    let req = ApiRequest::new(Method::POST, "/user/create?login=ignored")
        .with_body("login=first&login=second&full_name=Ada+Lovelace");
    let vals = req.param_values();
    assert_eq!(vals["login"], "second");
    assert_eq!(vals["full_name"], "Ada Lovelace");
}

#[test]
fn test_from_http_request() {
    let http_req = http::Request::builder()
        .method(Method::POST)
        .uri("/user/create?x=1")
        .header("x-auth", "secret")
        .body(b"login=bob".to_vec())
        .unwrap();
    let req = ApiRequest::from(http_req);
    assert_eq!(req.path(), "/user/create");
    assert_eq!(req.query(), Some("x=1"));
    assert_eq!(req.param_values()["login"], "bob");
    assert!(req.headers().contains_key("x-auth"));
}

#[test]
fn test_request_id_propagated_from_header() {
    let id = RequestId::new();
    let req = ApiRequest::new(Method::GET, "/").with_header(
        HeaderName::from_static(REQUEST_ID_HEADER),
        HeaderValue::from_str(&id.to_string()).unwrap(),
    );
    assert_eq!(RequestContext::from_request(&req).request_id(), id);
}

#[test]
fn test_request_id_minted_when_header_invalid() {
    let req = ApiRequest::new(Method::GET, "/").with_header(
        HeaderName::from_static(REQUEST_ID_HEADER),
        HeaderValue::from_static("not-a-ulid"),
    );
    let ctx = RequestContext::from_request(&req);
    assert_ne!(ctx.request_id().to_string(), "not-a-ulid");
}

#[test]
fn test_repeated_request_id_header_is_ignored() {
    let id = RequestId::new();
    let value = HeaderValue::from_str(&id.to_string()).unwrap();
    let single = ApiRequest::new(Method::GET, "/")
        .with_header(HeaderName::from_static(REQUEST_ID_HEADER), value.clone());
    assert_eq!(RequestId::from_headers(single.headers()), Some(id));

    let twice = single.with_header(HeaderName::from_static(REQUEST_ID_HEADER), value);
    assert_eq!(RequestId::from_headers(twice.headers()), None);
    assert_ne!(RequestContext::from_request(&twice).request_id(), id);
}

#[test]
fn test_paramname_rename_through_query_string() {
    let set = ConstraintSet::parse("paramname=full_name,required");
    let req = ApiRequest::new(
        Method::GET,
        "/user/profile?name=wrong&full_name=Ada+Lovelace&full_name=Grace",
    );
    let vals = req.param_values();
    assert_eq!(validate_str("name", &set, &vals).unwrap(), "Ada Lovelace");

    let req = ApiRequest::new(Method::GET, "/user/profile?name=Ada");
    let err = validate_str("name", &set, &req.param_values()).unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.message, "full_name must me not empty");
}

#[test]
fn test_keyword_field_name_matches_query_key() {
    let set = ConstraintSet::parse("required");
    let req = ApiRequest::new(Method::GET, "/kinds?type=admin");
    assert_eq!(validate_str("type", &set, &req.param_values()).unwrap(), "admin");
}

// --- auth ---------------------------------------------------------------

#[test]
fn test_shared_secret_requires_exactly_one_matching_header() {
    let creds = SharedSecret::new("s3cret");
    let none = ApiRequest::new(Method::POST, "/");
    assert!(!creds.validate(none.headers()));

    let wrong = ApiRequest::new(Method::POST, "/")
        .with_header(auth_header(), HeaderValue::from_static("nope"));
    assert!(!creds.validate(wrong.headers()));

    let good = ApiRequest::new(Method::POST, "/")
        .with_header(auth_header(), HeaderValue::from_static("s3cret"));
    assert!(creds.validate(good.headers()));

    let twice = good
        .clone()
        .with_header(auth_header(), HeaderValue::from_static("s3cret"));
    assert!(!creds.validate(twice.headers()));
}

#[test]
fn test_shared_secret_custom_header() {
    let creds = SharedSecret::new("k").with_header(HeaderName::from_static("x-api-key"));
    let req = ApiRequest::new(Method::GET, "/")
        .with_header(HeaderName::from_static("x-api-key"), HeaderValue::from_static("k"));
    assert!(creds.validate(req.headers()));
    assert!(format!("{creds:?}").contains("<redacted>"));
}

#[test]
fn test_closure_as_validator() {
    let allow_all = |_: &http::HeaderMap| true;
    let req = ApiRequest::new(Method::GET, "/");
    assert!(allow_all.validate(req.headers()));
}

// --- response -----------------------------------------------------------

#[test]
fn test_classify_domain_error() {
    assert_eq!(classify_domain_error("user not exist"), StatusCode::NOT_FOUND);
    assert_eq!(classify_domain_error("login already exist"), StatusCode::CONFLICT);
    assert_eq!(
        classify_domain_error("order not exist"),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(classify_domain_error("boom"), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_success_envelope_shape() {
    let resp = ApiResponse::ok(&serde_json::json!({"id": 42}));
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.json().unwrap(),
        serde_json::json!({"error": "", "response": {"id": 42}})
    );
}

#[test]
fn test_success_without_value_omits_response() {
    let unit = ApiResponse::ok(&());
    assert_eq!(unit.status, StatusCode::OK);
    assert_eq!(unit.json().unwrap(), serde_json::json!({"error": ""}));

    let none = ApiResponse::ok(&Option::<u32>::None);
    assert_eq!(none.json().unwrap(), serde_json::json!({"error": ""}));

    let empty = ApiResponse::ok(&Vec::<u32>::new());
    assert_eq!(empty.json().unwrap(), serde_json::json!({"error": "", "response": []}));
}

#[test]
fn test_error_envelope_omits_response() {
    let resp = ApiResponse::unknown_method();
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.json().unwrap(), serde_json::json!({"error": "unknown method"}));
}

#[test]
fn test_into_http_sets_content_type() {
    let resp = ApiResponse::bad_method().into_http();
    assert_eq!(resp.status(), StatusCode::NOT_ACCEPTABLE);
    assert_eq!(resp.headers()["content-type"], "application/json");
}

// --- serve_endpoint -----------------------------------------------------

#[derive(Debug, Default)]
struct CreateParams {
    login: String,
    status: String,
}

const CREATE_GUARD: EndpointGuard = EndpointGuard {
    name: "create",
    verb: Some("POST"),
    auth: true,
};

fn extract_create(vals: &ParamValues) -> Result<CreateParams, ParamRejection> {
    Ok(CreateParams {
        login: validate_str("Login", &ConstraintSet::parse("required,min=10"), vals)?,
        status: validate_str(
            "Status",
            &ConstraintSet::parse("enum=user|moderator|admin,default=user"),
            vals,
        )?,
    })
}

fn post(body: &'static str, with_auth: bool) -> ApiRequest {
    let req = ApiRequest::new(Method::POST, "/user/create").with_body(body);
    if with_auth {
        req.with_header(auth_header(), HeaderValue::from_static("s3cret"))
    } else {
        req
    }
}

fn run(req: &ApiRequest, outcome: Result<&str, &str>, calls: &AtomicUsize) -> ApiResponse {
    let creds = SharedSecret::new("s3cret");
    serve_endpoint(req, &creds, &CREATE_GUARD, extract_create, |_ctx, params| {
        calls.fetch_add(1, Ordering::SeqCst);
        outcome
            .map(|_| serde_json::json!({"login": params.login, "status": params.status}))
            .map_err(str::to_string)
    })
}

#[test]
fn test_short_login_rejected_with_400() {
    let calls = AtomicUsize::new(0);
    let resp = run(&post("login=short", true), Ok(""), &calls);
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json().unwrap()["error"], "login len must be >= 10");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_omitted_status_defaults_to_user() {
    let calls = AtomicUsize::new(0);
    let resp = run(&post("login=longenough1", true), Ok(""), &calls);
    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json().unwrap();
    assert_eq!(body["error"], "");
    assert_eq!(body["response"]["status"], "user");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_conflict_error_maps_to_409() {
    let calls = AtomicUsize::new(0);
    let resp = run(&post("login=longenough1", true), Err("login already exist"), &calls);
    assert_eq!(resp.status, StatusCode::CONFLICT);
    assert_eq!(
        resp.json().unwrap(),
        serde_json::json!({"error": "login already exist"})
    );
}

#[test]
fn test_user_not_exist_maps_to_404() {
    let calls = AtomicUsize::new(0);
    let resp = run(&post("login=longenough1", true), Err("user not exist"), &calls);
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[test]
fn test_missing_auth_rejected_without_invocation() {
    let calls = AtomicUsize::new(0);
    let resp = run(&post("login=longenough1", false), Ok(""), &calls);
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    assert_eq!(resp.json().unwrap()["error"], "unauthorized");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_wrong_verb_rejected_before_auth() {
    let calls = AtomicUsize::new(0);
    let req = ApiRequest::new(Method::GET, "/user/create?login=longenough1");
    let resp = run(&req, Ok(""), &calls);
    assert_eq!(resp.status, StatusCode::NOT_ACCEPTABLE);
    assert_eq!(resp.json().unwrap()["error"], "bad method");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unguarded_endpoint_accepts_any_verb_without_auth() {
    let guard = EndpointGuard {
        name: "profile",
        verb: None,
        auth: false,
    };
    let deny = |_: &http::HeaderMap| false;
    let req = ApiRequest::new(Method::DELETE, "/user/profile?login=ada");
    let resp = serve_endpoint(
        &req,
        &deny,
        &guard,
        |vals| validate_str("Login", &ConstraintSet::parse("required"), vals),
        |ctx, login| {
            assert_eq!(ctx.path(), "/user/profile");
            Ok::<_, String>(login)
        },
    );
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json().unwrap()["response"], "ada");
}
