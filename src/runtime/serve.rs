use super::auth::CredentialValidator;
use super::request::{ApiRequest, RequestContext};
use super::response::ApiResponse;
use super::validate::{ParamRejection, ParamValues};
use serde::Serialize;
use std::fmt::Display;
use tracing::{debug, info_span, warn};

/// Static checks a generated handler runs before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointGuard {
    /// Endpoint identifier, used for logging
    pub name: &'static str,
    /// Required verb, upper-case; `None` accepts any verb
    pub verb: Option<&'static str>,
    /// Run the credential check
    pub auth: bool,
}

/// Run one endpoint: verb check, auth check, record extraction, invocation,
/// error classification and envelope serialization, in that order.
///
/// `extract` builds the parameter record from the raw values and stops at the
/// first rejected field. `invoke` is never called when an earlier step fails.
pub fn serve_endpoint<P, T, E, X, I>(
    req: &ApiRequest,
    creds: &dyn CredentialValidator,
    guard: &EndpointGuard,
    extract: X,
    invoke: I,
) -> ApiResponse
where
    X: FnOnce(&ParamValues) -> Result<P, ParamRejection>,
    I: FnOnce(RequestContext, P) -> Result<T, E>,
    T: Serialize,
    E: Display,
{
    let ctx = RequestContext::from_request(req);
    let span = info_span!(
        "endpoint",
        endpoint = guard.name,
        method = %req.method(),
        request_id = %ctx.request_id()
    );
    let _entered = span.enter();

    if let Some(verb) = guard.verb {
        if req.method().as_str() != verb {
            debug!(expected = verb, "verb mismatch");
            return ApiResponse::bad_method();
        }
    }

    if guard.auth && !creds.validate(req.headers()) {
        warn!("credential check failed");
        return ApiResponse::unauthorized();
    }

    let params = match extract(&req.param_values()) {
        Ok(params) => params,
        Err(rejection) => return ApiResponse::error(rejection.status, rejection.message),
    };

    match invoke(ctx, params) {
        Ok(value) => ApiResponse::ok(&value),
        Err(err) => {
            let resp = ApiResponse::from_domain_error(&err);
            debug!(status = resp.status.as_u16(), error = %err, "operation failed");
            resp
        }
    }
}
