use super::ids::RequestId;
use super::validate::ParamValues;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};

/// Transport-neutral view of an incoming request.
///
/// Hosts build one of these from whatever server they run and hand it to a
/// generated `serve_http`.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ApiRequest {
    /// Build a request from a verb and a `path?query` target.
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (target.to_string(), None),
        };
        Self {
            method,
            path,
            query,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Append a header; repeated names keep every occurrence.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Raw parameter values for validation.
    ///
    /// `POST` reads the url-encoded body and the last occurrence of a key
    /// wins. Every other verb reads the query string and the first
    /// occurrence wins.
    pub fn param_values(&self) -> ParamValues {
        let mut values = ParamValues::new();
        if self.method == Method::POST {
            for (k, v) in url::form_urlencoded::parse(&self.body) {
                values.insert(k.into_owned(), v.into_owned());
            }
        } else if let Some(query) = &self.query {
            for (k, v) in url::form_urlencoded::parse(query.as_bytes()) {
                values.entry(k.into_owned()).or_insert_with(|| v.into_owned());
            }
        }
        values
    }
}

impl<B: AsRef<[u8]>> From<http::Request<B>> for ApiRequest {
    fn from(req: http::Request<B>) -> Self {
        let (parts, body) = req.into_parts();
        Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            headers: parts.headers,
            body: body.as_ref().to_vec(),
        }
    }
}

/// Per-request context handed to every service method.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: RequestId,
    method: Method,
    path: String,
}

impl RequestContext {
    pub fn from_request(req: &ApiRequest) -> Self {
        Self {
            request_id: RequestId::from_headers(req.headers()).unwrap_or_default(),
            method: req.method().clone(),
            path: req.path().to_string(),
        }
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}
