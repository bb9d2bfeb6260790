//! Service and parameter declarations. `build.rs` runs the generator over
//! this file and the output is included as the `handlers` module below.

use apigen::runtime::RequestContext;
use apigen_macros::ApiParams;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub login: String,
    pub full_name: String,
    pub status: String,
    pub age: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deleted {
    pub login: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    UserNotExist,
    LoginExists,
    Storage,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::UserNotExist => write!(f, "user not exist"),
            ApiError::LoginExists => write!(f, "login already exist"),
            ApiError::Storage => write!(f, "storage unavailable"),
        }
    }
}

/// In-memory user directory.
#[derive(Debug, Default)]
pub struct UserApi {
    users: Mutex<HashMap<String, User>>,
}

impl UserApi {
    pub fn new() -> Self {
        Self::default()
    }

    #[apigen_macros::apigen(url = "/user/profile")]
    pub fn profile(&self, _ctx: &RequestContext, params: ProfileParams) -> Result<User, ApiError> {
        let users = self.users.lock().map_err(|_| ApiError::Storage)?;
        users.get(&params.login).cloned().ok_or(ApiError::UserNotExist)
    }

    #[apigen_macros::apigen(url = "/user/create", auth, method = "POST")]
    pub fn create(&self, _ctx: &RequestContext, params: &CreateParams) -> Result<User, ApiError> {
        let mut users = self.users.lock().map_err(|_| ApiError::Storage)?;
        if users.contains_key(&params.login) {
            return Err(ApiError::LoginExists);
        }
        let user = User {
            login: params.login.clone(),
            full_name: params.name.clone(),
            status: params.status.clone(),
            age: params.age,
        };
        users.insert(user.login.clone(), user.clone());
        Ok(user)
    }

    /// Removes a user.
    ///
    /// apigen:api {"url": "/user/delete", "auth": true, "method": "post"}
    pub fn delete(&self, _ctx: RequestContext, params: DeleteParams) -> Result<Deleted, ApiError> {
        let mut users = self.users.lock().map_err(|_| ApiError::Storage)?;
        users
            .remove(&params.login)
            .map(|u| Deleted { login: u.login })
            .ok_or(ApiError::UserNotExist)
    }

    #[apigen_macros::apigen(url = "/user/count", method = "GET")]
    pub fn count(&self, _ctx: &RequestContext, _query: CountQuery) -> Result<usize, ApiError> {
        Ok(self.users.lock().map_err(|_| ApiError::Storage)?.len())
    }

    /// Not exposed.
    pub fn len(&self) -> usize {
        self.users.lock().map(|u| u.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default, ApiParams)]
pub struct ProfileParams {
    #[apivalidator("required")]
    pub login: String,
}

#[derive(Debug, Default, ApiParams)]
pub struct CreateParams {
    #[apivalidator("required,min=10")]
    pub login: String,
    #[apivalidator("paramname=full_name,max=64")]
    pub name: String,
    #[apivalidator("enum=user|moderator|admin,default=user")]
    pub status: String,
    #[apivalidator("min=0,max=128")]
    pub age: i32,
}

#[derive(Debug, Default, ApiParams)]
pub struct DeleteParams {
    #[apivalidator("required")]
    pub login: String,
}

/// Not a parameter record by name; the count endpoint gets `Default`.
#[derive(Debug, Default)]
pub struct CountQuery;

mod handlers {
    include!(concat!(env!("OUT_DIR"), "/api_handlers.rs"));
}

pub use handlers::UserApiEndpoint;
