use apigen::runtime::RequestContext;
use apigen_macros::{apigen, ApiParams};

pub struct UserApi;

impl UserApi {
    #[apigen(url = "/user/profile")]
    pub fn profile(&self, ctx: &RequestContext, params: ProfileParams) -> Result<User, String> {
        unimplemented!()
    }

    #[apigen(url = "/user/create", auth, method = "post")]
    pub fn create(&self, ctx: &RequestContext, params: &CreateParams) -> Result<User, String> {
        unimplemented!()
    }

    /// apigen:api {"url": "/user/delete", "auth": true, "method": "POST"}
    pub fn delete(&self, ctx: RequestContext, params: DeleteParams) -> Result<(), String> {
        unimplemented!()
    }

    pub fn helper(&self) -> usize {
        0
    }
}

pub struct AdminApi;

impl AdminApi {
    #[apigen(url = "/admin/stats", method = "GET")]
    pub fn stats(&self, ctx: &RequestContext, params: StatsQuery) -> Result<u64, String> {
        unimplemented!()
    }
}

#[derive(ApiParams)]
pub struct ProfileParams {
    #[apivalidator("required")]
    pub login: String,
}

#[derive(ApiParams)]
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

#[derive(ApiParams)]
pub struct DeleteParams {
    #[apivalidator("required")]
    pub login: String,
}

#[derive(Default)]
pub struct StatsQuery;

pub struct User {
    pub login: String,
}
