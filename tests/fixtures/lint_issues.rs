pub struct ShopApi;

impl ShopApi {
    #[apigen(url = "/order")]
    pub fn order(&self, ctx: &RequestContext, params: OrderParams) -> Result<(), String> {
        unimplemented!()
    }

    #[apigen(url = "/order")]
    pub fn reorder(&self, ctx: &RequestContext, params: OrderParams) -> Result<(), String> {
        unimplemented!()
    }
}

pub struct OrderParams {
    #[apivalidator("required,min=5,max=2")]
    pub sku: String,
    #[apivalidator("enum=small|large,default=medium")]
    pub size: String,
    #[apivalidator("quantity=3")]
    pub note: String,
}
