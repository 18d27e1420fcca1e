use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    config::ServiceKind,
    dto::{
        orders::{CreateOrderRequest, OrderList},
        products::{CreateProductRequest, ProductList},
        users::{DeletedUser, LoginRequest, ProfileList, RegisterRequest},
    },
    error::ErrorData,
    models::{Order, Product, Profile},
    response::{ApiResponse, Meta},
    routes::{health, orders, products, users},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
    ),
    components(
        schemas(
            Order,
            OrderList,
            CreateOrderRequest,
            ErrorData,
            Meta,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct OrderApiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness,
        products::list_products,
        products::create_product,
    ),
    components(
        schemas(
            Product,
            ProductList,
            CreateProductRequest,
            ErrorData,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Products", description = "Product endpoints"),
    )
)]
pub struct ProductApiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness,
        users::register,
        users::login,
        users::profile,
        users::list_users,
        users::delete_user,
    ),
    components(
        schemas(
            Profile,
            ProfileList,
            RegisterRequest,
            LoginRequest,
            DeletedUser,
            ErrorData,
            Meta,
            ApiResponse<Profile>,
            ApiResponse<ProfileList>,
            ApiResponse<DeletedUser>,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Users", description = "User endpoints"),
    )
)]
pub struct UserApiDoc;

pub fn openapi(kind: ServiceKind) -> OpenApiSpec {
    match kind {
        ServiceKind::Orders => OrderApiDoc::openapi(),
        ServiceKind::Products => ProductApiDoc::openapi(),
        ServiceKind::Users => UserApiDoc::openapi(),
    }
}

pub fn scalar_docs(kind: ServiceKind) -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", openapi(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_service_documents_only_its_own_routes() {
        let orders = openapi(ServiceKind::Orders);
        assert!(orders.paths.paths.contains_key("/order/order/{id}"));
        assert!(!orders.paths.paths.contains_key("/products"));

        let products = openapi(ServiceKind::Products);
        assert!(products.paths.paths.contains_key("/product"));
        assert!(!products.paths.paths.contains_key("/user/login"));

        let users = openapi(ServiceKind::Users);
        assert!(users.paths.paths.contains_key("/user/users/{id}"));
        assert!(users.paths.paths.contains_key("/health"));
    }
}
