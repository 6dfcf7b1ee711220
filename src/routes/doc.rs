use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse},
        customers::{
            CreateCustomerRequest, CustomerDeleted, CustomerList, CustomerSummary,
            CustomerWithOrders, UpdateCustomerRequest,
        },
        orders::{
            CreateOrderRequest, OrderDetail, OrderItemInput, OrderList, OrderWithItems,
            UpdateOrderRequest,
        },
    },
    models::{Customer, Order, OrderItem, OrderStatus, UserPublic},
    response::{ApiResponse, PageMeta},
    routes::{auth, customers, health, orders, params},
    validation::FieldError,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        customers::create_customer,
        customers::list_customers,
        customers::get_customer,
        customers::update_customer,
        customers::delete_customer,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::update_order,
        orders::delete_order,
    ),
    components(
        schemas(
            UserPublic,
            Customer,
            Order,
            OrderItem,
            OrderStatus,
            LoginRequest,
            LoginResponse,
            CreateCustomerRequest,
            UpdateCustomerRequest,
            CustomerSummary,
            CustomerList,
            CustomerWithOrders,
            CustomerDeleted,
            OrderItemInput,
            CreateOrderRequest,
            UpdateOrderRequest,
            OrderDetail,
            OrderWithItems,
            OrderList,
            params::Pagination,
            params::OrderListQuery,
            FieldError,
            PageMeta,
            ApiResponse<Customer>,
            ApiResponse<CustomerList>,
            ApiResponse<CustomerWithOrders>,
            ApiResponse<OrderDetail>,
            ApiResponse<OrderList>,
            ApiResponse<LoginResponse>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Customers", description = "Customer endpoints"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
