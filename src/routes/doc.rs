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
    domain::{
        cart::Direction,
        catalog::{CategoryView, ServiceView, SubcategoryView},
    },
    dto::{
        auth::{
            EmailRequest, LoginRequest, LoginResponse, ResetPasswordRequest, SignupRequest,
            VerifyOtpRequest,
        },
        cart::{AddToCartRequest, CartView, RemoveFromCartRequest, UpdateCartRequest},
        catalog::{CategoryList, ProductList, ServiceList},
        contact::ContactRequest,
        feedback::{FeedbackList, SubmitFeedbackRequest, UpdateFeedbackRequest},
        orders::{CustomerSummary, OrderList, OrderWithItems, UpdateOrderStatusRequest},
        showcase::ShowcaseList,
    },
    models::{
        CartLine, Category, Feedback, FeedbackStatus, Order, OrderItem, OrderStatus, Product,
        ProductSummary, Service, Showcase, ShowcaseKind, User,
    },
    response::{ApiResponse, Meta},
    routes::{
        admin, auth, cart, catalog, contact, feedback, health, orders, params, showcases,
    },
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
        auth::signup,
        auth::verify_otp,
        auth::login,
        auth::forgot_password,
        auth::reset_password,
        auth::resend_otp,
        admin::admin_login,
        catalog::full_catalog,
        catalog::list_categories,
        catalog::create_category,
        catalog::update_category,
        catalog::delete_category,
        catalog::list_services,
        catalog::create_service,
        catalog::update_service,
        catalog::delete_service,
        catalog::list_products,
        catalog::get_product,
        catalog::create_product,
        catalog::update_product,
        catalog::delete_product,
        cart::cart_list,
        cart::add_to_cart,
        cart::update_cart,
        cart::remove_from_cart,
        orders::create_order,
        orders::my_orders,
        orders::all_orders,
        orders::update_order_status,
        orders::cancel_order,
        orders::delete_order,
        feedback::submit_feedback,
        feedback::public_feedback,
        feedback::list_feedback,
        feedback::update_feedback,
        feedback::delete_feedback,
        contact::send_contact,
        showcases::list_showcases,
        showcases::create_showcase,
        showcases::update_showcase,
        showcases::delete_showcase
    ),
    components(
        schemas(
            User,
            Category,
            Service,
            Product,
            ProductSummary,
            CartLine,
            Order,
            OrderItem,
            OrderStatus,
            Feedback,
            FeedbackStatus,
            Showcase,
            ShowcaseKind,
            CategoryView,
            ServiceView,
            SubcategoryView,
            Direction,
            SignupRequest,
            VerifyOtpRequest,
            LoginRequest,
            LoginResponse,
            EmailRequest,
            ResetPasswordRequest,
            AddToCartRequest,
            UpdateCartRequest,
            RemoveFromCartRequest,
            CartView,
            CategoryList,
            ServiceList,
            ProductList,
            CustomerSummary,
            OrderWithItems,
            OrderList,
            UpdateOrderStatusRequest,
            SubmitFeedbackRequest,
            UpdateFeedbackRequest,
            FeedbackList,
            ContactRequest,
            ShowcaseList,
            catalog::CategoryForm,
            catalog::ServiceForm,
            catalog::ProductForm,
            cart::AddToCartForm,
            showcases::ShowcaseForm,
            params::Pagination,
            params::SortOrder,
            Meta,
            ApiResponse<Product>,
            ApiResponse<CartView>,
            ApiResponse<OrderWithItems>,
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
        (name = "Catalog", description = "Categories, services, products and the nested catalog"),
        (name = "Auth", description = "Signup, OTP verification and login"),
        (name = "Admin", description = "Admin endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Feedback", description = "Customer feedback"),
        (name = "Contact", description = "Contact form"),
        (name = "Showcases", description = "Video stories and watch-and-buy"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
