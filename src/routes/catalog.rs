use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::{get, put},
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::catalog::CategoryView,
    dto::{
        catalog::{
            CategoryInput, CategoryList, ProductInput, ProductList, ServiceInput, ServiceList,
            ServiceQuery,
        },
        form::FormData,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Category, Product, Service},
    response::ApiResponse,
    routes::params::ProductQuery,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/full-catalog", get(full_catalog))
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/{id}", put(update_category).delete(delete_category))
        .route("/services", get(list_services).post(create_service))
        .route("/services/{id}", put(update_service).delete(delete_service))
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

// Multipart bodies, described for the API docs only.

#[allow(dead_code)]
#[derive(Deserialize, ToSchema)]
pub struct CategoryForm {
    name: Option<String>,
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    image: Option<String>,
}

#[allow(dead_code)]
#[derive(Deserialize, ToSchema)]
pub struct ServiceForm {
    name: Option<String>,
    category_id: Option<Uuid>,
    description: Option<String>,
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    image: Option<String>,
}

#[allow(dead_code)]
#[derive(Deserialize, ToSchema)]
pub struct ProductForm {
    name: Option<String>,
    service_id: Option<Uuid>,
    description: Option<String>,
    original_price: Option<String>,
    discounted_price: Option<String>,
    /// JSON array or comma separated list.
    features: Option<String>,
    video: Option<String>,
    is_active: Option<bool>,
    /// Required on create.
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    image: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/catalog/full-catalog",
    responses(
        (status = 200, description = "Nested category, service and product view", body = ApiResponse<Vec<CategoryView>>)
    ),
    tag = "Catalog"
)]
pub async fn full_catalog(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<CategoryView>>>> {
    let resp = catalog_service::full_catalog(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/catalog/categories",
    responses(
        (status = 200, description = "List categories", body = ApiResponse<CategoryList>)
    ),
    tag = "Catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = catalog_service::list_categories(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/catalog/categories",
    request_body(content = CategoryForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Create category", body = ApiResponse<Category>),
        (status = 400, description = "Missing name"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Slug already in use"),
        (status = 502, description = "Image upload failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Category>>> {
    let input = CategoryInput::from_form(FormData::from_multipart(multipart).await?)?;
    let resp = catalog_service::create_category(&state, &user, input).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/catalog/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body(content = CategoryForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Update category", body = ApiResponse<Category>),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Slug already in use"),
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Category>>> {
    let input = CategoryInput::from_form(FormData::from_multipart(multipart).await?)?;
    let resp = catalog_service::update_category(&state, &user, id, input).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/catalog/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category and everything below it deleted"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = catalog_service::delete_category(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/catalog/services",
    params(ServiceQuery),
    responses(
        (status = 200, description = "List services", body = ApiResponse<ServiceList>)
    ),
    tag = "Catalog"
)]
pub async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<ServiceQuery>,
) -> AppResult<Json<ApiResponse<ServiceList>>> {
    let resp = catalog_service::list_services(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/catalog/services",
    request_body(content = ServiceForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Create service", body = ApiResponse<Service>),
        (status = 400, description = "Missing field"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Slug already in use"),
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn create_service(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Service>>> {
    let input = ServiceInput::from_form(FormData::from_multipart(multipart).await?)?;
    let resp = catalog_service::create_service(&state, &user, input).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/catalog/services/{id}",
    params(("id" = Uuid, Path, description = "Service ID")),
    request_body(content = ServiceForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Update service", body = ApiResponse<Service>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn update_service(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Service>>> {
    let input = ServiceInput::from_form(FormData::from_multipart(multipart).await?)?;
    let resp = catalog_service::update_service(&state, &user, id, input).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/catalog/services/{id}",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service and its products deleted"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn delete_service(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = catalog_service::delete_service(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/catalog/products",
    params(ProductQuery),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>)
    ),
    tag = "Catalog"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = catalog_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/catalog/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Catalog"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = catalog_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/catalog/products",
    request_body(content = ProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Create product", body = ApiResponse<Product>),
        (status = 400, description = "Missing field, image or malformed price"),
        (status = 404, description = "Service not found"),
        (status = 409, description = "Slug already in use"),
        (status = 502, description = "Image upload failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Product>>> {
    let input = ProductInput::from_form(FormData::from_multipart(multipart).await?)?;
    let resp = catalog_service::create_product(&state, &user, input).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/catalog/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body(content = ProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Update product", body = ApiResponse<Product>),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Slug already in use"),
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Product>>> {
    let input = ProductInput::from_form(FormData::from_multipart(multipart).await?)?;
    let resp = catalog_service::update_product(&state, &user, id, input).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/catalog/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Deleted product"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = catalog_service::delete_product(&state, &user, id).await?;
    Ok(Json(resp))
}
