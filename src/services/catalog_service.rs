use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    domain::{
        catalog::{CategoryView, build_catalog},
        slug::slug_for,
    },
    dto::catalog::{
        CategoryInput, CategoryList, ProductInput, ProductList, ServiceInput, ServiceList,
        ServiceQuery, required,
    },
    entity::{
        Categories, Products, Services, categories, products, services,
    },
    error::{AppError, AppResult},
    media::ResourceType,
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, Product, Service},
    response::{ApiResponse, Meta},
    routes::params::ProductQuery,
    services::upload_optional,
    state::AppState,
};

/// Loads the three levels fresh on every call and folds them into the nested view.
pub async fn full_catalog(state: &AppState) -> AppResult<ApiResponse<Vec<CategoryView>>> {
    let categories: Vec<Category> = Categories::find()
        .order_by_asc(categories::Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();
    let services: Vec<Service> = Services::find()
        .order_by_asc(services::Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Service::from)
        .collect();
    let products: Vec<Product> = Products::find()
        .order_by_asc(products::Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let catalog = build_catalog(&categories, &services, &products);
    Ok(ApiResponse::ok("Catalog", catalog))
}

async fn ensure_slug_free<E>(
    state: &AppState,
    slug_col: E::Column,
    id_col: E::Column,
    slug: &str,
    except: Option<Uuid>,
    what: &str,
) -> AppResult<()>
where
    E: EntityTrait,
    E::Model: Sync,
{
    let mut condition = Condition::all().add(slug_col.eq(slug));
    if let Some(id) = except {
        condition = condition.add(id_col.ne(id));
    }
    let taken = E::find().filter(condition).count(&state.orm).await?;
    if taken > 0 {
        return Err(AppError::Conflict(format!(
            "{what} with slug '{slug}' already exists"
        )));
    }
    Ok(())
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = Categories::find()
        .order_by_desc(categories::Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();
    Ok(ApiResponse::ok("Categories", CategoryList { items }))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    input: CategoryInput,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    let name = required(input.name, "name")?;
    let slug = slug_for(&name)?;
    ensure_slug_free::<Categories>(
        state,
        categories::Column::Slug,
        categories::Column::Id,
        &slug,
        None,
        "Category",
    )
    .await?;

    let image = upload_optional(state, input.image, ResourceType::Image).await?;
    let category = categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        slug: Set(slug),
        image: Set(image),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "category_create",
        "categories",
        serde_json::json!({ "category_id": category.id }),
    )
    .await;

    Ok(ApiResponse::ok("Category created", category.into()))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    input: CategoryInput,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    let existing = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Category"))?;

    let mut active: categories::ActiveModel = existing.into();
    if let Some(name) = input.name {
        let slug = slug_for(&name)?;
        ensure_slug_free::<Categories>(
            state,
            categories::Column::Slug,
            categories::Column::Id,
            &slug,
            Some(id),
            "Category",
        )
        .await?;
        active.name = Set(name);
        active.slug = Set(slug);
    }
    if let Some(image) = upload_optional(state, input.image, ResourceType::Image).await? {
        active.image = Set(Some(image));
    }
    let category = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "category_update",
        "categories",
        serde_json::json!({ "category_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Category updated", category.into()))
}

/// Services and products below the category go with it.
pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Categories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Category"));
    }

    audit::record(
        &state.pool,
        user.user_id,
        "category_delete",
        "categories",
        serde_json::json!({ "category_id": id }),
    )
    .await;

    Ok(ApiResponse::message("Category deleted"))
}

pub async fn list_services(
    state: &AppState,
    query: ServiceQuery,
) -> AppResult<ApiResponse<ServiceList>> {
    let mut finder = Services::find().order_by_desc(services::Column::CreatedAt);
    if let Some(category_id) = query.category_id {
        finder = finder.filter(services::Column::CategoryId.eq(category_id));
    }
    let items = finder
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Service::from)
        .collect();
    Ok(ApiResponse::ok("Services", ServiceList { items }))
}

async fn ensure_category_exists(state: &AppState, id: Uuid) -> AppResult<()> {
    Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::not_found("Category"))
}

pub async fn create_service(
    state: &AppState,
    user: &AuthUser,
    input: ServiceInput,
) -> AppResult<ApiResponse<Service>> {
    ensure_admin(user)?;
    let name = required(input.name, "name")?;
    let category_id = required(input.category_id, "category_id")?;
    ensure_category_exists(state, category_id).await?;

    let slug = slug_for(&name)?;
    ensure_slug_free::<Services>(
        state,
        services::Column::Slug,
        services::Column::Id,
        &slug,
        None,
        "Service",
    )
    .await?;

    let image = upload_optional(state, input.image, ResourceType::Image).await?;
    let service = services::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        slug: Set(slug),
        category_id: Set(category_id),
        image: Set(image),
        description: Set(input.description),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "service_create",
        "services",
        serde_json::json!({ "service_id": service.id, "category_id": category_id }),
    )
    .await;

    Ok(ApiResponse::ok("Service created", service.into()))
}

pub async fn update_service(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    input: ServiceInput,
) -> AppResult<ApiResponse<Service>> {
    ensure_admin(user)?;
    let existing = Services::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Service"))?;

    let mut active: services::ActiveModel = existing.into();
    if let Some(name) = input.name {
        let slug = slug_for(&name)?;
        ensure_slug_free::<Services>(
            state,
            services::Column::Slug,
            services::Column::Id,
            &slug,
            Some(id),
            "Service",
        )
        .await?;
        active.name = Set(name);
        active.slug = Set(slug);
    }
    if let Some(category_id) = input.category_id {
        ensure_category_exists(state, category_id).await?;
        active.category_id = Set(category_id);
    }
    if let Some(description) = input.description {
        active.description = Set(Some(description));
    }
    if let Some(image) = upload_optional(state, input.image, ResourceType::Image).await? {
        active.image = Set(Some(image));
    }
    let service = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "service_update",
        "services",
        serde_json::json!({ "service_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Service updated", service.into()))
}

pub async fn delete_service(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Services::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Service"));
    }

    audit::record(
        &state.pool,
        user.user_id,
        "service_delete",
        "services",
        serde_json::json!({ "service_id": id }),
    )
    .await;

    Ok(ApiResponse::message("Service deleted"))
}

/// Make `%`, `_` and the escape character itself match literally.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.search.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(search));
        condition = condition.add(
            Condition::any()
                .add(Expr::col(products::Column::Name).ilike(pattern.clone()))
                .add(Expr::col(products::Column::Description).ilike(pattern)),
        );
    }
    if let Some(service_id) = query.service_id {
        condition = condition.add(products::Column::ServiceId.eq(service_id));
    }

    let finder = Products::find()
        .filter(condition)
        .order_by_desc(products::Column::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    Ok(ApiResponse::success("Product", product.into(), None))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    input: ProductInput,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let name = required(input.name, "name")?;
    let service_id = required(input.service_id, "service_id")?;
    let image_file = input
        .image
        .ok_or_else(|| AppError::BadRequest("Main image is required".into()))?;

    Services::find_by_id(service_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Service"))?;

    let slug = slug_for(&name)?;
    ensure_slug_free::<Products>(
        state,
        products::Column::Slug,
        products::Column::Id,
        &slug,
        None,
        "Product",
    )
    .await?;

    let image = state
        .media
        .upload(image_file, ResourceType::Image)
        .await?
        .secure_url;

    let product = products::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        slug: Set(slug),
        service_id: Set(service_id),
        image: Set(image),
        video: Set(input.video),
        gallery: Set(Vec::new()),
        description: Set(input.description),
        features: Set(input.features.unwrap_or_default()),
        original_price: Set(input.original_price),
        discounted_price: Set(input.discounted_price),
        is_active: Set(input.is_active.unwrap_or(true)),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id, "service_id": service_id }),
    )
    .await;

    tracing::info!(product_id = %product.id, slug = %product.slug, "product created");
    Ok(ApiResponse::ok("Product created", product.into()))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    input: ProductInput,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;

    let mut active: products::ActiveModel = existing.into();
    if let Some(name) = input.name {
        let slug = slug_for(&name)?;
        ensure_slug_free::<Products>(
            state,
            products::Column::Slug,
            products::Column::Id,
            &slug,
            Some(id),
            "Product",
        )
        .await?;
        active.name = Set(name);
        active.slug = Set(slug);
    }
    if let Some(service_id) = input.service_id {
        Services::find_by_id(service_id)
            .one(&state.orm)
            .await?
            .ok_or_else(|| AppError::not_found("Service"))?;
        active.service_id = Set(service_id);
    }
    if let Some(description) = input.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = input.original_price {
        active.original_price = Set(Some(price));
    }
    if let Some(price) = input.discounted_price {
        active.discounted_price = Set(Some(price));
    }
    if let Some(features) = input.features {
        active.features = Set(features);
    }
    if let Some(video) = input.video {
        active.video = Set(Some(video));
    }
    if let Some(is_active) = input.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(image) = upload_optional(state, input.image, ResourceType::Image).await? {
        active.image = Set(image);
    }
    let product = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "product_update",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Product updated", product.into()))
}

/// Cart lines that reference the product stay behind and are skipped at checkout.
pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Products::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Product"));
    }

    audit::record(
        &state.pool,
        user.user_id,
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::message("Product deleted"))
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn search_wildcards_are_matched_literally() {
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\x"), "c:\\\\x");
        assert_eq!(escape_like("flyers"), "flyers");
    }
}
