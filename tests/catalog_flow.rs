mod common;

use printshop_api::{
    dto::catalog::CategoryInput,
    error::AppError,
    middleware::auth::{AuthUser, ROLE_ADMIN},
    services::catalog_service,
};
use uuid::Uuid;

fn admin() -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        role: ROLE_ADMIN.into(),
    }
}

#[tokio::test]
async fn punctuation_only_category_name_is_rejected() {
    let state = common::offline_state();
    let err = catalog_service::create_category(
        &state,
        &admin(),
        CategoryInput {
            name: Some("!!!".into()),
            image: None,
        },
    )
    .await
    .expect_err("empty slug");
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn full_catalog_lists_categories_in_creation_order() -> anyhow::Result<()> {
    let Some(state) = common::database_state().await? else {
        return Ok(());
    };
    let admin = admin();
    let suffix = Uuid::new_v4().simple().to_string();
    let first = format!("Alpha {suffix}");
    let second = format!("Beta {suffix}");

    for name in [&first, &second] {
        catalog_service::create_category(
            &state,
            &admin,
            CategoryInput {
                name: Some(name.clone()),
                image: None,
            },
        )
        .await?;
    }

    let catalog = catalog_service::full_catalog(&state).await?.data.expect("catalog");
    let position = |name: &str| catalog.iter().position(|c| c.category == name);
    let (a, b) = (
        position(&first).expect("first listed"),
        position(&second).expect("second listed"),
    );
    assert!(a < b);
    Ok(())
}
