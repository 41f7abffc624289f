use printshop_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    services::auth_service::hash_password,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

struct SeedProduct {
    name: &'static str,
    slug: &'static str,
    original: Decimal,
    discounted: Decimal,
    features: &'static [&'static str],
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let admin_email = std::env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".into());
    let admin_password = std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "Admin@123".into());
    let admin_id = ensure_admin(&pool, &admin_email, &admin_password).await?;
    seed_catalog(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

async fn ensure_admin(pool: &sqlx::PgPool, email: &str, password: &str) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email, password_hash, role, is_verified)
        VALUES ($1, 'Administrator', $2, $3, 'admin', TRUE)
        ON CONFLICT (email) DO UPDATE
            SET role = 'admin', password_hash = EXCLUDED.password_hash, is_verified = TRUE
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email.to_lowercase())
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    println!("Ensured admin {email}");
    Ok(id)
}

async fn upsert_category(pool: &sqlx::PgPool, name: &str, slug: &str) -> anyhow::Result<Uuid> {
    sqlx::query("INSERT INTO categories (id, name, slug) VALUES ($1, $2, $3) ON CONFLICT (slug) DO NOTHING")
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(slug)
        .execute(pool)
        .await?;
    let (id,): (Uuid,) = sqlx::query_as("SELECT id FROM categories WHERE slug = $1")
        .bind(slug)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

async fn upsert_service(
    pool: &sqlx::PgPool,
    category_id: Uuid,
    name: &str,
    slug: &str,
    description: &str,
) -> anyhow::Result<Uuid> {
    sqlx::query(
        r#"
        INSERT INTO services (id, name, slug, category_id, description)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (slug) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(slug)
    .bind(category_id)
    .bind(description)
    .execute(pool)
    .await?;
    let (id,): (Uuid,) = sqlx::query_as("SELECT id FROM services WHERE slug = $1")
        .bind(slug)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

async fn seed_products(pool: &sqlx::PgPool, service_id: Uuid, products: &[SeedProduct]) -> anyhow::Result<()> {
    for product in products {
        let features: Vec<String> = product.features.iter().map(|f| f.to_string()).collect();
        sqlx::query(
            r#"
            INSERT INTO products
                (id, name, slug, service_id, image, features, original_price, discounted_price)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(product.name)
        .bind(product.slug)
        .bind(service_id)
        .bind(format!("https://placehold.co/600x400?text={}", product.slug))
        .bind(features)
        .bind(product.original)
        .bind(product.discounted)
        .execute(pool)
        .await?;
    }
    Ok(())
}

async fn seed_catalog(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let printing = upsert_category(pool, "Printing", "printing").await?;
    let cards = upsert_service(
        pool,
        printing,
        "Visiting Cards",
        "visiting-cards",
        "Cards for every occasion",
    )
    .await?;
    seed_products(
        pool,
        cards,
        &[
            SeedProduct {
                name: "Business Card",
                slug: "business-card",
                original: dec!(500),
                discounted: dec!(350),
                features: &["350 GSM", "Matte finish"],
            },
            SeedProduct {
                name: "Luxury Card",
                slug: "luxury-card",
                original: dec!(800),
                discounted: dec!(650),
                features: &["Gold foil", "Spot UV"],
            },
        ],
    )
    .await?;

    let letterheads = upsert_service(
        pool,
        printing,
        "Letterheads",
        "letterheads",
        "Branded stationery",
    )
    .await?;
    seed_products(
        pool,
        letterheads,
        &[SeedProduct {
            name: "Standard Letterhead",
            slug: "standard-letterhead",
            original: dec!(400),
            discounted: dec!(300),
            features: &["100 GSM", "A4"],
        }],
    )
    .await?;

    let gifts = upsert_category(pool, "Gifts", "gifts").await?;
    let mugs = upsert_service(pool, gifts, "Mugs", "mugs", "Printed ceramic mugs").await?;
    seed_products(
        pool,
        mugs,
        &[SeedProduct {
            name: "Magic Mug",
            slug: "magic-mug",
            original: dec!(500),
            discounted: dec!(399),
            features: &["Colour changing", "330 ml"],
        }],
    )
    .await?;

    println!("Seeded catalog");
    Ok(())
}
