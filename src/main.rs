use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use printshop_api::{
    build_app, build_state,
    config::AppConfig,
    db::{create_pool, run_migrations},
    mailer::{LogMailer, Mailer, SmtpMailer},
    media::CloudinaryStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,printshop_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let mailer: Arc<dyn Mailer> = if config.smtp.username.is_empty() {
        tracing::warn!("SMTP_USERNAME not set, outgoing email will only be logged");
        Arc::new(LogMailer)
    } else {
        Arc::new(SmtpMailer::new(&config.smtp, config.outbound_timeout)?)
    };
    let media = Arc::new(CloudinaryStore::new(
        config.cloudinary.clone(),
        config.outbound_timeout,
    )?);

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    let app = build_app(build_state(pool, config, mailer, media));

    tracing::info!("listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
