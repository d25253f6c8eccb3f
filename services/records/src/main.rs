use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use registrar_core::config::Config as _;
use registrar_core::tracing::init_tracing;
use registrar_records::config::RecordsConfig;
use registrar_records::infra::mailer::{SmtpNotifier, SmtpSettings};
use registrar_records::router::build_router;
use registrar_records::state::AppState;
use registrar_records::usecase::seed::{SeedAdminInput, SeedAdminUseCase};
use registrar_records_migration::{Migrator, MigratorTrait as _};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("records");

    let config = RecordsConfig::from_env().context("load records config")?;

    let db = Database::connect(&config.database_url)
        .await
        .context("connect to database")?;
    Migrator::up(&db, None).await.context("run migrations")?;

    let notifier =
        SmtpNotifier::new(&SmtpSettings::from(&config)).context("build SMTP notifier")?;
    let state = AppState { db, notifier };

    if let (Some(email), Some(password)) = (config.admin_email.clone(), config.admin_password.clone())
    {
        let usecase = SeedAdminUseCase {
            identities: state.identity_provider(),
        };
        usecase
            .execute(SeedAdminInput {
                email,
                password,
                full_name: config.admin_full_name.clone(),
            })
            .await
            .context("seed admin identity")?;
    }

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.records_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("bind {http_addr}"))?;

    info!("records service listening on {http_addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
