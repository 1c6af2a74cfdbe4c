use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;

use sg_api::{create_app, default_route_policy, telemetry, AppState};
use sg_core::repositories::UserRepository;
use sg_core::services::{AuthService, AuthServiceConfig, TokenService, TokenServiceConfig};
use sg_infra::{create_pool, InMemoryUserRepository, MySqlUserRepository};
use sg_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    telemetry::init_tracing(&config.logging);

    config
        .validate()
        .map_err(|reason| anyhow::anyhow!("invalid configuration: {reason}"))?;
    if config.jwt.is_using_default_secret() {
        tracing::warn!("JWT_SECRET is not set, using the development default");
    }

    tracing::info!(
        environment = %config.environment,
        bind = %config.server.bind_address(),
        "Starting SessionGate API server"
    );

    let token_service = Arc::new(
        TokenService::new(TokenServiceConfig::from(&config.jwt))
            .context("failed to create token service")?,
    );

    match &config.database {
        Some(database) => {
            let pool = create_pool(database)
                .await
                .context("failed to connect to the database")?;
            let repository = MySqlUserRepository::from_pool(&pool);
            repository
                .ensure_schema()
                .await
                .context("failed to prepare the users table")?;
            tracing::info!(max_connections = database.max_connections, "Using MySQL user store");

            let served = run_server(&config, repository, token_service).await;
            pool.close().await;
            served
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, users are kept in memory");
            run_server(&config, InMemoryUserRepository::new(), token_service).await
        }
    }
}

async fn run_server<U>(
    config: &AppConfig,
    repository: U,
    token_service: Arc<TokenService>,
) -> anyhow::Result<()>
where
    U: UserRepository + 'static,
{
    let auth_service = Arc::new(AuthService::new(
        Arc::new(repository),
        token_service,
        AuthServiceConfig::default(),
    ));
    let app_state = web::Data::new(AppState::new(auth_service));
    let policy = Arc::new(default_route_policy());

    let mut server = HttpServer::new(move || create_app(app_state.clone(), Arc::clone(&policy)));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(config.server.bind_address())
        .with_context(|| format!("failed to bind {}", config.server.bind_address()))?
        .run()
        .await
        .context("server error")
}
