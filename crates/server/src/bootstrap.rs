use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use tankquote_agent::{LlmError, OpenAiChatClient, PriceIntentDetector, TankCostAgent};
use tankquote_core::config::{AppConfig, ConfigError, LoadOptions};
use tankquote_core::pricing::PricingEstimator;
use tankquote_db::{connect_with_settings, migrations, DbPool, SqlOrderRepository};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub agent: Arc<TankCostAgent>,
    pub repository: Arc<SqlOrderRepository>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("llm client construction failed: {0}")]
    Llm(#[source] LlmError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(event_name = "system.bootstrap.start", "starting application bootstrap");

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(event_name = "system.bootstrap.database_connected", "database connection established");

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(event_name = "system.bootstrap.migrations_applied", "database migrations applied");

    let repository = Arc::new(SqlOrderRepository::new(db_pool.clone()));
    let llm = Arc::new(OpenAiChatClient::from_config(&config.llm).map_err(BootstrapError::Llm)?);
    let agent = Arc::new(TankCostAgent::new(
        repository.clone(),
        llm,
        PricingEstimator::new(config.pricing.clone()),
        PriceIntentDetector::new(config.agent.price_keywords.clone()),
    ));

    Ok(Application { config, db_pool, agent, repository })
}
