use std::sync::Arc;

use crate::auth::jwt::JwtKeys;
use crate::auth::repo::{PgTokenDenylist, PgUserRepo, TokenDenylist, UserRepo};
use crate::auth::tokens::TokenService;
use crate::config::AppConfig;
use crate::db;
use crate::employers::repo::{EmployerRepo, PgEmployerRepo};
use crate::memory::MemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub employers: Arc<dyn EmployerRepo>,
    pub tokens: TokenService,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        match config.database_url.clone() {
            Some(url) => {
                let db = db::connect(&url, config.database_max_connections).await?;
                db::migrate(&db).await?;
                Ok(Self::from_parts(
                    config,
                    Arc::new(PgUserRepo::new(db.clone())),
                    Arc::new(PgEmployerRepo::new(db.clone())),
                    Arc::new(PgTokenDenylist::new(db)),
                ))
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory store, data is not persisted");
                Ok(Self::in_memory(config))
            }
        }
    }

    pub fn from_parts(
        config: AppConfig,
        users: Arc<dyn UserRepo>,
        employers: Arc<dyn EmployerRepo>,
        denylist: Arc<dyn TokenDenylist>,
    ) -> Self {
        let tokens = TokenService::new(JwtKeys::new(&config.jwt), denylist);
        Self {
            config: Arc::new(config),
            users,
            employers,
            tokens,
        }
    }

    pub fn in_memory(config: AppConfig) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// Backs every repository with the given store; tests keep the handle to
    /// inspect what was written.
    pub fn with_store(config: AppConfig, store: Arc<MemoryStore>) -> Self {
        Self::from_parts(config, store.clone(), store.clone(), store)
    }
}
