use std::{sync::Arc, time::Instant};

use crate::{
    auth::{
        password::PasswordHasher,
        repo::{PgUserStore, UserStore},
    },
    config::AppConfig,
    db,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub hasher: PasswordHasher,
    pub started_at: Instant,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let pool = db::connect(&config).await?;
        db::migrate(&pool).await?;
        let users = Arc::new(PgUserStore::new(pool)) as Arc<dyn UserStore>;
        Ok(Self::from_parts(config, users, PasswordHasher::default()))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            config,
            users,
            hasher,
            started_at: Instant::now(),
        }
    }

    /// State over the given store with a cheap bcrypt cost.
    #[cfg(test)]
    pub fn for_tests(config: AppConfig, users: Arc<dyn UserStore>) -> Self {
        Self::from_parts(Arc::new(config), users, PasswordHasher::with_cost(4))
    }
}
