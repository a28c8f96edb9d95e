use std::sync::Arc;

use crate::{
    auth::{
        jwt::JwtKeys,
        repo::{PgUserRepo, UserRepo},
    },
    config::AppConfig,
    db,
    persons::repo::{PersonRepo, PgPersonRepo},
};

#[derive(Clone)]
pub struct AppState {
    pub keys: JwtKeys,
    pub users: Arc<dyn UserRepo>,
    pub persons: Arc<dyn PersonRepo>,
}

impl AppState {
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let db = db::connect(&config.database_url).await?;
        Ok(Self::from_parts(
            JwtKeys::new(&config.jwt),
            Arc::new(PgUserRepo::new(db.clone())),
            Arc::new(PgPersonRepo::new(db)),
        ))
    }

    pub fn from_parts(
        keys: JwtKeys,
        users: Arc<dyn UserRepo>,
        persons: Arc<dyn PersonRepo>,
    ) -> Self {
        Self {
            keys,
            users,
            persons,
        }
    }

    /// In-memory stores and a fixed test secret.
    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::{
            auth::repo::MemoryUserRepo, config::JwtConfig, persons::repo::MemoryPersonRepo,
        };

        let keys = JwtKeys::new(&JwtConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 5,
        });
        Self::from_parts(
            keys,
            Arc::new(MemoryUserRepo::default()),
            Arc::new(MemoryPersonRepo::default()),
        )
    }
}
