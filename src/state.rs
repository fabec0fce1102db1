use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::auth::google::GoogleOAuth;
use crate::auth::jwt::JwtKeys;
use crate::auth::services::AuthService;
use crate::config::AppConfig;
use crate::property::repo::{PgPropertyStore, PropertyStore};
use crate::users::PgUserStore;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
    pub properties: Arc<dyn PropertyStore>,
    pub google: GoogleOAuth,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.db.url())
            .await
            .context("connect to database")?;

        Ok(Self::from_parts(db, config))
    }

    pub fn from_parts(db: PgPool, config: Arc<AppConfig>) -> Self {
        let users = Arc::new(PgUserStore::new(db.clone()));
        let auth = AuthService::new(users, JwtKeys::new(&config.jwt));
        let properties = Arc::new(PgPropertyStore::new(db.clone())) as Arc<dyn PropertyStore>;
        let google = GoogleOAuth::new(config.google.clone());

        Self {
            db,
            config,
            auth,
            properties,
            google,
        }
    }
}
