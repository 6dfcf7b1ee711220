use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn},
};

/// Shared application state, constructed once at startup and injected
/// into the router. Holds both database handles and the config.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: AppConfig,
}
