pub mod error;
mod index;
pub mod page;

use axum::{routing::get, Router};
use base::setting::Settings;
use std::sync::Arc;
use time::Date;
use tower_http::trace::TraceLayer;

use crate::fetch::ReleaseSource;
pub use error::Error;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn ReleaseSource>,
    pub settings: Arc<Settings>,
    pub today: fn() -> Date,
}

impl AppState {
    pub fn new(catalog: Arc<dyn ReleaseSource>, settings: Settings) -> Self {
        Self {
            catalog,
            settings: Arc::new(settings),
            today: base::util::today,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index::show).post(index::submit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
