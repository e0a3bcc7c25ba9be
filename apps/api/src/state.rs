use std::sync::Arc;

use crate::matching::matcher::Matcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The matching engine, wired to the Postgres repositories and the HTTP
    /// CV extractor at startup. Tests swap the collaborators behind it.
    pub matcher: Arc<Matcher>,
}
