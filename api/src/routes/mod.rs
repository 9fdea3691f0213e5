use axum::Router;

use crate::shared_state::AppState;

mod health;
mod project;

pub fn configure_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .merge(health::configure())
        .nest("/api/projects", project::configure())
}
