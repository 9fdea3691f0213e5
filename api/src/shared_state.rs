use std::sync::Arc;

use crate::service::ProjectService;

pub struct InnerState {
    pub production: bool,
    pub service: ProjectService,
}

pub type AppState = Arc<InnerState>;
