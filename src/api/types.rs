//! Shared state for the report API router.

use std::sync::Arc;

use crate::service::ReportService;

/// Shared context for all API routes: the process-lifetime service object.
#[derive(Clone)]
pub struct ApiContext {
    pub service: Arc<ReportService>,
}

impl ApiContext {
    pub fn new(service: Arc<ReportService>) -> Self {
        Self { service }
    }
}
