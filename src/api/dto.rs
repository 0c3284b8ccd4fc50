use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{clock::display_time, db::models::Reading};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChartQuery {
    /// `7d`, `1m` or `3m`; anything else selects the last day.
    pub range: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChartPoint {
    pub level: f64,
    /// IST display time, `DD/MM/YYYY HH:MM:SS`.
    #[schema(example = "19/10/2026 12:00:00")]
    pub timestamp: String,
}

impl From<Reading> for ChartPoint {
    fn from(r: Reading) -> Self {
        Self {
            level: r.level,
            timestamp: display_time(r.timestamp),
        }
    }
}

/// Body of `POST /api/manual-log`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ManualLogRequest {
    pub level: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
