use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::Serialize;
use ts_rs::TS;

use super::SystemService;
use crate::models::{ApiResponse, AppStartTime};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    // 运行时长（秒），未注入启动时间时为 None
    pub uptime_secs: Option<i64>,
}

pub async fn health(_service: &SystemService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let uptime_secs = request.app_data::<web::Data<AppStartTime>>().map(|start| {
        chrono::Utc::now()
            .signed_duration_since(start.start_datetime)
            .num_seconds()
    });

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs,
        },
        "Service is healthy",
    )))
}
