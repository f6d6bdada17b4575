/*!
 * 速率限制中间件
 *
 * 用于作答提交端点，防止脚本刷提交。
 *
 * ```rust,ignore
 * web::post()
 *     .to(submit_quiz)
 *     .wrap(RateLimit::quiz_submission(10))
 * ```
 *
 * - 已认证请求按用户ID计数，否则按客户端 IP
 * - 每个键在固定窗口内计数，窗口过后重新开始
 * - 超过限制返回 429 Too Many Requests
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};

/// 全局计数缓存
/// 键: 前缀:标识，值: (计数, 窗口开始时间)
static RATE_LIMIT_CACHE: Lazy<Cache<String, (u32, Instant)>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(3600))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    /// 时间窗口内允许的最大请求数
    max_requests: u32,
    /// 时间窗口（秒）
    window_secs: u64,
    /// 限制键前缀（用于区分不同端点）
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix: String::new(),
        }
    }

    /// 设置限制键前缀
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 作答提交限制：每用户每分钟 max_requests 次
    pub fn quiz_submission(max_requests: u32) -> Self {
        Self::new(max_requests.max(1), 60).with_prefix("quiz_submit")
    }
}

/// 在窗口内累加计数，返回 (更新后的计数项, 是否放行)
fn register_hit(
    entry: Option<(u32, Instant)>,
    now: Instant,
    max_requests: u32,
    window: Duration,
) -> ((u32, Instant), bool) {
    let (count, started) = match entry {
        Some((count, started)) if now.duration_since(started) < window => (count, started),
        _ => (0, now),
    };
    if count >= max_requests {
        ((count, started), false)
    } else {
        ((count + 1, started), true)
    }
}

// 优先使用连接信息中的地址，其次是转发头
fn extract_client_ip(req: &ServiceRequest) -> String {
    use std::net::IpAddr;

    if let Some(ip) = req.connection_info().realip_remote_addr()
        && ip.parse::<IpAddr>().is_ok()
    {
        return ip.to_string();
    }

    req.headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| ip.parse::<IpAddr>().is_ok())
        .map(str::to_string)
        .unwrap_or_else(|| "unknown".to_string())
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many submissions, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let identifier = RequireJWT::extract_user_id(req.request())
                .map(|id| format!("user:{id}"))
                .unwrap_or_else(|| format!("ip:{}", extract_client_ip(&req)));
            let cache_key = format!("{}:{}", limit.key_prefix, identifier);

            let window = Duration::from_secs(limit.window_secs);
            let entry = RATE_LIMIT_CACHE.get(&cache_key).await;
            let (updated, allowed) =
                register_hit(entry, Instant::now(), limit.max_requests, window);
            RATE_LIMIT_CACHE.insert(cache_key.clone(), updated).await;

            if !allowed {
                warn!(
                    "Rate limit exceeded for key: {} ({}/{})",
                    cache_key, updated.0, limit.max_requests
                );
                return Ok(req.into_response(
                    create_rate_limit_response(limit.window_secs).map_into_right_body(),
                ));
            }

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_submission_preset() {
        let limit = RateLimit::quiz_submission(10);
        assert_eq!(limit.max_requests, 10);
        assert_eq!(limit.window_secs, 60);
        assert_eq!(limit.key_prefix, "quiz_submit");

        // 0 视为 1
        assert_eq!(RateLimit::quiz_submission(0).max_requests, 1);
    }

    #[test]
    fn test_register_hit_blocks_after_limit() {
        let now = Instant::now();
        let window = Duration::from_secs(60);

        let (entry, allowed) = register_hit(None, now, 2, window);
        assert!(allowed);
        let (entry, allowed) = register_hit(Some(entry), now, 2, window);
        assert!(allowed);
        let (entry, allowed) = register_hit(Some(entry), now, 2, window);
        assert!(!allowed);
        assert_eq!(entry.0, 2);
    }

    #[test]
    fn test_register_hit_resets_after_window() {
        let window = Duration::from_secs(60);
        let start = Instant::now();
        let later = start + Duration::from_secs(61);

        let (entry, allowed) = register_hit(Some((5, start)), later, 5, window);
        assert!(allowed);
        assert_eq!(entry, (1, later));
    }
}
