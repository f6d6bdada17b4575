//! 请求参数解析失败时返回统一的响应结构

use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError, UrlencodedError};
use actix_web::{Error, HttpRequest, HttpResponse};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(kind: &str, detail: String, cause: impl Into<Error>) -> Error {
    debug!("{} 参数解析失败: {}", kind, detail);
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("Invalid {kind}: {detail}"),
    ));
    InternalError::from_response(cause.into(), response).into()
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    let detail = err.to_string();
    bad_request("JSON body", detail, err)
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    let detail = err.to_string();
    bad_request("query parameters", detail, err)
}

pub fn form_error_handler(err: UrlencodedError, _req: &HttpRequest) -> Error {
    let detail = err.to_string();
    bad_request("form body", detail, err)
}
