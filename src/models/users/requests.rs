use serde::Deserialize;

use super::entities::UserRole;

// 账号开通请求（账号由外部身份服务同步写入）
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub display_name: Option<String>,
}
