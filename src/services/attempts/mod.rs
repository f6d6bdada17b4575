pub mod review;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct AttemptService {
    storage: Option<Arc<dyn Storage>>,
}

impl AttemptService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 查看某次作答的逐题结果
    pub async fn review_attempt(
        &self,
        request: &HttpRequest,
        title: String,
        attempt_id: i64,
    ) -> ActixResult<HttpResponse> {
        review::review_attempt(self, request, title, attempt_id).await
    }
}
