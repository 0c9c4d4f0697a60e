pub mod http;

use std::sync::Arc;

use crate::domain::models::ServiceHandle;

pub struct ServiceManager {}

impl ServiceManager {
    pub fn get() -> ServiceHandle {
        return Arc::new(http::HttpChatService::default());
    }
}
