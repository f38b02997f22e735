use std::sync::Arc;

use panelkit_auth::{IdentityStore, SessionManager};

use crate::app::ApiConfig;
use crate::cookies::CookieConfig;

/// Shared per-process services handed to middleware and handlers.
pub struct AppServices {
    pub sessions: SessionManager,
    pub store: Arc<dyn IdentityStore>,
    pub cookies: CookieConfig,
}

pub fn build_services(config: ApiConfig, store: Arc<dyn IdentityStore>) -> AppServices {
    let cookies = CookieConfig::new(&config.auth, config.secure_cookies);

    AppServices {
        sessions: SessionManager::new(config.auth, store.clone()),
        store,
        cookies,
    }
}
