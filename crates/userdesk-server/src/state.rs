use crate::config::ServerConfig;
use std::sync::Arc;
use userdesk_storage::UserRepository;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub config: Arc<ServerConfig>,
}
