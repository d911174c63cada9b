use std::sync::Arc;
use uuid::Uuid;
use anyhow::Result;
use crate::database::MediaDatabase;
use crate::auth::session::DeviceSession;

pub struct SessionManager {
    db: Arc<dyn MediaDatabase>,
}

impl SessionManager {
    pub fn new(db: Arc<dyn MediaDatabase>) -> Self {
        Self { db }
    }
    
    pub async fn create_session(&self, user_id: Uuid, device_id: Uuid) -> Result<DeviceSession> {
        todo!("Implement create_session")
    }
    
    pub async fn get_session(&self, session_id: Uuid) -> Result<Option<DeviceSession>> {
        todo!("Implement get_session")
    }
    
    pub async fn delete_session(&self, session_id: Uuid) -> Result<()> {
        todo!("Implement delete_session")
    }
    
    pub async fn refresh_session(&self, session_id: Uuid) -> Result<DeviceSession> {
        todo!("Implement refresh_session")
    }
}