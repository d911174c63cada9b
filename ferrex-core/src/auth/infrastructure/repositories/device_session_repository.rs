use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::domain::aggregates::DeviceSession;
use crate::auth::domain::repositories::DeviceSessionRepository;
use crate::auth::domain::value_objects::DeviceFingerprint;

pub struct PostgresDeviceSessionRepository {
    pool: Arc<PgPool>,
}

impl fmt::Debug for PostgresDeviceSessionRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDeviceSessionRepository")
            .field("pool_refs", &Arc::strong_count(&self.pool))
            .finish()
    }
}

impl PostgresDeviceSessionRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeviceSessionRepository for PostgresDeviceSessionRepository {
    async fn find_by_id(&self, session_id: Uuid) -> Result<Option<DeviceSession>> {
        todo!("Implement find_by_id")
    }

    async fn find_by_user_and_fingerprint(
        &self,
        user_id: Uuid,
        fingerprint: &DeviceFingerprint,
    ) -> Result<Option<DeviceSession>> {
        // TODO: TEMPORARY IN-MEMORY IMPLEMENTATION
        // Schema mismatch: DeviceSession domain model doesn't align with current database schema.
        // The DeviceSession domain object expects a direct session with device fingerprint,
        // but the database schema separates authenticated_devices and sessions tables.
        //
        // SOLUTIONS NEEDED:
        // 1. Create auth_device_sessions table that matches the domain model
        // 2. OR refactor domain model to match existing schema
        // 3. OR implement complex mapping logic between normalized tables
        //
        // For now, returning None to allow compilation
        let _ = (user_id, fingerprint); // Suppress unused warnings
        Ok(None)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<DeviceSession>> {
        // TODO: TEMPORARY IN-MEMORY IMPLEMENTATION
        // Schema mismatch: Cannot map current database schema to DeviceSession domain model.
        // The domain expects: session_id, device_fingerprint as value object, PIN as value object,
        // session_token as value object, but the schema stores these across multiple normalized tables.
        //
        // SOLUTIONS NEEDED:
        // 1. Create auth_device_sessions table that matches the domain model
        // 2. OR refactor domain model to work with normalized schema
        // 3. OR implement complex mapping logic between tables:
        //    - sessions table (id, user_id, device_id, token_hash, created_at, last_activity)
        //    - authenticated_devices table (id, fingerprint, name, revoked)
        //    - device_user_credentials table (user_id, device_id, pin_hash, failed_attempts)
        //
        // For now, returning empty vector to allow compilation
        let _ = user_id; // Suppress unused warning
        Ok(Vec::new())
    }

    async fn save(&self, session: &DeviceSession) -> Result<()> {
        todo!("Implement save")
    }
}
