use std::{collections::HashMap, sync::Mutex};

use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Signed-out token ids, kept until the token would have expired anyway.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    revoked: Mutex<HashMap<Uuid, usize>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revoke(&self, jti: Uuid, exp: usize) -> Result<()> {
        let now = Utc::now().timestamp().max(0) as usize;
        let mut revoked = self
            .revoked
            .lock()
            .map_err(|e| AppError::InternalError(format!("Session registry poisoned: {}", e)))?;

        revoked.retain(|_, expires| *expires > now);
        revoked.insert(jti, exp);

        Ok(())
    }

    pub fn is_revoked(&self, jti: &Uuid) -> Result<bool> {
        let revoked = self
            .revoked
            .lock()
            .map_err(|e| AppError::InternalError(format!("Session registry poisoned: {}", e)))?;

        Ok(revoked.contains_key(jti))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_hours(hours: i64) -> usize {
        (Utc::now().timestamp() + hours * 3600) as usize
    }

    fn tracked(registry: &SessionRegistry) -> usize {
        registry.revoked.lock().unwrap().len()
    }

    #[test]
    fn revoked_token_is_reported() {
        let registry = SessionRegistry::new();
        let jti = Uuid::new_v4();

        assert!(!registry.is_revoked(&jti).unwrap());
        registry.revoke(jti, in_hours(1)).unwrap();
        assert!(registry.is_revoked(&jti).unwrap());
        assert!(!registry.is_revoked(&Uuid::new_v4()).unwrap());
    }

    #[test]
    fn expired_entries_are_purged_on_revoke() {
        let registry = SessionRegistry::new();
        let stale = Uuid::new_v4();

        registry.revoke(stale, in_hours(-1)).unwrap();
        registry.revoke(Uuid::new_v4(), in_hours(1)).unwrap();

        assert_eq!(tracked(&registry), 1);
        assert!(!registry.is_revoked(&stale).unwrap());
    }
}
