//! One-time admin bootstrap code.
//!
//! When no admin account exists the server generates a code at startup and logs it. Whoever
//! registers with role `admin` and presents the code becomes the first admin. The code lives
//! only in memory, expires after `ADMIN_CODE_TTL` and is consumed by a successful match.

use rand::Rng;
use std::{sync::Arc, time::Duration};
use tokio::{sync::RwLock, time::Instant};

/// How long a generated code stays usable.
pub const ADMIN_CODE_TTL: Duration = Duration::from_secs(30 * 60);
const CODE_LENGTH: usize = 32;

#[derive(Clone)]
struct AdminCode {
    code: String,
    expires_at: Instant,
}

impl AdminCode {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Holds the current bootstrap code, if any. Cloning shares the same code.
#[derive(Clone, Default)]
pub struct AdminCodeService {
    code: Arc<RwLock<Option<AdminCode>>>,
}

impl AdminCodeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates a new random code, replacing any previous one.
    ///
    /// # Returns
    /// - `String` - 32 alphanumeric characters
    pub async fn generate(&self) -> String {
        let code = random_code();
        *self.code.write().await = Some(AdminCode {
            code: code.clone(),
            expires_at: Instant::now() + ADMIN_CODE_TTL,
        });
        code
    }

    /// Checks a presented code and consumes it on success.
    ///
    /// An expired code is discarded and fails. A wrong code leaves the stored code in place.
    pub async fn validate_and_consume(&self, input: &str) -> bool {
        let mut code = self.code.write().await;

        match code.as_ref() {
            Some(stored) if stored.is_expired() => {
                *code = None;
                false
            }
            Some(stored) if stored.code == input.trim() => {
                *code = None;
                true
            }
            _ => false,
        }
    }

    /// Checks a presented code without consuming it.
    pub async fn is_valid(&self, input: &str) -> bool {
        self.code
            .read()
            .await
            .as_ref()
            .is_some_and(|c| !c.is_expired() && c.code == input.trim())
    }

    /// Whether an unexpired code is waiting to be used.
    pub async fn has_valid_code(&self) -> bool {
        self.code
            .read()
            .await
            .as_ref()
            .is_some_and(|c| !c.is_expired())
    }
}

fn random_code() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn code_is_single_use() {
        let service = AdminCodeService::new();
        assert!(!service.validate_and_consume("anything").await);

        let code = service.generate().await;
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));

        assert!(!service.validate_and_consume("wrong").await);
        assert!(service.has_valid_code().await);

        assert!(service.validate_and_consume(&format!(" {code} ")).await);
        assert!(!service.validate_and_consume(&code).await);
        assert!(!service.has_valid_code().await);
    }

    #[tokio::test]
    async fn checking_a_code_does_not_consume_it() {
        let service = AdminCodeService::new();
        assert!(!service.is_valid("anything").await);

        let code = service.generate().await;
        assert!(!service.is_valid("wrong").await);
        assert!(service.is_valid(&code).await);
        assert!(service.is_valid(&code).await);

        assert!(service.validate_and_consume(&code).await);
        assert!(!service.is_valid(&code).await);
    }

    #[tokio::test]
    async fn regenerating_replaces_the_old_code() {
        let service = AdminCodeService::new();
        let first = service.generate().await;
        let second = service.generate().await;

        assert!(!service.validate_and_consume(&first).await);
        assert!(service.validate_and_consume(&second).await);
    }

    #[tokio::test(start_paused = true)]
    async fn code_expires_after_ttl() {
        let service = AdminCodeService::new();
        let code = service.generate().await;

        tokio::time::advance(ADMIN_CODE_TTL - Duration::from_secs(1)).await;
        assert!(service.has_valid_code().await);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(!service.has_valid_code().await);
        assert!(!service.validate_and_consume(&code).await);
    }
}
