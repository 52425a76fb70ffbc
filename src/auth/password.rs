/// bcrypt work factor for stored credentials.
pub const HASH_COST: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum HashingError {
    #[error("bcrypt failure: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("hashing task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// bcrypt hasher; work runs on the blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: HASH_COST }
    }
}

impl PasswordHasher {
    #[allow(dead_code)]
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, plain: &str) -> Result<String, HashingError> {
        let plain = plain.to_owned();
        let cost = self.cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost)).await??;
        Ok(hash)
    }

    #[allow(dead_code)]
    pub async fn verify(&self, plain: &str, hash: &str) -> Result<bool, HashingError> {
        let plain = plain.to_owned();
        let hash = hash.to_owned();
        let ok = tokio::task::spawn_blocking(move || bcrypt::verify(plain, &hash)).await??;
        Ok(ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> PasswordHasher {
        PasswordHasher::with_cost(4)
    }

    #[tokio::test]
    async fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = fast().hash(password).await.expect("hashing should succeed");
        assert_ne!(hash, password);
        assert!(fast().verify(password, &hash).await.expect("verify should succeed"));
    }

    #[tokio::test]
    async fn verify_rejects_wrong_password() {
        let hash = fast().hash("correct-horse").await.expect("hashing should succeed");
        assert!(!fast()
            .verify("wrong-password", &hash)
            .await
            .expect("verify should not error"));
    }

    #[tokio::test]
    async fn verify_errors_on_malformed_hash() {
        let err = fast().verify("anything", "not-a-valid-hash").await.unwrap_err();
        assert!(matches!(err, HashingError::Bcrypt(_)));
    }

    #[tokio::test]
    async fn default_cost_is_ten() {
        let hash = PasswordHasher::default().hash("secret1").await.unwrap();
        assert!(hash.starts_with("$2b$10$"));
    }

    #[tokio::test]
    async fn invalid_cost_is_a_hashing_error() {
        let err = PasswordHasher::with_cost(99).hash("secret1").await.unwrap_err();
        assert!(matches!(err, HashingError::Bcrypt(_)));
    }
}
