use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use serde::Deserialize;
use tracing::error;

/// Argon2id cost settings used for new hashes.
///
/// Verification reads the parameters embedded in the stored PHC string, so
/// changing these only affects hashes written afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HashParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashParams {
    /// Reject settings Argon2 would refuse at hashing time.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.hasher().map(|_| ())
    }

    fn hasher(&self) -> anyhow::Result<Argon2<'static>> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| anyhow::anyhow!("invalid argon2 params: {e}"))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

pub fn hash_password(params: &HashParams, plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = params
        .hasher()?
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Checks `plain` against a stored hash.
///
/// Accepts Argon2 PHC strings and, for rows written by the earlier
/// deployment, bcrypt hashes (`$2a$`, `$2b$`, `$2y$`).
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    if is_bcrypt(hash) {
        return bcrypt::verify(plain, hash).map_err(|e| {
            error!(error = %e, "bcrypt verify error");
            anyhow::anyhow!("Failed to verify password: {}", e)
        });
    }

    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

fn is_bcrypt(hash: &str) -> bool {
    ["$2a$", "$2b$", "$2y$"]
        .iter()
        .any(|prefix| hash.starts_with(prefix))
}

#[cfg(test)]
pub(crate) fn test_params() -> HashParams {
    HashParams {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(&test_params(), password).expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(&test_params(), password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password(&test_params(), "s3cret").unwrap();
        let b = hash_password(&test_params(), "s3cret").unwrap();
        assert_ne!(a, b);
        assert_ne!(a, "s3cret");
        assert!(verify_password("s3cret", &a).unwrap());
        assert!(verify_password("s3cret", &b).unwrap());
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn verify_accepts_legacy_bcrypt_hashes() {
        let legacy = bcrypt::hash("s3cret", 4).unwrap();
        assert!(verify_password("s3cret", &legacy).unwrap());
        assert!(!verify_password("wrong", &legacy).unwrap());
    }

    #[test]
    fn validate_matches_hashing() {
        assert!(test_params().validate().is_ok());
        assert!(HashParams::default().validate().is_ok());
        let bad = HashParams {
            memory_kib: 1,
            ..test_params()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn rejects_invalid_cost_settings() {
        let params = HashParams {
            memory_kib: 1,
            iterations: 1,
            parallelism: 1,
        };
        assert!(hash_password(&params, "x").is_err());
    }
}
