use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// Salted one-way hash. Used for passwords and for the stored
/// refresh-token hash, so presented refresh tokens are never compared
/// in plaintext.
pub fn hash_secret(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_secret(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let secret = "Secur3P@ssw0rd!";
        let hash = hash_secret(secret).expect("hashing should succeed");
        assert!(verify_secret(secret, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let hash = hash_secret("correct-horse-battery-staple").expect("hashing should succeed");
        assert!(!verify_secret("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_secret("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn same_secret_hashes_differently() {
        // random salt per hash
        let a = hash_secret("token").unwrap();
        let b = hash_secret("token").unwrap();
        assert_ne!(a, b);
    }
}
