//! Password hashing (bcrypt)

const BCRYPT_COST: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hashing failed")]
    Hash(#[source] bcrypt::BcryptError),

    #[error("Invalid credentials")]
    Mismatch,
}

/// Hash a plaintext password for storage.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    bcrypt::hash(password, BCRYPT_COST).map_err(PasswordError::Hash)
}

/// Verify a plaintext password against a stored hash.
pub fn verify_password(password: &str, password_hash: &str) -> Result<(), PasswordError> {
    let ok = bcrypt::verify(password, password_hash).map_err(PasswordError::Hash)?;
    if ok {
        Ok(())
    } else {
        Err(PasswordError::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert_ne!(hash, "s3cret-pass");
        assert!(verify_password("s3cret-pass", &hash).is_ok());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert!(matches!(
            verify_password("wrong-pass", &hash),
            Err(PasswordError::Mismatch)
        ));
    }
}
