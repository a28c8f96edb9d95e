use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::error;

lazy_static! {
    // Stands in for the stored hash of a username that does not exist.
    static ref DUMMY_HASH: Result<String, String> =
        hash_password("placeholder-for-unknown-users").map_err(|e| e.to_string());
}

/// Builds the dummy hash up front so a broken hasher stops startup instead
/// of surfacing on the first login.
pub fn init_dummy_hash() -> anyhow::Result<()> {
    dummy_hash().map(|_| ())
}

fn dummy_hash() -> anyhow::Result<&'static str> {
    DUMMY_HASH
        .as_deref()
        .map_err(|e| anyhow::anyhow!("dummy password hash unavailable: {e}"))
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Constant-time comparison is done by argon2's verifier.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Checks `plain` against the stored hash of a user, or against the dummy
/// hash when the user is unknown (`None`). Both paths run argon2 once, and
/// `None` never matches.
pub fn verify_or_dummy(plain: &str, hash: Option<&str>) -> anyhow::Result<bool> {
    match hash {
        Some(hash) => verify_password(plain, hash),
        None => {
            verify_password(plain, dummy_hash()?)?;
            Ok(false)
        }
    }
}
