use tracing::{info, warn};

use crate::{
    auth::{
        password::{hash_password, verify_or_dummy},
        repo::UserRepo,
        repo_types::User,
    },
    error::AppError,
};

/// Hashes the password and stores the user. The username's UNIQUE
/// constraint decides conflicts.
pub async fn register(
    users: &dyn UserRepo,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let hash = hash_password(password)?;
    let user = users.create(username, &hash).await?;
    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(user)
}

/// Unknown username and wrong password both yield [`AppError::BadCredentials`].
pub async fn authenticate(
    users: &dyn UserRepo,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let user = users.find_by_username(username).await?;
    let ok = verify_or_dummy(password, user.as_ref().map(|u| u.password_hash.as_str()))?;

    let user = match user {
        Some(user) if ok => user,
        Some(user) => {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AppError::BadCredentials);
        }
        None => {
            warn!(username = %username, "login unknown username");
            return Err(AppError::BadCredentials);
        }
    };

    info!(user_id = %user.id, "user logged in");
    Ok(user)
}
