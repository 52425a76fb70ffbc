use axum::extract::FromRef;
use tracing::{debug, info};

use crate::{
    auth::{
        claims::AuthClaims,
        jwt::JwtKeys,
        repo_types::{NewUser, PublicUser},
        validation::{validate_signup, SignupPayload},
    },
    error::AuthError,
    state::AppState,
};

/// A freshly registered user and the token to hand back in the cookie.
#[derive(Debug)]
pub struct Registration {
    pub user: PublicUser,
    pub token: String,
}

/// Validate, reject taken emails, hash, insert and sign a token.
///
/// The email lookup runs before hashing. The `users.email` unique constraint
/// stays authoritative: a conflict on insert is also
/// [`AuthError::DuplicateUser`].
pub async fn register(
    state: &AppState,
    payload: SignupPayload,
) -> Result<Registration, AuthError> {
    let signup = validate_signup(payload)?;

    if state.users.find_by_email(&signup.email).await?.is_some() {
        debug!(email = %signup.email, "email already registered");
        return Err(AuthError::DuplicateUser);
    }

    let password_hash = state.hasher.hash(&signup.password).await?;

    let user = state
        .users
        .insert(NewUser {
            name: &signup.name,
            email: &signup.email,
            password_hash: &password_hash,
            role: signup.role,
        })
        .await?;

    let token = JwtKeys::from_ref(state).sign(&AuthClaims::from(&user))?;

    info!(user_id = user.id, email = %user.email, role = %user.role, "user registered");
    Ok(Registration { user, token })
}
