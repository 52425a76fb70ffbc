use serde::{Deserialize, Serialize};

use crate::auth::repo_types::{PublicUser, Role};

/// JWT payload used for authentication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthClaims {
    pub id: i32,
    pub email: String,
    pub role: Role,
}

impl From<&PublicUser> for AuthClaims {
    fn from(user: &PublicUser) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Claims as they travel on the wire, with registered time claims.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TokenClaims {
    #[serde(flatten)]
    pub auth: AuthClaims,
    pub iat: usize, // issued at (unix timestamp)
    pub exp: usize, // expires at (unix timestamp)
}
