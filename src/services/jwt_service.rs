use std::env;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::models::caller::{Caller, Claims, Role};

/// HS256 key pair shared by both chat surfaces, built once at startup.
#[derive(Clone)]
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl AuthKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub fn from_env() -> Result<Self, String> {
        let secret = env::var("JWT_SECRET_KEY")
            .map_err(|_| "JWT_SECRET_KEY not found in .env file".to_string())?;
        Ok(Self::from_secret(secret.as_bytes()))
    }
}

/// Issues a role-scoped token valid for one day. Token issuance belongs to
/// the accounts module; this lives here for tests and local tooling.
pub fn create_token(
    keys: &AuthKeys,
    id: Uuid,
    role: Role,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: id.to_string(),
        role,
        exp: (chrono::Utc::now() + chrono::Duration::days(1)).timestamp() as usize,
    };

    encode(&Header::default(), &claims, &keys.encoding)
}

/// Validates `token` and returns the caller it names. `None` when the
/// token is invalid, expired, or its subject is not a UUID.
pub fn verify_token(keys: &AuthKeys, token: &str) -> Option<Caller> {
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<Claims>(token, &keys.decoding, &validation).ok()?;
    let id = Uuid::parse_str(&data.claims.sub).ok()?;

    Some(Caller {
        id,
        role: data.claims.role,
    })
}
