//! HS256 bearer tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use simshop_core::config::AuthConfig;
use simshop_core::models::{Role, User};
use simshop_core::{Principal, ShopError, ShopResult};

/// Ten years; longer lifetimes are clamped.
const MAX_TTL_HOURS: u64 = 24 * 365 * 10;

/// Token payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and checks tokens with the configured secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::hours(config.token_ttl_hours.min(MAX_TTL_HOURS) as i64),
        }
    }

    pub fn issue(&self, user: &User) -> ShopResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ShopError::Security(format!("token signing failed: {e}")))
    }

    /// Decode a token into the caller it was issued for.
    /// Any failure (bad signature, expiry, malformed subject) is `Unauthenticated`.
    pub fn verify(&self, token: &str) -> ShopResult<Principal> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|e| {
                debug!(error = %e, "rejected bearer token");
                ShopError::Unauthenticated
            })?;
        let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| ShopError::Unauthenticated)?;
        Ok(Principal::new(user_id, data.claims.role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simshop_core::models::now;

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ana".into(),
            email: "ana@simshop.com".into(),
            role,
            active: true,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn issued_token_verifies_to_the_same_principal() {
        let tokens = TokenService::new(&AuthConfig::default());
        let admin = user(Role::Admin);
        let principal = tokens.verify(&tokens.issue(&admin).unwrap()).unwrap();
        assert_eq!(principal, Principal::new(admin.id, Role::Admin));
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let ours = TokenService::new(&AuthConfig::default());
        let theirs = TokenService::new(&AuthConfig {
            jwt_secret: "someone-else".into(),
            ..AuthConfig::default()
        });
        let token = theirs.issue(&user(Role::Admin)).unwrap();
        assert!(matches!(ours.verify(&token), Err(ShopError::Unauthenticated)));
        assert!(matches!(ours.verify("not-a-token"), Err(ShopError::Unauthenticated)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = TokenService::new(&AuthConfig::default());
        let past = Utc::now() - Duration::hours(2);
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            role: Role::Customer,
            iat: past.timestamp(),
            exp: (past + Duration::minutes(30)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &tokens.encoding).unwrap();
        assert!(matches!(tokens.verify(&token), Err(ShopError::Unauthenticated)));
    }
}
