use crate::auth::models::AuthContext;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use printdesk_core::models::{JwtClaims, Principal};
use printdesk_core::AppError;
use std::sync::Arc;

/// Verification state for the auth middleware, built once at startup.
#[derive(Clone)]
pub struct AuthState {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthState {
    pub fn new(jwt_secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation,
        }
    }
}

/// Verify the bearer token and attach the acting principal to the request.
///
/// Identity and role management live in an external system; this middleware
/// only consumes its signed claims.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return HttpAppError(AppError::Unauthorized(
            "Invalid authorization header format".to_string(),
        ))
        .into_response();
    };

    let token_data =
        match decode::<JwtClaims>(token, &auth_state.decoding_key, &auth_state.validation) {
            Ok(data) => data,
            Err(e) => {
                let message = match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token has expired",
                    _ => "Invalid token",
                };
                tracing::debug!(error = %e, "JWT verification failed");
                return HttpAppError(AppError::Unauthorized(message.to_string()))
                    .into_response();
            }
        };

    let Some(role) = token_data.claims.parsed_role() else {
        return HttpAppError(AppError::Unauthorized("Unknown role claim".to_string()))
            .into_response();
    };

    request.extensions_mut().insert(AuthContext {
        principal: Principal {
            id: token_data.claims.sub,
            role,
        },
    });

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use printdesk_core::models::Role;
    use uuid::Uuid;

    const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn token_for(role: &str, exp_offset: i64) -> (Uuid, String) {
        let sub = Uuid::new_v4();
        let now = chrono::Utc::now().timestamp();
        let claims = JwtClaims {
            sub,
            role: role.to_string(),
            exp: now + exp_offset,
            iat: now,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("encode token");
        (sub, token)
    }

    #[test]
    fn test_token_round_trip() {
        let auth_state = AuthState::new(TEST_SECRET);
        let (sub, token) = token_for("staff", 3600);

        let data = decode::<JwtClaims>(&token, &auth_state.decoding_key, &auth_state.validation)
            .expect("valid token");
        assert_eq!(data.claims.sub, sub);
        assert_eq!(data.claims.parsed_role(), Some(Role::Staff));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let auth_state = AuthState::new(TEST_SECRET);
        let (_, token) = token_for("customer", -3600);

        let result = decode::<JwtClaims>(&token, &auth_state.decoding_key, &auth_state.validation);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let auth_state = AuthState::new("another-secret-another-secret-yes");
        let (_, token) = token_for("staff", 3600);

        let result = decode::<JwtClaims>(&token, &auth_state.decoding_key, &auth_state.validation);
        assert!(result.is_err());
    }
}
