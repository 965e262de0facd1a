use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

/// Principal role for authorization
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Staff,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Role::Customer => write!(f, "customer"),
            Role::Staff => write!(f, "staff"),
        }
    }
}

/// The acting principal. User identity and role lookup live in an external
/// system; this is the opaque shape the service consumes.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
}

impl Principal {
    pub fn is_staff(&self) -> bool {
        self.role == Role::Staff
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid,    // principal id
    pub role: String, // "customer" or "staff"
    pub exp: i64,     // expiration timestamp
    pub iat: i64,     // issued at timestamp
}

impl JwtClaims {
    /// Parse the role claim; unknown values are rejected rather than
    /// defaulted, so a bad token never gains an implicit role.
    pub fn parsed_role(&self) -> Option<Role> {
        match self.role.as_str() {
            "customer" => Some(Role::Customer),
            "staff" => Some(Role::Staff),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_role() {
        let mut claims = JwtClaims {
            sub: Uuid::new_v4(),
            role: "staff".to_string(),
            exp: 0,
            iat: 0,
        };
        assert_eq!(claims.parsed_role(), Some(Role::Staff));
        claims.role = "customer".to_string();
        assert_eq!(claims.parsed_role(), Some(Role::Customer));
        claims.role = "admin".to_string();
        assert_eq!(claims.parsed_role(), None);
    }
}
