//! Caller identity and the admin gate.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    #[default]
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Employee => "funcionario",
        }
    }

    /// Only `"admin"` grants admin rights. Anything else is an employee.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "admin" => Self::Admin,
            "funcionario" | "func" | "employee" => Self::Employee,
            other => {
                warn!(role = other, "unknown role, treating as employee");
                Self::Employee
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("permission denied: {0} requires an admin")]
    PermissionDenied(&'static str),
}

/// Who is making a request, and for which company.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    /// Tenant namespace for every repository call.
    pub company: String,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(
        &self,
        action: &'static str,
    ) -> Result<(), AuthError> {
        if self.is_admin() {
            Ok(())
        } else {
            warn!(user = %self.user_id, action, "admin action refused");
            Err(AuthError::PermissionDenied(action))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn identity(role: Role) -> Identity {
        Identity {
            user_id: "u-1".to_string(),
            email: "ana@example.com".to_string(),
            role,
            company: "acme".to_string(),
        }
    }

    #[test]
    fn parse_admin() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse(" Admin "), Role::Admin);
    }

    #[test]
    fn parse_everything_else_is_employee() {
        assert_eq!(Role::parse("funcionario"), Role::Employee);
        assert_eq!(Role::parse("func"), Role::Employee);
        assert_eq!(Role::parse("superuser"), Role::Employee);
        assert_eq!(Role::parse(""), Role::Employee);
    }

    #[test]
    fn require_admin_allows_admin() {
        assert_eq!(identity(Role::Admin).require_admin("delete"), Ok(()));
    }

    #[test]
    fn require_admin_refuses_employee() {
        assert_eq!(
            identity(Role::Employee).require_admin("delete"),
            Err(AuthError::PermissionDenied("delete"))
        );
    }
}
