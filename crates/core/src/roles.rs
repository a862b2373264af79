//! Employee roles.
//!
//! IDs must match the seed data in `20261001000003_create_employees_table.sql`.

use crate::status::define_status_enum;

define_status_enum! {
    /// The two fixed roles an employee can hold.
    Role {
        Admin = 1 => "ADMIN",
        User = 2 => "USER",
    }
}

/// Role assigned when registration omits one or names an unknown role.
pub const DEFAULT_ROLE: Role = Role::User;

/// Resolve a requested role label, falling back to [`DEFAULT_ROLE`].
pub fn resolve_role(requested: Option<&str>) -> Role {
    requested
        .filter(|r| !r.trim().is_empty())
        .and_then(Role::parse)
        .unwrap_or(DEFAULT_ROLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ids_match_seed_data() {
        assert_eq!(Role::Admin.id(), 1);
        assert_eq!(Role::User.id(), 2);
    }

    #[test]
    fn missing_or_blank_role_defaults_to_user() {
        assert_eq!(resolve_role(None), Role::User);
        assert_eq!(resolve_role(Some("  ")), Role::User);
    }

    #[test]
    fn unknown_role_defaults_to_user() {
        assert_eq!(resolve_role(Some("superuser")), Role::User);
    }

    #[test]
    fn role_label_is_case_insensitive() {
        assert_eq!(resolve_role(Some("admin")), Role::Admin);
        assert_eq!(resolve_role(Some("USER")), Role::User);
    }
}
