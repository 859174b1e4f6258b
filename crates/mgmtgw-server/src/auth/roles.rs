//! Role resolution from OS group membership.

use std::collections::HashMap;
use std::ffi::CString;

use nix::unistd::{getgrouplist, Group, User};

use super::error::AuthError;

/// Maps a username to its ordered role list.
pub trait RoleResolver: Send + Sync {
    /// Resolve the roles of `username`. Any failure denies the login.
    fn resolve(&self, username: &str) -> Result<Vec<String>, AuthError>;
}

/// Resolves roles from the host's user and group databases.
///
/// Roles are the names of the groups the user belongs to, in the order the
/// OS enumerates them (primary group first).
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRoleResolver;

impl RoleResolver for OsRoleResolver {
    fn resolve(&self, username: &str) -> Result<Vec<String>, AuthError> {
        let user = User::from_name(username)
            .map_err(|e| AuthError::role_lookup(username, format!("user lookup failed: {}", e)))?
            .ok_or_else(|| AuthError::role_lookup(username, "no such user"))?;

        let name = CString::new(username)
            .map_err(|_| AuthError::role_lookup(username, "username contains NUL"))?;
        let gids = getgrouplist(&name, user.gid).map_err(|e| {
            AuthError::role_lookup(username, format!("group enumeration failed: {}", e))
        })?;

        gids.into_iter()
            .map(|gid| {
                Group::from_gid(gid)
                    .map_err(|e| {
                        AuthError::role_lookup(username, format!("group {} lookup failed: {}", gid, e))
                    })?
                    .map(|group| group.name)
                    .ok_or_else(|| AuthError::role_lookup(username, format!("unknown group {}", gid)))
            })
            .collect()
    }
}

/// Fixed username to roles table.
#[derive(Debug, Clone, Default)]
pub struct StaticRoles {
    users: HashMap<String, Vec<String>>,
}

impl StaticRoles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user<I, S>(mut self, username: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.users
            .insert(username.into(), roles.into_iter().map(Into::into).collect());
        self
    }
}

impl RoleResolver for StaticRoles {
    fn resolve(&self, username: &str) -> Result<Vec<String>, AuthError> {
        self.users
            .get(username)
            .cloned()
            .ok_or_else(|| AuthError::role_lookup(username, "no such user"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_resolver_root() {
        let roles = OsRoleResolver.resolve("root").unwrap();
        assert_eq!(roles.first().map(String::as_str), Some("root"));
    }

    #[test]
    fn test_os_resolver_unknown_user() {
        let err = OsRoleResolver
            .resolve("mgmtgw-no-such-user-4711")
            .unwrap_err();
        assert!(matches!(err, AuthError::RoleLookup { .. }));
    }

    #[test]
    fn test_static_roles_keep_order() {
        let roles = StaticRoles::new().with_user("alice", ["netadmin", "operator"]);
        assert_eq!(roles.resolve("alice").unwrap(), vec!["netadmin", "operator"]);
        assert!(roles.resolve("bob").is_err());
    }
}
