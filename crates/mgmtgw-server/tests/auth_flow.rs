//! End-to-end authentication flows through the public gateway API.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use nix::unistd::{getuid, Group, User};
use tonic::Code;

use mgmtgw_server::auth::{
    AuthError, AuthMethod, Clock, CredentialValidator, FixedCredentials, OsRoleResolver,
    RoleResolver, StaticRoles, TokenSecret, TokenService, TokenSettings,
    DEFAULT_REFRESH_WINDOW_SECS, DEFAULT_TOKEN_LIFETIME_SECS,
};
use mgmtgw_server::{AuthGateway, CallContext};

struct TestContext {
    now: Arc<AtomicU64>,
    gateway: AuthGateway,
}

impl TestContext {
    fn new(schemes: &str) -> Self {
        let now = Arc::new(AtomicU64::new(1_750_000_000));
        let handle = Arc::clone(&now);
        let clock: Clock = Arc::new(move || handle.load(Ordering::SeqCst));

        let gateway = AuthGateway::new(
            schemes.parse().unwrap(),
            TokenService::new(&TokenSecret::generate(), TokenSettings::default()).with_clock(clock),
            CredentialValidator::custom(FixedCredentials::new("netops", "hunter2")),
            Arc::new(StaticRoles::new().with_user("netops", ["netadmin", "users"])),
        );
        Self { now, gateway }
    }

    fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }

    fn call(&self, token: &str) -> CallContext {
        CallContext::new().with_access_token(token)
    }
}

#[test]
fn test_token_lifecycle() {
    let ctx = TestContext::new("password,jwt");

    let issued = ctx.gateway.authenticate("netops", "hunter2").unwrap();
    let identity = ctx.gateway.check(&ctx.call(&issued.encoded)).unwrap();
    assert_eq!(identity.username, "netops");
    assert_eq!(identity.roles, vec!["netadmin", "users"]);
    assert_eq!(identity.method, AuthMethod::Token);

    // Too early to refresh.
    let err = ctx.gateway.refresh(&ctx.call(&issued.encoded)).unwrap_err();
    assert_eq!(tonic::Status::from(err).code(), Code::InvalidArgument);

    ctx.advance(DEFAULT_TOKEN_LIFETIME_SECS - DEFAULT_REFRESH_WINDOW_SECS);
    let refreshed = ctx.gateway.refresh(&ctx.call(&issued.encoded)).unwrap();
    assert!(refreshed.claims.exp > issued.claims.exp);
    assert_eq!(refreshed.claims.roles, issued.claims.roles);

    // The old token expires on schedule; the new one keeps working.
    ctx.advance(DEFAULT_REFRESH_WINDOW_SECS);
    let err = ctx.gateway.check(&ctx.call(&issued.encoded)).unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken(_)));
    assert!(ctx.gateway.check(&ctx.call(&refreshed.encoded)).is_ok());
}

#[test]
fn test_denials_hide_detail() {
    let ctx = TestContext::new("password,jwt");

    let status = tonic::Status::from(ctx.gateway.authenticate("netops", "wrong").unwrap_err());
    assert_eq!(status.code(), Code::PermissionDenied);
    assert!(!status.message().contains("netops"));

    let status = tonic::Status::from(ctx.gateway.check(&ctx.call("junk")).unwrap_err());
    assert_eq!(status.code(), Code::PermissionDenied);

    let status = tonic::Status::from(ctx.gateway.check(&CallContext::new()).unwrap_err());
    assert_eq!(status.code(), Code::PermissionDenied);
}

#[test]
fn test_all_schemes_disabled() {
    let ctx = TestContext::new("");
    for err in [
        ctx.gateway.check(&CallContext::new()).unwrap_err(),
        ctx.gateway.authenticate("netops", "hunter2").unwrap_err(),
        ctx.gateway.refresh(&ctx.call("x")).unwrap_err(),
    ] {
        assert_eq!(tonic::Status::from(err).code(), Code::Unimplemented);
    }
}

#[test]
fn test_os_roles_for_current_user() {
    let user = match User::from_uid(getuid()) {
        Ok(Some(user)) => user,
        _ => return,
    };
    let primary = Group::from_gid(user.gid).unwrap().map(|g| g.name);

    let roles = OsRoleResolver.resolve(&user.name).unwrap();
    assert!(!roles.is_empty());
    if let Some(primary) = primary {
        assert!(roles.contains(&primary));
    }
}

#[test]
fn test_os_roles_unknown_user() {
    let err = OsRoleResolver
        .resolve("no-such-user-mgmtgw-test")
        .unwrap_err();
    assert!(matches!(err, AuthError::RoleLookup { .. }));
}
