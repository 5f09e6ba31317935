use super::*;
use crate::test_helpers::identity;

fn customer() -> Session {
    Session::authenticated("T1", identity("alice", Role::Customer))
}

fn admin() -> Session {
    Session::authenticated("T2", identity("root", Role::Admin))
}

// =============================================================================
// Route::from_path
// =============================================================================

#[test]
fn from_path_resolves_known_routes() {
    for route in Route::ALL {
        assert_eq!(Route::from_path(route.path()), route, "round trip for {route}");
    }
}

#[test]
fn from_path_ignores_query_fragment_and_trailing_slash() {
    assert_eq!(Route::from_path("/admin/fraud/?tab=alerts"), Route::AdminFraud);
    assert_eq!(Route::from_path("/dashboard#chat"), Route::Dashboard);
    assert_eq!(Route::from_path(""), Route::Home);
}

#[test]
fn from_path_unknown_is_not_found() {
    assert_eq!(Route::from_path("/claims"), Route::NotFound);
}

#[test]
fn landing_depends_on_role() {
    assert_eq!(Route::landing_for(Role::Admin), Route::Admin);
    assert_eq!(Route::landing_for(Role::Customer), Route::Dashboard);
}

// =============================================================================
// decide — initializing
// =============================================================================

#[test]
fn initializing_never_redirects() {
    let session = Session::initializing();
    for route in Route::ALL {
        assert_eq!(decide(route, &session), GuardDecision::Loading, "route {route}");
    }
}

// =============================================================================
// decide — anonymous
// =============================================================================

#[test]
fn anonymous_protected_routes_redirect_to_login() {
    let session = Session::anonymous();
    for route in [Route::Dashboard, Route::Admin, Route::AdminFraud, Route::AdminEnhanced] {
        assert_eq!(decide(route, &session), GuardDecision::Redirect(Route::Login), "route {route}");
    }
}

#[test]
fn anonymous_sees_public_and_entry_points() {
    let session = Session::anonymous();
    for route in [Route::Home, Route::Login, Route::Register, Route::NotFound] {
        assert_eq!(decide(route, &session), GuardDecision::Render(route));
    }
}

// =============================================================================
// decide — authenticated
// =============================================================================

#[test]
fn customer_on_admin_route_goes_to_customer_landing_not_login() {
    assert_eq!(decide(Route::AdminFraud, &customer()), GuardDecision::Redirect(Route::Dashboard));
    assert_eq!(decide(Route::Admin, &customer()), GuardDecision::Redirect(Route::Dashboard));
}

#[test]
fn admin_sees_admin_routes() {
    for route in [Route::Admin, Route::AdminFraud, Route::AdminEnhanced] {
        assert_eq!(decide(route, &admin()), GuardDecision::Render(route));
    }
}

#[test]
fn any_role_sees_dashboard() {
    assert_eq!(decide(Route::Dashboard, &customer()), GuardDecision::Render(Route::Dashboard));
    assert_eq!(decide(Route::Dashboard, &admin()), GuardDecision::Render(Route::Dashboard));
}

#[test]
fn signed_in_user_is_bounced_off_entry_points() {
    assert_eq!(decide(Route::Login, &customer()), GuardDecision::Redirect(Route::Dashboard));
    assert_eq!(decide(Route::Register, &admin()), GuardDecision::Redirect(Route::Admin));
}

#[test]
fn home_renders_for_everyone() {
    assert_eq!(decide(Route::Home, &admin()), GuardDecision::Render(Route::Home));
}

// =============================================================================
// require
// =============================================================================

#[test]
fn require_allows_what_decide_renders() {
    assert_eq!(require(Route::Dashboard, &customer()), Ok(()));
    assert_eq!(require(Route::AdminFraud, &admin()), Ok(()));
    assert_eq!(require(Route::Home, &Session::anonymous()), Ok(()));
}

#[test]
fn require_asks_for_sign_in_while_loading_or_anonymous() {
    assert_eq!(require(Route::Dashboard, &Session::initializing()), Err(AuthError::SignInRequired));
    assert_eq!(require(Route::Dashboard, &Session::anonymous()), Err(AuthError::SignInRequired));
    assert_eq!(require(Route::Admin, &Session::anonymous()), Err(AuthError::SignInRequired));
}

#[test]
fn require_names_the_missing_role() {
    let err = require(Route::AdminFraud, &customer()).unwrap_err();
    assert_eq!(err, AuthError::AuthorizationDenied { required: Role::Admin });
    assert_eq!(err.to_string(), "ADMIN access required");
}

#[test]
fn require_rejects_entry_points_once_signed_in() {
    assert!(matches!(require(Route::Login, &customer()), Err(AuthError::Validation(_))));
}
