//! Observable session state.

use crate::role::RoleId;
use crate::user::{Business, SessionSeed, User};

/// Where the session sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Loading,
    Unauthenticated,
    AuthenticatedNoRoleSelected,
    AuthenticatedRoleActive(RoleId),
}

/// Which screen stack a front end should show for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Rehydration has not finished; routing decisions must wait.
    Splash,
    Login,
    RoleSelector,
    Dashboard(RoleId),
}

/// A point-in-time copy of the session, as seen by observers.
///
/// The user, business and token live together in `identity`, so an
/// authenticated snapshot always carries all three.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub identity: Option<SessionSeed>,
    pub active_role: Option<RoleId>,
    pub is_loading: bool,
    pub initialized: bool,
}

impl SessionSnapshot {
    pub fn user(&self) -> Option<&User> {
        self.identity.as_ref().map(|seed| &seed.user)
    }

    pub fn business(&self) -> Option<&Business> {
        self.identity.as_ref().map(|seed| &seed.business)
    }

    pub fn token(&self) -> Option<&str> {
        self.identity.as_ref().map(|seed| seed.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// `false` when nobody is signed in.
    pub fn has_role(&self, role: RoleId) -> bool {
        self.user().is_some_and(|user| user.has_role(role))
    }

    /// `false` when nobody is signed in or `roles` is empty.
    pub fn has_any_role(&self, roles: &[RoleId]) -> bool {
        roles.iter().any(|role| self.has_role(*role))
    }

    pub fn phase(&self) -> SessionPhase {
        if self.is_loading && !self.initialized {
            return SessionPhase::Loading;
        }
        if !self.initialized {
            return SessionPhase::Uninitialized;
        }
        match (&self.identity, self.active_role) {
            (None, _) => SessionPhase::Unauthenticated,
            (Some(_), None) => SessionPhase::AuthenticatedNoRoleSelected,
            (Some(_), Some(role)) => SessionPhase::AuthenticatedRoleActive(role),
        }
    }

    pub fn route(&self) -> Route {
        match self.phase() {
            SessionPhase::Uninitialized | SessionPhase::Loading => Route::Splash,
            SessionPhase::Unauthenticated => Route::Login,
            SessionPhase::AuthenticatedNoRoleSelected => Route::RoleSelector,
            SessionPhase::AuthenticatedRoleActive(role) => Route::Dashboard(role),
        }
    }
}

/// Picks the active role for `user` given a candidate (persisted or current).
///
/// A single granted role always wins. Otherwise the candidate is kept only
/// while it is still granted.
pub fn resolve_active_role(user: &User, candidate: Option<RoleId>) -> Option<RoleId> {
    if let Some(sole) = user.sole_role() {
        return Some(sole);
    }
    candidate.filter(|role| user.has_role(*role))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(roles: &[RoleId]) -> SessionSeed {
        SessionSeed {
            user: User {
                id: "u-1".to_string(),
                username: "sam".to_string(),
                full_name: "Sam".to_string(),
                business_id: "biz-001".to_string(),
                roles: roles.iter().copied().collect(),
            },
            business: Business {
                id: "biz-001".to_string(),
                name: "La Brigade".to_string(),
                address: None,
                phone: None,
            },
            token: "tok".to_string(),
        }
    }

    #[test]
    fn test_resolve_active_role() {
        let single = seed(&[RoleId::Waiter]).user;
        assert_eq!(resolve_active_role(&single, None), Some(RoleId::Waiter));
        assert_eq!(
            resolve_active_role(&single, Some(RoleId::Admin)),
            Some(RoleId::Waiter)
        );

        let multi = seed(&[RoleId::Admin, RoleId::Chef]).user;
        assert_eq!(resolve_active_role(&multi, None), None);
        assert_eq!(
            resolve_active_role(&multi, Some(RoleId::Chef)),
            Some(RoleId::Chef)
        );
        assert_eq!(resolve_active_role(&multi, Some(RoleId::Cashier)), None);
    }

    #[test]
    fn test_phase_and_route() {
        let mut snapshot = SessionSnapshot::default();
        assert_eq!(snapshot.phase(), SessionPhase::Uninitialized);
        assert_eq!(snapshot.route(), Route::Splash);

        snapshot.is_loading = true;
        assert_eq!(snapshot.phase(), SessionPhase::Loading);

        snapshot.is_loading = false;
        snapshot.initialized = true;
        assert_eq!(snapshot.route(), Route::Login);

        snapshot.identity = Some(seed(&[RoleId::Admin, RoleId::Chef]));
        assert_eq!(snapshot.route(), Route::RoleSelector);

        snapshot.active_role = Some(RoleId::Chef);
        assert_eq!(
            snapshot.phase(),
            SessionPhase::AuthenticatedRoleActive(RoleId::Chef)
        );
        assert_eq!(snapshot.route(), Route::Dashboard(RoleId::Chef));
    }

    #[test]
    fn test_role_queries_when_signed_out() {
        let snapshot = SessionSnapshot::default();
        assert!(!snapshot.has_role(RoleId::Admin));
        assert!(!snapshot.has_any_role(&RoleId::all()));
        assert!(snapshot.token().is_none());
    }

    #[test]
    fn test_has_any_role() {
        let snapshot = SessionSnapshot {
            identity: Some(seed(&[RoleId::Chef])),
            initialized: true,
            ..Default::default()
        };
        assert!(snapshot.has_any_role(&[RoleId::Waiter, RoleId::Chef]));
        assert!(!snapshot.has_any_role(&[RoleId::Waiter, RoleId::Cashier]));
        assert!(!snapshot.has_any_role(&[]));
    }
}
