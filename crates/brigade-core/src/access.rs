//! Role checks for gated actions.

use crate::error::{BrigadeError, Result};
use crate::role::RoleId;
use crate::session::SessionSnapshot;

/// Succeeds when the signed-in user holds `required`.
pub fn require_role(session: &SessionSnapshot, required: RoleId) -> Result<()> {
    if !session.is_authenticated() {
        return Err(BrigadeError::NotAuthenticated);
    }
    if session.has_role(required) {
        return Ok(());
    }
    tracing::warn!(?required, roles = ?session.user().map(|u| &u.roles), "role check failed");
    Err(BrigadeError::Forbidden(format!("requires the {} role", required)))
}

/// Succeeds when the signed-in user holds at least one of `required`.
pub fn require_any_role(session: &SessionSnapshot, required: &[RoleId]) -> Result<()> {
    if !session.is_authenticated() {
        return Err(BrigadeError::NotAuthenticated);
    }
    if session.has_any_role(required) {
        return Ok(());
    }
    tracing::warn!(?required, roles = ?session.user().map(|u| &u.roles), "any-role check failed");
    let names: Vec<&str> = required.iter().map(|role| role.as_str()).collect();
    Err(BrigadeError::Forbidden(format!(
        "requires one of: {}",
        names.join(", ")
    )))
}

/// Succeeds when `role` is the role currently in use, which is what
/// dashboard-level actions (e.g. closing a bill as cashier) check.
pub fn require_active_role(session: &SessionSnapshot, role: RoleId) -> Result<()> {
    require_any_active_role(session, &[role])
}

/// Succeeds when one of `required` is held and is also the active role.
pub fn require_any_active_role(session: &SessionSnapshot, required: &[RoleId]) -> Result<()> {
    require_any_role(session, required)?;
    if session.active_role.is_some_and(|active| required.contains(&active)) {
        return Ok(());
    }
    tracing::warn!(?required, active = ?session.active_role, "active role check failed");
    match required {
        [role] => Err(BrigadeError::Forbidden(format!(
            "switch to the {} role first",
            role
        ))),
        _ => {
            let names: Vec<&str> = required.iter().map(|role| role.as_str()).collect();
            Err(BrigadeError::Forbidden(format!(
                "switch to one of: {}",
                names.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::{Business, SessionSeed, User};

    fn signed_in(roles: &[RoleId], active: Option<RoleId>) -> SessionSnapshot {
        SessionSnapshot {
            identity: Some(SessionSeed {
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
            }),
            active_role: active,
            is_loading: false,
            initialized: true,
        }
    }

    #[test]
    fn test_require_role() {
        let session = signed_in(&[RoleId::Chef], Some(RoleId::Chef));
        assert!(require_role(&session, RoleId::Chef).is_ok());
        assert!(matches!(
            require_role(&session, RoleId::Cashier),
            Err(BrigadeError::Forbidden(_))
        ));
    }

    #[test]
    fn test_require_role_signed_out() {
        let session = SessionSnapshot::default();
        assert_eq!(
            require_role(&session, RoleId::Admin),
            Err(BrigadeError::NotAuthenticated)
        );
        assert_eq!(
            require_any_role(&session, &RoleId::all()),
            Err(BrigadeError::NotAuthenticated)
        );
    }

    #[test]
    fn test_require_any_role() {
        let session = signed_in(&[RoleId::Waiter, RoleId::Cashier], None);
        assert!(require_any_role(&session, &[RoleId::Admin, RoleId::Cashier]).is_ok());
        let err = require_any_role(&session, &[RoleId::Admin, RoleId::Chef]).unwrap_err();
        assert_eq!(err.to_string(), "Forbidden: requires one of: admin, chef");
    }

    #[test]
    fn test_require_active_role() {
        let session = signed_in(&[RoleId::Waiter, RoleId::Cashier], Some(RoleId::Waiter));
        assert!(require_active_role(&session, RoleId::Waiter).is_ok());
        assert!(require_active_role(&session, RoleId::Cashier).is_err());
        assert!(require_active_role(&session, RoleId::Admin).is_err());
    }

    #[test]
    fn test_require_any_active_role_names_every_candidate() {
        let session = signed_in(&[RoleId::Admin, RoleId::Cashier], Some(RoleId::Admin));
        assert!(require_any_active_role(&session, &[RoleId::Chef, RoleId::Admin]).is_ok());

        let err = require_any_active_role(&session, &[RoleId::Chef, RoleId::Cashier]).unwrap_err();
        assert_eq!(err.to_string(), "Forbidden: switch to one of: chef, cashier");

        let err = require_active_role(&session, RoleId::Cashier).unwrap_err();
        assert_eq!(err.to_string(), "Forbidden: switch to the cashier role first");
    }

    #[test]
    fn test_require_any_active_role_without_selection() {
        let session = signed_in(&[RoleId::Admin, RoleId::Cashier], None);
        assert!(matches!(
            require_any_active_role(&session, &[RoleId::Admin]),
            Err(BrigadeError::Forbidden(_))
        ));
        assert!(matches!(
            require_any_active_role(&session, &[RoleId::Chef]),
            Err(BrigadeError::Forbidden(ref m)) if m == "requires one of: chef"
        ));
    }
}
