//! Role-based access decisions for every mutation.
//!
//! Each mutation has a single capability-check function returning a
//! structured [`Decision`]; handlers convert a denial into a 403 via
//! `ApiError`.

/// Closed set of account roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Pengelola,
    Penghuni,
    Tamu,
}

impl Role {
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "ADMIN" => Some(Role::Admin),
            "PENGELOLA" => Some(Role::Pengelola),
            "PENGHUNI" => Some(Role::Penghuni),
            "TAMU" => Some(Role::Tamu),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Pengelola => "PENGELOLA",
            Role::Penghuni => "PENGHUNI",
            Role::Tamu => "TAMU",
        }
    }
}

/// Outcome of a capability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Granted,
    Denied(&'static str),
}

/// Denial carrying the reason shown to the caller
#[derive(Debug, Clone, Copy)]
pub struct AccessDenied(pub &'static str);

impl Decision {
    /// Convert the decision into a result usable with `?` in handlers
    pub fn require(self) -> Result<(), AccessDenied> {
        match self {
            Decision::Granted => Ok(()),
            Decision::Denied(reason) => Err(AccessDenied(reason)),
        }
    }
}

fn owner_or_admin(role: Role, actor_id: &str, owner_id: &str, denial: &'static str) -> Decision {
    match role {
        Role::Admin => Decision::Granted,
        Role::Pengelola if actor_id == owner_id => Decision::Granted,
        _ => Decision::Denied(denial),
    }
}

pub fn can_create_kost(role: Role) -> Decision {
    if role == Role::Pengelola {
        Decision::Granted
    } else {
        Decision::Denied("only a pengelola can create a kost listing")
    }
}

pub fn can_manage_kost(role: Role, actor_id: &str, kost_owner_id: &str) -> Decision {
    owner_or_admin(role, actor_id, kost_owner_id, "not the manager of this kost")
}

pub fn can_approve_kost(role: Role) -> Decision {
    if role == Role::Admin {
        Decision::Granted
    } else {
        Decision::Denied("only an admin can approve a kost listing")
    }
}

pub fn can_create_reservation(role: Role) -> Decision {
    if role == Role::Penghuni {
        Decision::Granted
    } else {
        Decision::Denied("only a penghuni can create a reservation")
    }
}

pub fn can_decide_reservation(role: Role, actor_id: &str, kost_owner_id: &str) -> Decision {
    owner_or_admin(
        role,
        actor_id,
        kost_owner_id,
        "not authorized to decide reservations for this kost",
    )
}

pub fn can_view_kost_reservations(role: Role, actor_id: &str, kost_owner_id: &str) -> Decision {
    owner_or_admin(
        role,
        actor_id,
        kost_owner_id,
        "not authorized to view reservations for this kost",
    )
}

pub fn can_extend_reservation(actor_id: &str, reservation_owner_id: &str) -> Decision {
    if actor_id == reservation_owner_id {
        Decision::Granted
    } else {
        Decision::Denied("only the reserving tenant can extend this reservation")
    }
}

pub fn can_manage_provider(role: Role, actor_id: &str, kost_owner_id: &str) -> Decision {
    owner_or_admin(
        role,
        actor_id,
        kost_owner_id,
        "not the manager of this provider's kost",
    )
}

pub fn can_place_order(role: Role) -> Decision {
    if role == Role::Penghuni {
        Decision::Granted
    } else {
        Decision::Denied("only a penghuni can place an order")
    }
}

pub fn can_update_order_status(role: Role, actor_id: &str, provider_owner_id: &str) -> Decision {
    owner_or_admin(
        role,
        actor_id,
        provider_owner_id,
        "not authorized to update orders for this provider",
    )
}

pub fn can_verify_payment(role: Role, actor_id: &str, provider_owner_id: &str) -> Decision {
    owner_or_admin(
        role,
        actor_id,
        provider_owner_id,
        "not authorized to verify payments for this provider",
    )
}

pub fn can_cancel_order(actor_id: &str, order_owner_id: &str) -> Decision {
    if actor_id == order_owner_id {
        Decision::Granted
    } else {
        Decision::Denied("only the ordering tenant can cancel this order")
    }
}

pub fn can_manage_master(role: Role) -> Decision {
    if role == Role::Admin {
        Decision::Granted
    } else {
        Decision::Denied("only an admin can manage master data")
    }
}

pub fn can_manage_users(role: Role) -> Decision {
    if role == Role::Admin {
        Decision::Granted
    } else {
        Decision::Denied("only an admin can manage users")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::Admin, Role::Pengelola, Role::Penghuni, Role::Tamu] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("SUPERUSER"), None);
    }

    #[test]
    fn test_decide_reservation_requires_owning_pengelola() {
        // Manager of a different kost is denied, reservation untouched (403 path)
        let decision = can_decide_reservation(Role::Pengelola, "manager-b", "manager-a");
        assert!(matches!(decision, Decision::Denied(_)));

        assert_eq!(
            can_decide_reservation(Role::Pengelola, "manager-a", "manager-a"),
            Decision::Granted
        );
        assert_eq!(
            can_decide_reservation(Role::Admin, "anyone", "manager-a"),
            Decision::Granted
        );
        assert!(matches!(
            can_decide_reservation(Role::Penghuni, "manager-a", "manager-a"),
            Decision::Denied(_)
        ));
    }

    #[test]
    fn test_tenant_only_checks() {
        assert_eq!(can_create_reservation(Role::Penghuni), Decision::Granted);
        assert!(matches!(can_create_reservation(Role::Tamu), Decision::Denied(_)));
        assert!(matches!(can_place_order(Role::Pengelola), Decision::Denied(_)));

        assert_eq!(can_cancel_order("tenant-1", "tenant-1"), Decision::Granted);
        assert!(matches!(can_cancel_order("tenant-2", "tenant-1"), Decision::Denied(_)));
        assert!(matches!(
            can_extend_reservation("tenant-2", "tenant-1"),
            Decision::Denied(_)
        ));
    }

    #[test]
    fn test_admin_only_checks() {
        assert_eq!(can_approve_kost(Role::Admin), Decision::Granted);
        assert!(matches!(can_approve_kost(Role::Pengelola), Decision::Denied(_)));
        assert_eq!(can_manage_master(Role::Admin), Decision::Granted);
        assert!(matches!(can_manage_users(Role::Penghuni), Decision::Denied(_)));
    }
}
