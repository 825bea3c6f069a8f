//! Actor context passed into every operation that needs an identity or role.
//!
//! Always handed in by reference from the transport layer; never a
//! module-level singleton.

use sprawl_domain::UserId;

/// Role attached to an authenticated user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Player,
    Admin,
}

/// An authenticated actor
#[derive(Debug, Clone, Copy)]
pub struct Session {
    pub user_id: UserId,
    pub role: Role,
}

impl Session {
    pub fn player(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Player,
        }
    }

    pub fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether this actor may act on a sheet owned by `owner`.
    pub fn can_act_for(&self, owner: UserId) -> bool {
        self.is_admin() || self.user_id == owner
    }
}
