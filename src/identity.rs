//! Identity collaborator: who is signed in.

use std::sync::{Mutex, PoisonError};

use crate::error::IdentityError;

/// Source of the current user id.
///
/// A missing id is allowed; records are then written without an owner.
pub trait Identity: Send + Sync {
    /// Id of the signed-in user, if any.
    fn current_user_id(&self) -> Option<String>;

    /// End the current session.
    fn sign_out(&self) -> Result<(), IdentityError>;
}

/// Identity with a fixed user id until [`Identity::sign_out`] is called.
#[derive(Debug, Default)]
pub struct StaticIdentity {
    user_id: Mutex<Option<String>>,
}

impl StaticIdentity {
    /// Signed in as `user_id`.
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Mutex::new(Some(user_id.into())),
        }
    }

    /// Nobody signed in.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl Identity for StaticIdentity {
    fn current_user_id(&self) -> Option<String> {
        self.user_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn sign_out(&self) -> Result<(), IdentityError> {
        let previous = self
            .user_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(user) = previous {
            log::info!("signed out user {user}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_out_clears_user() {
        let id = StaticIdentity::signed_in("u-1");
        assert_eq!(id.current_user_id().as_deref(), Some("u-1"));
        id.sign_out().unwrap();
        assert_eq!(id.current_user_id(), None);
        // Signing out twice is harmless.
        id.sign_out().unwrap();
    }

    #[test]
    fn anonymous_has_no_user() {
        assert_eq!(StaticIdentity::anonymous().current_user_id(), None);
    }
}
