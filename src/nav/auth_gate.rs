//! Auth gate: turn the auth-check endpoint into a [`Session`].
//!
//! The session is never cached; every routing decision asks again. Any
//! failure (network, status, undecodable body) yields an anonymous session.

use portal_wire::{CheckAuthResponse, Role};
use std::rc::Rc;
use tracing::{debug, warn};

use crate::api::AuthService;

/// Result of one auth check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub is_authenticated: bool,
    /// `None` for anonymous sessions and for roles the portal does not know
    pub role: Option<Role>,
    /// Role-profile id (driver id, supplier id, ...)
    pub user_id: Option<i64>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Dashboard URL this session lands on after login.
    pub fn landing_url(&self) -> Option<String> {
        if !self.is_authenticated {
            return None;
        }
        self.role.map(|role| role.landing_url(self.user_id))
    }
}

impl From<CheckAuthResponse> for Session {
    fn from(response: CheckAuthResponse) -> Self {
        if !response.is_auth {
            return Self::anonymous();
        }
        let Some(user) = response.user else {
            warn!("Authenticated session without user details");
            return Self {
                is_authenticated: true,
                ..Self::default()
            };
        };
        let role = match user.role.parse::<Role>() {
            Ok(role) => Some(role),
            Err(e) => {
                warn!(error = %e, "Session role has no dashboard");
                None
            }
        };
        Self {
            is_authenticated: true,
            role,
            user_id: user.id,
        }
    }
}

#[derive(Clone)]
pub struct AuthGate {
    auth: Rc<dyn AuthService>,
}

impl AuthGate {
    pub fn new(auth: Rc<dyn AuthService>) -> Self {
        Self { auth }
    }

    pub async fn check_auth(&self) -> Session {
        match self.auth.check_auth().await {
            Ok(response) => {
                let session = Session::from(response);
                debug!(
                    authenticated = session.is_authenticated,
                    role = ?session.role,
                    "Auth check"
                );
                session
            }
            Err(e) => {
                warn!(error = %e, "Auth check failed, treating session as anonymous");
                Session::anonymous()
            }
        }
    }
}
