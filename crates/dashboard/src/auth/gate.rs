//! Protected route gate
//!
//! Decides once, on mount, whether a protected view may render. There is no
//! re-check on later navigation within the same session.

use super::guard::SessionGuard;
use crate::navigation::LOGIN_PATH;
use calltrack_core::{Session, UserProfile};
use tracing::{debug, info, warn};

/// Lifecycle of a protected view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// Waiting on the session guard
    Checking,
    /// A valid credential exists; carries the profile when one was fetched
    Authenticated(Option<UserProfile>),
    /// Children are shown
    Rendering,
    /// No usable credential or the profile fetch failed
    Unauthenticated,
    /// Sent to the login page. Terminal.
    Redirected { to: &'static str },
}

impl GateState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rendering | Self::Redirected { .. })
    }
}

#[derive(Debug)]
pub struct RouteGate {
    guard: SessionGuard,
    fetch_profile: bool,
    state: GateState,
    user: Option<UserProfile>,
}

impl RouteGate {
    pub fn new(guard: SessionGuard) -> Self {
        Self {
            guard,
            fetch_profile: true,
            state: GateState::Checking,
            user: None,
        }
    }

    /// Skip the `/auth/me` round-trip after the credential check
    #[must_use]
    pub fn with_profile_fetch(mut self, enabled: bool) -> Self {
        self.fetch_profile = enabled;
        self
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// The session established by [`Self::mount`]
    pub fn session(&self) -> Session {
        match self.state {
            GateState::Authenticated(_) | GateState::Rendering => {
                Session::authenticated(self.user.clone())
            }
            _ => Session::anonymous(),
        }
    }

    /// Run the credential check. Returns the state reached, either
    /// `Authenticated` or `Redirected`.
    pub async fn mount(&mut self) -> &GateState {
        if self.state != GateState::Checking {
            debug!(state = ?self.state, "route gate already mounted");
            return &self.state;
        }

        let Some(token) = self.guard.get_valid_credential().await else {
            info!("no valid credential, redirecting to login");
            return self.redirect().await;
        };

        if self.fetch_profile {
            match self.guard.client().authenticate(token).me().await {
                Ok(user) => {
                    debug!(user_id = %user.id, "profile loaded");
                    self.user = Some(user);
                }
                Err(e) => {
                    warn!(error = %e, "profile fetch failed, redirecting to login");
                    return self.redirect().await;
                }
            }
        }

        self.state = GateState::Authenticated(self.user.clone());
        &self.state
    }

    /// Show the protected children. Only valid once authenticated.
    pub fn render(&mut self) -> &GateState {
        if matches!(self.state, GateState::Authenticated(_)) {
            self.state = GateState::Rendering;
        }
        &self.state
    }

    async fn redirect(&mut self) -> &GateState {
        self.state = GateState::Unauthenticated;
        self.user = None;
        self.guard.clear_session().await;
        self.state = GateState::Redirected { to: LOGIN_PATH };
        &self.state
    }
}
