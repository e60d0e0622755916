use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use dreamhome_protocol::User;
use tracing::debug;

/// Snapshot of the sign-in state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub current_user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Shared handle over the signed-in user.
///
/// Clones observe the same state. Each transition replaces the fields it
/// owns and leaves nothing half-updated.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks a sign-in attempt as in flight and clears the last error.
    pub fn sign_in_start(&self) {
        let mut state = self.write();
        state.loading = true;
        state.error = None;
    }

    pub fn sign_in_success(&self, user: User) {
        debug!(user = %user.username, "session started");
        let mut state = self.write();
        state.current_user = Some(user);
        state.loading = false;
        state.error = None;
    }

    /// Records a failed attempt. A previously signed-in user is kept.
    pub fn sign_in_failure(&self, message: impl Into<String>) {
        let mut state = self.write();
        state.loading = false;
        state.error = Some(message.into());
    }

    /// Replaces the stored user, e.g. after an avatar change.
    pub fn update_user(&self, user: User) {
        self.write().current_user = Some(user);
    }

    pub fn sign_out(&self) {
        debug!("session cleared");
        *self.write() = SessionState::default();
    }

    pub fn current_user(&self) -> Option<User> {
        self.read().current_user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn snapshot(&self) -> SessionState {
        self.read().clone()
    }
}
