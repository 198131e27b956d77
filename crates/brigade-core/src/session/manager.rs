use super::config::SessionConfig;
use super::state::{Route, SessionPhase, SessionSnapshot, resolve_active_role};
use super::writer::{Entry, SessionWriter};
use crate::auth::Authenticator;
use crate::error::{BrigadeError, Result};
use crate::role::RoleId;
use crate::storage::{SessionStorage, StorageKey};
use crate::user::{Business, Credentials, SessionSeed, User};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::runtime::Handle;
use tokio::sync::watch;

/// Owns the signed-in user, their active role and the persisted session.
///
/// `SessionManager` is responsible for:
/// - Restoring the previous session at startup (`initialize`)
/// - Signing in through an [`Authenticator`] (`login`)
/// - Choosing the active role among the granted ones (`switch_role`)
/// - Signing out and purging storage (`logout`)
/// - Publishing every state change to subscribers
///
/// Share it as `Arc<SessionManager>`; front ends observe it through
/// [`subscribe`](Self::subscribe) and never read the storage keys directly.
pub struct SessionManager {
    state: watch::Sender<SessionSnapshot>,
    storage: Arc<dyn SessionStorage>,
    authenticator: Arc<dyn Authenticator>,
    writer: SessionWriter,
    login_in_flight: AtomicBool,
    /// Bumped by every `logout`; a login that started before the bump is void.
    sign_out_epoch: AtomicU64,
    config: SessionConfig,
}

impl SessionManager {
    /// Creates a manager with the default [`SessionConfig`].
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime; the background writer is
    /// spawned onto the current runtime.
    pub fn new(storage: Arc<dyn SessionStorage>, authenticator: Arc<dyn Authenticator>) -> Self {
        Self::with_config(storage, authenticator, SessionConfig::default())
    }

    /// Creates a manager with explicit tunables.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn with_config(
        storage: Arc<dyn SessionStorage>,
        authenticator: Arc<dyn Authenticator>,
        config: SessionConfig,
    ) -> Self {
        let writer = SessionWriter::spawn(
            &Handle::current(),
            Arc::clone(&storage),
            Arc::clone(&authenticator),
            config.purge_retries,
        );
        let (state, _) = watch::channel(SessionSnapshot::default());

        Self {
            state,
            storage,
            authenticator,
            writer,
            login_in_flight: AtomicBool::new(false),
            sign_out_epoch: AtomicU64::new(0),
            config,
        }
    }

    // ============================================================================
    // Observation
    // ============================================================================

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Returns a receiver that sees every subsequent state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase()
    }

    pub fn route(&self) -> Route {
        self.state.borrow().route()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn active_role(&self) -> Option<RoleId> {
        self.state.borrow().active_role
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    pub fn business(&self) -> Option<Business> {
        self.state.borrow().business().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token().map(str::to_string)
    }

    pub fn has_role(&self, role: RoleId) -> bool {
        self.state.borrow().has_role(role)
    }

    pub fn has_any_role(&self, roles: &[RoleId]) -> bool {
        self.state.borrow().has_any_role(roles)
    }

    /// Roles the role selector should offer, in display order.
    pub fn available_roles(&self) -> Vec<RoleId> {
        self.state
            .borrow()
            .user()
            .map(|user| user.roles.iter().copied().collect())
            .unwrap_or_default()
    }

    // ============================================================================
    // Lifecycle
    // ============================================================================

    /// Restores the persisted session. Call once at startup.
    ///
    /// Never fails: unreadable or incomplete storage means starting signed
    /// out. Until this returns, `route()` reports [`Route::Splash`]. A call
    /// that overlaps a running one waits for it to finish.
    pub async fn initialize(&self) {
        let mut in_progress = false;
        let started = self.state.send_if_modified(|s| {
            if s.initialized {
                return false;
            }
            if s.is_loading {
                in_progress = true;
                return false;
            }
            s.is_loading = true;
            true
        });
        if in_progress {
            tracing::debug!("initialization already running; waiting for it");
            let mut rx = self.state.subscribe();
            let _ = rx.wait_for(|s| s.initialized).await;
            return;
        }
        if !started {
            tracing::warn!("session manager already initialized; ignoring");
            return;
        }

        let restored = match self.rehydrate().await {
            Ok(restored) => restored,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "could not restore persisted session; starting signed out"
                );
                None
            }
        };

        match &restored {
            Some((seed, role)) => tracing::info!(
                username = %seed.user.username,
                active_role = ?role,
                "restored persisted session"
            ),
            None => tracing::debug!("no persisted session"),
        }

        self.state.send_modify(|s| {
            match restored {
                Some((seed, role)) => {
                    s.identity = Some(seed);
                    s.active_role = role;
                }
                None => {
                    s.identity = None;
                    s.active_role = None;
                }
            }
            s.is_loading = false;
            s.initialized = true;
        });
    }

    async fn rehydrate(&self) -> Result<Option<(SessionSeed, Option<RoleId>)>> {
        let user = self.storage.get(StorageKey::User).await?;
        let business = self.storage.get(StorageKey::Business).await?;
        let token = self.storage.get(StorageKey::Token).await?;
        let role = self.storage.get(StorageKey::CurrentRole).await?;

        let (Some(user), Some(business), Some(token)) = (user, business, token) else {
            return Ok(None);
        };
        if token.is_empty() {
            return Ok(None);
        }

        let user: User = serde_json::from_str(&user)?;
        let business: Business = serde_json::from_str(&business)?;
        if user.roles.is_empty() {
            tracing::warn!(username = %user.username, "persisted user has no roles; ignoring");
            return Ok(None);
        }

        let persisted_role = role.and_then(|raw| match RoleId::from_str(&raw) {
            Ok(role) => Some(role),
            Err(_) => {
                tracing::warn!(role = %raw, "ignoring unknown persisted role");
                None
            }
        });
        let active_role = resolve_active_role(&user, persisted_role);

        Ok(Some((
            SessionSeed {
                user,
                business,
                token,
            },
            active_role,
        )))
    }

    /// Signs in with `credentials`.
    ///
    /// On failure the current session is left exactly as it was and nothing
    /// is written. Signing in over an existing session revokes its token. A
    /// second call while one is in flight is rejected with
    /// [`BrigadeError::LoginInProgress`].
    ///
    /// # Errors
    ///
    /// - `Validation` for a blank username or password
    /// - `NotInitialized` before [`initialize`](Self::initialize) completes
    /// - `LoginInProgress`, `Timeout`, or the authenticator's rejection
    /// - `Authentication` when [`logout`](Self::logout) ran while the
    ///   credentials were being verified
    pub async fn login(&self, credentials: Credentials) -> Result<User> {
        credentials.validate()?;
        if !self.state.borrow().initialized {
            return Err(BrigadeError::NotInitialized);
        }
        let _guard = LoginGuard::acquire(&self.login_in_flight, &self.state)
            .ok_or(BrigadeError::LoginInProgress)?;
        let epoch = self.sign_out_epoch.load(Ordering::Acquire);

        let seed = match self.verify(&credentials).await {
            Ok(seed) => seed,
            Err(e) => {
                tracing::info!(username = %credentials.username, error = %e, "login rejected");
                return Err(e);
            }
        };

        let active_role = resolve_active_role(&seed.user, None);
        let entries = match session_entries(&seed, active_role) {
            Ok(entries) => Some(entries),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "could not encode session; it will not survive a restart"
                );
                None
            }
        };
        let user = seed.user.clone();
        let token = seed.token.clone();

        // Writes are queued under the state lock so a concurrent logout's
        // purge is ordered either entirely before or entirely after them.
        let mut pending = None;
        let mut replaced = None;
        let committed = self.state.send_if_modified(|s| {
            if self.sign_out_epoch.load(Ordering::Acquire) != epoch {
                return false;
            }
            replaced = s.identity.replace(seed).map(|previous| previous.token);
            s.active_role = active_role;
            pending = entries.map(|entries| self.writer.submit(entries));
            true
        });

        if !committed {
            tracing::info!(
                username = %user.username,
                "signed out while signing in; discarding session"
            );
            self.writer.revoke(token);
            return Err(BrigadeError::authentication("Session was signed out during login"));
        }
        if let Some(previous) = replaced.filter(|previous| *previous != token) {
            tracing::debug!("revoking the token of the replaced session");
            self.writer.revoke(previous);
        }
        tracing::info!(
            username = %user.username,
            roles = ?user.roles,
            active_role = ?active_role,
            "signed in"
        );

        if let Some(pending) = pending {
            if let Err(e) = pending.wait().await {
                tracing::warn!(
                    error = %e,
                    "could not persist session; it will not survive a restart"
                );
            }
        }

        Ok(user)
    }

    async fn verify(&self, credentials: &Credentials) -> Result<SessionSeed> {
        let timeout = self.config.login_timeout();
        let seed = tokio::time::timeout(timeout, self.authenticator.verify_credentials(credentials))
            .await
            .map_err(|_| {
                BrigadeError::Timeout(format!(
                    "authentication did not respond within {} ms",
                    timeout.as_millis()
                ))
            })??;

        if seed.token.is_empty() {
            return Err(BrigadeError::authentication("Authentication service returned no token"));
        }
        if seed.user.roles.is_empty() {
            return Err(BrigadeError::authentication("This account has no roles assigned"));
        }
        Ok(seed)
    }

    /// Makes `role` the active role.
    ///
    /// Returns `false` without touching anything when nobody is signed in or
    /// `role` is not granted to the user. The in-memory change is immediate;
    /// persisting it happens in the background and a failure there does not
    /// undo it.
    pub fn switch_role(&self, role: RoleId) -> bool {
        let accepted = self.state.send_if_modified(|s| {
            if !s.has_role(role) {
                return false;
            }
            s.active_role = Some(role);
            self.writer.enqueue(vec![role_entry(Some(role))]);
            true
        });

        if !accepted {
            tracing::warn!(%role, "rejected switch to a role the user does not hold");
            return false;
        }

        tracing::info!(%role, "active role switched");
        true
    }

    /// Replaces the signed-in user's record, e.g. after a profile edit or a
    /// server-side role change. The active role is re-resolved against the
    /// new role set.
    ///
    /// # Errors
    ///
    /// - `NotAuthenticated` when nobody is signed in
    /// - `Validation` when `user.id` differs or the role set is empty
    pub async fn update_user(&self, user: User) -> Result<()> {
        if user.roles.is_empty() {
            return Err(BrigadeError::validation("A user must keep at least one role"));
        }

        let json = match serde_json::to_string(&user) {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::warn!(error = %e, "could not encode updated user");
                None
            }
        };

        let mut outcome = Err(BrigadeError::NotAuthenticated);
        let mut active_role = None;
        let mut pending = None;
        self.state.send_if_modified(|s| {
            let Some(identity) = s.identity.as_mut() else {
                return false;
            };
            if identity.user.id != user.id {
                outcome = Err(BrigadeError::validation(format!(
                    "Cannot replace user '{}' with '{}'",
                    identity.user.id, user.id
                )));
                return false;
            }
            active_role = resolve_active_role(&user, s.active_role);
            identity.user = user.clone();
            s.active_role = active_role;
            pending = json.map(|json| {
                self.writer
                    .submit(vec![(StorageKey::User, Some(json)), role_entry(active_role)])
            });
            outcome = Ok(());
            true
        });
        outcome?;

        tracing::info!(
            username = %user.username,
            active_role = ?active_role,
            "user record updated"
        );

        if let Some(pending) = pending {
            if let Err(e) = pending.wait().await {
                tracing::warn!(error = %e, "could not persist updated user");
            }
        }
        Ok(())
    }

    /// Signs out. Always succeeds and is safe to call repeatedly.
    ///
    /// Memory is cleared immediately. Purging storage and revoking the token
    /// with the backend happen in the background.
    pub fn logout(&self) {
        let mut previous = None;
        self.state.send_if_modified(|s| {
            self.sign_out_epoch.fetch_add(1, Ordering::AcqRel);
            previous = s.identity.take();
            let changed = previous.is_some() || s.active_role.is_some();
            s.active_role = None;
            self.writer.purge();
            changed
        });

        match previous {
            Some(seed) => {
                self.writer.revoke(seed.token);
                tracing::info!(username = %seed.user.username, "signed out");
            }
            None => tracing::debug!("logout with no active session"),
        }
    }

    /// Waits until all queued background work (writes, purges, revocations)
    /// has finished. Short-lived processes should call this before exiting.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }
}

fn role_entry(role: Option<RoleId>) -> Entry {
    (
        StorageKey::CurrentRole,
        role.map(|role| role.as_str().to_string()),
    )
}

fn session_entries(seed: &SessionSeed, active_role: Option<RoleId>) -> Result<Vec<Entry>> {
    Ok(vec![
        (StorageKey::User, Some(serde_json::to_string(&seed.user)?)),
        (
            StorageKey::Business,
            Some(serde_json::to_string(&seed.business)?),
        ),
        (StorageKey::Token, Some(seed.token.clone())),
        role_entry(active_role),
    ])
}

/// Marks a login as in flight. Dropping it (including when the login future
/// is cancelled) clears the flag and the loading indicator.
struct LoginGuard<'a> {
    flag: &'a AtomicBool,
    state: &'a watch::Sender<SessionSnapshot>,
}

impl<'a> LoginGuard<'a> {
    fn acquire(flag: &'a AtomicBool, state: &'a watch::Sender<SessionSnapshot>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        state.send_modify(|s| s.is_loading = true);
        Some(Self { flag, state })
    }
}

impl Drop for LoginGuard<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| std::mem::replace(&mut s.is_loading, false));
        self.flag.store(false, Ordering::Release);
    }
}
