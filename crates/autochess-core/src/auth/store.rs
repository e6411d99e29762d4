//! The authentication state store.
//!
//! `AuthStore` owns the in-memory `Session` and is the only thing that
//! changes it, through `commit`. Its two actions drive the login state
//! machine:
//!
//! ```text
//! Unauthenticated --check_credentials(ok)--> Authenticated
//! Unauthenticated --check_credentials(err)--> Unauthenticated
//! Authenticated   --log_out---------------> Unauthenticated
//! ```
//!
//! `Authenticating` is reported while the single in-flight login request is
//! pending. A failed login clears the in-memory token but leaves the
//! persisted one in place; it is read back on the next start.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

use crate::api::{LoginBackend, ResponseContract};

use super::{AuthError, AuthStatus, Credentials, Mutation, Session, TokenStorage, User};

type LoginFuture = Shared<BoxFuture<'static, Result<String, AuthError>>>;

struct InFlight {
    credentials: Credentials,
    future: LoginFuture,
}

struct Inner {
    session: RwLock<Session>,
    backend: Arc<dyn LoginBackend>,
    storage: Arc<dyn TokenStorage>,
    contract: ResponseContract,
    in_flight: Mutex<Option<InFlight>>,
    status_tx: watch::Sender<AuthStatus>,
}

/// Handle to the auth store. Clones share the same state.
#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<Inner>,
}

impl AuthStore {
    /// Create the store, restoring the token from durable storage.
    pub fn new(
        backend: Arc<dyn LoginBackend>,
        storage: Arc<dyn TokenStorage>,
        contract: ResponseContract,
    ) -> Self {
        let token = match storage.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to load persisted token, starting logged out");
                None
            }
        };
        debug!(has_token = token.is_some(), "Auth store initialized");

        let session = Session::with_token(token);
        let (status_tx, _) = watch::channel(session.status());

        Self {
            inner: Arc::new(Inner {
                session: RwLock::new(session),
                backend,
                storage,
                contract,
                in_flight: Mutex::new(None),
                status_tx,
            }),
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn token(&self) -> Option<String> {
        self.inner.read_session().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.read_session().user.clone()
    }

    pub fn session(&self) -> Session {
        self.inner.read_session().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read_session().is_authenticated()
    }

    pub fn status(&self) -> AuthStatus {
        self.inner.status()
    }

    /// Watch status transitions. The receiver starts at the current status.
    pub fn subscribe(&self) -> watch::Receiver<AuthStatus> {
        self.inner.status_tx.subscribe()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn commit(&self, mutation: Mutation) {
        self.inner.apply(&mutation);
        self.inner.publish();
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Exchange credentials for a token.
    ///
    /// On success the token is persisted and committed. Any failure (rejected
    /// login, transport error, storage write error) commits `LoginFailure` and
    /// is returned to the caller. A call made while another login with the
    /// same email and password is pending joins it; any other call is refused
    /// with `AuthError::LoginInProgress` and leaves state untouched.
    pub async fn check_credentials(&self, credentials: Credentials) -> Result<String, AuthError> {
        let future = {
            let mut slot = self
                .inner
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            match slot.as_ref() {
                Some(pending) if pending.credentials == credentials => {
                    debug!(email = %credentials.email, "Joining in-flight login");
                    pending.future.clone()
                }
                Some(pending) => {
                    warn!(
                        pending = %pending.credentials.email,
                        email = %credentials.email,
                        "Login refused, another login is in flight"
                    );
                    return Err(AuthError::LoginInProgress);
                }
                None => {
                    let future = Inner::start_login(Arc::clone(&self.inner), credentials.clone());
                    *slot = Some(InFlight {
                        credentials,
                        future: future.clone(),
                    });
                    future
                }
            }
        };

        self.inner.publish();
        future.await
    }

    /// Forget the token, in memory and in durable storage. Never fails.
    pub fn log_out(&self) {
        if let Err(e) = self.inner.storage.remove() {
            warn!(error = %e, "Failed to remove persisted token");
        }
        self.commit(Mutation::Logout);
        info!("Logged out");
    }
}

impl Inner {
    fn read_session(&self) -> std::sync::RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn status(&self) -> AuthStatus {
        let slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        self.status_locked(slot.is_some())
    }

    fn status_locked(&self, in_flight: bool) -> AuthStatus {
        if in_flight {
            AuthStatus::Authenticating
        } else {
            self.read_session().status()
        }
    }

    /// Compute and send under the slot lock so a finishing login's status
    /// cannot be overwritten by one computed before it finished.
    fn publish(&self) {
        let slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        self.status_tx.send_replace(self.status_locked(slot.is_some()));
    }

    fn apply(&self, mutation: &Mutation) {
        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        session.apply(mutation);
        trace!(mutation = mutation.name(), "Committed");
    }

    fn finish_in_flight(&self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    /// Spawn the login so it completes and clears the in-flight slot even if
    /// every caller stops waiting.
    fn start_login(inner: Arc<Inner>, credentials: Credentials) -> LoginFuture {
        let task = tokio::spawn(Inner::run_login(Arc::clone(&inner), credentials));

        async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    let err = AuthError::Interrupted(e.to_string());
                    inner.apply(&Mutation::LoginFailure(err.clone()));
                    inner.finish_in_flight();
                    inner.publish();
                    Err(err)
                }
            }
        }
        .boxed()
        .shared()
    }

    async fn run_login(inner: Arc<Inner>, credentials: Credentials) -> Result<String, AuthError> {
        let outcome = match inner.backend.login(&credentials).await {
            Ok(body) => match inner.contract.classify(&body) {
                Ok(token) => match inner.storage.save(&token) {
                    Ok(()) => Ok(token),
                    Err(e) => Err(AuthError::Storage(format!("{:#}", e))),
                },
                Err(rejection) => Err(AuthError::Rejected(rejection)),
            },
            Err(e) => Err(AuthError::Api(e)),
        };

        let mutation = match &outcome {
            Ok(token) => Mutation::LoginSuccess(token.clone()),
            Err(e) => Mutation::LoginFailure(e.clone()),
        };
        inner.apply(&mutation);
        inner.finish_in_flight();
        inner.publish();

        match &outcome {
            Ok(_) => info!(email = %credentials.email, "Login successful"),
            Err(e) => warn!(email = %credentials.email, error = %e, "Login failed"),
        }
        outcome
    }
}

// ============================================================================
// Tests
// ============================================================================
