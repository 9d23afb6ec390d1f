//! Authentication seam.
//!
//! The dashboard talks to an `AuthProvider`. `AuthGateway` sits in front of
//! it: the demo credential pair never reaches the provider, and every
//! credential failure is reported with the same message so callers cannot
//! tell an unknown account from a wrong password.

use crate::error::AuthError;
use crate::models::validation::is_valid_email;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, Weak};

pub const DEMO_EMAIL: &str = "demo@qatrack.dev";
pub const DEMO_PASSWORD: &str = "demo1234";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

pub type AuthCallback = Box<dyn Fn(Option<&AuthUser>) + Send + Sync>;

type Listener = Arc<dyn Fn(Option<&AuthUser>) + Send + Sync>;
type ListenerMap = Mutex<BTreeMap<u64, Listener>>;

/// Handle returned by `on_auth_state_change`. Dropping it keeps the listener.
pub struct Subscription {
    id: u64,
    listeners: Weak<ListenerMap>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            if let Ok(mut map) = listeners.lock() {
                map.remove(&self.id);
            }
        }
    }
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;
    async fn sign_out(&self);
    async fn reset_password(&self, email: &str) -> Result<(), AuthError>;
    fn on_auth_state_change(&self, callback: AuthCallback) -> Subscription;
}

/// Fan-out of auth state changes to registered callbacks.
#[derive(Default)]
pub struct AuthListeners {
    next_id: Mutex<u64>,
    listeners: Arc<ListenerMap>,
}

impl AuthListeners {
    pub fn subscribe(&self, callback: AuthCallback) -> Subscription {
        let id = match self.next_id.lock() {
            Ok(mut next) => {
                *next += 1;
                *next
            }
            Err(_) => 0,
        };
        if let Ok(mut map) = self.listeners.lock() {
            map.insert(id, Arc::from(callback));
        }
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Callbacks run in subscription order with the registry unlocked, so a
    /// callback may subscribe or unsubscribe.
    pub fn notify(&self, user: Option<&AuthUser>) {
        let callbacks: Vec<Listener> = match self.listeners.lock() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => return,
        };
        for callback in callbacks {
            callback(user);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct Account {
    password: String,
    user: AuthUser,
}

/// Provider backed by a fixed account table. Used for local runs and tests.
#[derive(Default)]
pub struct InMemoryAuthProvider {
    accounts: Mutex<HashMap<String, Account>>,
    current: Mutex<Option<AuthUser>>,
    reset_requests: Mutex<Vec<String>>,
    listeners: AuthListeners,
}

impl InMemoryAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, user: AuthUser, password: &str) {
        if let Ok(mut accounts) = self.accounts.lock() {
            accounts.insert(
                user.email.to_lowercase(),
                Account {
                    password: password.to_string(),
                    user,
                },
            );
        }
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.current.lock().ok().and_then(|c| c.clone())
    }

    /// Addresses that asked for a reset and have an account.
    pub fn reset_requests(&self) -> Vec<String> {
        self.reset_requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn set_current(&self, user: Option<AuthUser>) {
        if let Ok(mut current) = self.current.lock() {
            *current = user.clone();
        }
        self.listeners.notify(user.as_ref());
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let user = {
            let accounts = self
                .accounts
                .lock()
                .map_err(|_| AuthError::Provider("account table poisoned".to_string()))?;
            match accounts.get(&email.trim().to_lowercase()) {
                Some(account) if account.password == password => account.user.clone(),
                _ => return Err(AuthError::InvalidCredentials),
            }
        };
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) {
        self.set_current(None);
    }

    async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        let key = email.trim().to_lowercase();
        let known = self
            .accounts
            .lock()
            .map(|accounts| accounts.contains_key(&key))
            .unwrap_or(false);
        if known {
            if let Ok(mut requests) = self.reset_requests.lock() {
                requests.push(key);
            }
        }
        Ok(())
    }

    fn on_auth_state_change(&self, callback: AuthCallback) -> Subscription {
        self.listeners.subscribe(callback)
    }
}

/// Front door for sign-in. Wraps the configured provider.
pub struct AuthGateway {
    provider: Arc<dyn AuthProvider>,
}

impl AuthGateway {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self { provider }
    }

    pub fn demo_user() -> AuthUser {
        AuthUser {
            id: "demo-user".to_string(),
            email: DEMO_EMAIL.to_string(),
            name: "Demo User".to_string(),
            role: "Admin".to_string(),
        }
    }

    pub fn is_demo_credentials(email: &str, password: &str) -> bool {
        email.trim().eq_ignore_ascii_case(DEMO_EMAIL) && password == DEMO_PASSWORD
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        if !is_valid_email(email) {
            return Err(AuthError::MalformedEmail);
        }

        if Self::is_demo_credentials(email, password) {
            log::info!("demo sign-in bypassing auth provider");
            return Ok(Self::demo_user());
        }

        match self.provider.sign_in(email, password).await {
            Ok(user) => {
                log::info!("signed in {}", user.email);
                Ok(user)
            }
            Err(err) => {
                log::warn!("sign-in rejected: {err}");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    pub async fn sign_out(&self) {
        self.provider.sign_out().await;
    }

    pub async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        if !is_valid_email(email) {
            return Err(AuthError::MalformedEmail);
        }
        self.provider.reset_password(email).await
    }

    pub fn on_auth_state_change(&self, callback: AuthCallback) -> Subscription {
        self.provider.on_auth_state_change(callback)
    }
}
