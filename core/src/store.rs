//! Token and user persistence.
//!
//! # Design
//! Storage is a port, not a global: [`TokenStore`] is handed two
//! [`StoragePort`] adapters — a primary store and a cookie mirror — so the
//! same token is readable from both the client-side path (primary) and a
//! `Cookie`-header path (mirror), and tests can substitute [`MemoryStorage`]
//! for either. All operations are total: an unavailable medium reads as
//! absent and absorbs writes with a logged warning, and corrupt persisted
//! JSON reads as "no value" rather than raising.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::types::User;

/// Storage key for the raw token string.
pub const TOKEN_KEY: &str = "auth_token";
/// Storage key for the JSON-serialized [`User`].
pub const USER_KEY: &str = "auth_user";

/// Cookie lifetime for the token mirror: 7 days.
const COOKIE_MAX_AGE_SECS: u64 = 604_800;

/// Key-value storage seam. Implementations never fail: reads on an
/// unavailable medium yield `None`, writes become no-ops.
pub trait StoragePort: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory adapter, used as a test fake and for ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoragePort for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().ok()?;
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

/// Persistent-local adapter: a JSON string map on disk. An unreadable or
/// malformed file reads as an empty map.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> HashMap<String, String> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string(entries) {
            Ok(raw) => {
                if let Err(err) = fs::write(&self.path, raw) {
                    log::warn!("session storage write to {} failed: {err}", self.path.display());
                }
            }
            Err(err) => log::warn!("session storage encoding failed: {err}"),
        }
    }
}

impl StoragePort for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.load().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.load();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.load();
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }
}

struct CookieEntry {
    value: String,
    max_age: u64,
}

/// Cookie adapter: an in-process jar whose entries carry the documented
/// attributes (`path=/`, 7-day `max-age`, `SameSite=Lax`). Removal expires
/// the entry with `max-age=0` instead of deleting it, mirroring how a
/// browser is told to drop a cookie.
#[derive(Default)]
pub struct CookieStorage {
    jar: Mutex<HashMap<String, CookieEntry>>,
}

impl CookieStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for a `Cookie` request header covering all live entries, or
    /// `None` when the jar holds nothing live.
    pub fn header_value(&self) -> Option<String> {
        let jar = self.jar.lock().ok()?;
        let mut pairs: Vec<String> = jar
            .iter()
            .filter(|(_, entry)| entry.max_age > 0)
            .map(|(key, entry)| format!("{key}={}", entry.value))
            .collect();
        if pairs.is_empty() {
            return None;
        }
        pairs.sort();
        Some(pairs.join("; "))
    }

    /// The `Set-Cookie`-shaped attribute string for one key, or `None` if
    /// the key was never written.
    pub fn set_cookie_string(&self, key: &str) -> Option<String> {
        let jar = self.jar.lock().ok()?;
        let entry = jar.get(key)?;
        if entry.max_age == 0 {
            Some(format!("{key}=; path=/; max-age=0"))
        } else {
            Some(format!(
                "{key}={}; path=/; max-age={}; SameSite=Lax",
                entry.value, entry.max_age
            ))
        }
    }
}

impl StoragePort for CookieStorage {
    fn get(&self, key: &str) -> Option<String> {
        let jar = self.jar.lock().ok()?;
        let entry = jar.get(key)?;
        (entry.max_age > 0).then(|| entry.value.clone())
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut jar) = self.jar.lock() {
            jar.insert(
                key.to_string(),
                CookieEntry {
                    value: value.to_string(),
                    max_age: COOKIE_MAX_AGE_SECS,
                },
            );
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut jar) = self.jar.lock() {
            jar.insert(
                key.to_string(),
                CookieEntry {
                    value: String::new(),
                    max_age: 0,
                },
            );
        }
    }
}

/// Parse a raw `Cookie` header (`k=v; k2=v2`) into key/value pairs.
pub fn parse_cookie_header(header: &str) -> HashMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            let key = parts.next()?.to_string();
            if key.is_empty() {
                return None;
            }
            let value = parts.next().unwrap_or("").to_string();
            Some((key, value))
        })
        .collect()
}

/// Look up the token in a raw `Cookie` header — the read path for
/// server-rendered callers that only see headers.
pub fn token_from_cookie_header(header: &str) -> Option<String> {
    parse_cookie_header(header)
        .remove(TOKEN_KEY)
        .filter(|value| !value.is_empty())
}

/// Persists the token and user record across a primary store and a cookie
/// mirror. Cheap to clone; clones share the underlying adapters.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn StoragePort>,
    cookies: Arc<dyn StoragePort>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn StoragePort>, cookies: Arc<dyn StoragePort>) -> Self {
        Self { storage, cookies }
    }

    /// Fully in-memory store, for tests and ephemeral sessions.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), Arc::new(CookieStorage::new()))
    }

    /// Write the token to the primary store and mirror it into the cookie
    /// jar so header-reading callers see the same identity.
    pub fn save_token(&self, token: &str) {
        self.storage.set(TOKEN_KEY, token);
        self.cookies.set(TOKEN_KEY, token);
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY)
    }

    /// Clear token and user from the primary store and expire the cookie.
    pub fn remove_token(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
        self.cookies.remove(TOKEN_KEY);
    }

    pub fn save_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(raw) => self.storage.set(USER_KEY, &raw),
            Err(err) => log::warn!("user record encoding failed: {err}"),
        }
    }

    /// The stored user record; malformed stored JSON reads as `None`.
    pub fn user(&self) -> Option<User> {
        let raw = self.storage.get(USER_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    /// True iff a non-empty token is stored.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some_and(|token| !token.is_empty())
    }
}
