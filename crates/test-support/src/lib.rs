use std::sync::{Mutex, MutexGuard, OnceLock};

pub use tempfile::TempDir;

pub fn test_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

/// Holds the process-wide env lock and restores every variable it touched on drop.
pub struct EnvGuard {
    _lock: MutexGuard<'static, ()>,
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub fn new() -> Self {
        let lock = test_lock().lock().unwrap_or_else(|err| err.into_inner());
        Self {
            _lock: lock,
            saved: Vec::new(),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.remember(key);
        // SAFETY: tests mutating the environment are serialized by test_lock.
        unsafe {
            std::env::set_var(key, value);
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.remember(key);
        // SAFETY: tests mutating the environment are serialized by test_lock.
        unsafe {
            std::env::remove_var(key);
        }
    }

    fn remember(&mut self, key: &str) {
        if self.saved.iter().all(|(saved, _)| saved != key) {
            self.saved.push((key.to_string(), std::env::var(key).ok()));
        }
    }
}

impl Default for EnvGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: tests mutating the environment are serialized by test_lock.
        unsafe {
            for (key, previous) in self.saved.drain(..).rev() {
                match previous {
                    Some(value) => std::env::set_var(&key, value),
                    None => std::env::remove_var(&key),
                }
            }
        }
    }
}
