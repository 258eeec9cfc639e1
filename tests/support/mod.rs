use std::env;
use std::ffi::OsString;
use std::sync::{LazyLock, Mutex, MutexGuard};

static ENV_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Holds the environment lock while one variable is overridden, restoring
/// its previous value on drop.
pub struct EnvVarGuard {
    key: String,
    previous: Option<OsString>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    #[must_use]
    pub fn set(key: &str, val: &str) -> Self {
        Self::apply(key, Some(val))
    }

    #[must_use]
    pub fn unset(key: &str) -> Self {
        Self::apply(key, None)
    }

    fn apply(key: &str, val: Option<&str>) -> Self {
        let lock = ENV_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let previous = env::var_os(key);
        // Safety: process-wide env mutation is synchronised by ENV_LOCK.
        unsafe {
            match val {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
        Self {
            key: key.to_owned(),
            previous,
            _lock: lock,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        // Safety: process-wide env mutation is synchronised by ENV_LOCK.
        unsafe {
            match self.previous.take() {
                Some(previous) => env::set_var(&self.key, previous),
                None => env::remove_var(&self.key),
            }
        }
    }
}
