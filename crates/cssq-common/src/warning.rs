//! Engine warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the tokenizer and parser to report input that is accepted
//! leniently, such as an attribute selector left open at end of input.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Whether warnings reach stderr at all.
static ENABLED: AtomicBool = AtomicBool::new(true);

/// Warn about suspect input (prints once per unique message)
///
/// Returns `true` if this call printed the warning, `false` if the same
/// message was already reported or warnings are disabled.
///
/// # Example
/// ```
/// use cssq_common::warning::warn_once;
///
/// let _ = warn_once("Parser", "unclosed attribute selector [href");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    if !warnings_enabled() {
        return false;
    }

    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{}", format!("[cssq {component}] ⚠ {message}").yellow());
    }
    should_print
}

/// Clear all recorded warnings so they may be printed again.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

/// Turn the warning channel on or off (the CLI's `--quiet`).
pub fn set_warnings_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

/// Whether [`warn_once`] currently prints anything.
#[must_use]
pub fn warnings_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_message_is_reported_once() {
        let message = "duplicate message for dedup test";
        assert!(warn_once("Test", message));
        assert!(!warn_once("Test", message));
        assert!(warn_once("Other", message));
    }

    #[test]
    fn test_enabled_by_default() {
        assert!(warnings_enabled());
    }
}
