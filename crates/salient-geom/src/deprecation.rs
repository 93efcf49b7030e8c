//! Deprecation notices for renamed API items.

use std::sync::atomic::{AtomicBool, Ordering};

/// A one-time warning attached to a deprecated item.
///
/// Meant to live in a `static` next to the item it describes. The first
/// [`notice`](Self::notice) logs at `warn` level; later calls do nothing.
/// Release builds never log.
#[derive(Debug)]
pub struct Deprecation {
    item: &'static str,
    message: &'static str,
    warned: AtomicBool,
}

impl Deprecation {
    pub const fn new(item: &'static str, message: &'static str) -> Self {
        Self {
            item,
            message,
            warned: AtomicBool::new(false),
        }
    }

    pub fn item(&self) -> &'static str {
        self.item
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    /// Emit the warning unless it was already emitted.
    ///
    /// Returns whether this call logged.
    pub fn notice(&self) -> bool {
        if !cfg!(debug_assertions) {
            return false;
        }
        if self.warned.swap(true, Ordering::Relaxed) {
            return false;
        }
        tracing::warn!(item = self.item, "{}", self.message);
        true
    }

    /// Whether the warning has been emitted.
    pub fn has_warned(&self) -> bool {
        self.warned.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warns_once_in_debug_builds() {
        static OLD: Deprecation = Deprecation::new("old_fn", "old_fn is deprecated, use new_fn");
        let first = OLD.notice();
        let second = OLD.notice();
        assert!(!second);
        assert_eq!(first, cfg!(debug_assertions));
        assert_eq!(OLD.has_warned(), cfg!(debug_assertions));
        assert_eq!(OLD.item(), "old_fn");
    }
}
