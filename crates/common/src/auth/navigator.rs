//! In-process navigator

use parking_lot::RwLock;
use tracing::{debug, warn};
use url::Url;

use super::traits::Navigator;

/// Navigator that tracks the current URL in memory and records history
#[derive(Debug)]
pub struct MemoryNavigator {
    current: RwLock<Url>,
    history: RwLock<Vec<Url>>,
}

impl MemoryNavigator {
    #[must_use]
    pub fn new(start: Url) -> Self {
        Self { current: RwLock::new(start), history: RwLock::new(Vec::new()) }
    }

    /// Replace the current location without recording a navigation
    ///
    /// Used when the page is (re)loaded at an external URL, e.g. the
    /// provider redirecting back with `?code=...`.
    pub fn set_current_url(&self, url: Url) {
        *self.current.write() = url;
    }

    /// URLs navigated to via [`Navigator::navigate_to`], oldest first
    #[must_use]
    pub fn history(&self) -> Vec<Url> {
        self.history.read().clone()
    }
}

impl Navigator for MemoryNavigator {
    fn current_url(&self) -> Url {
        self.current.read().clone()
    }

    fn navigate_to(&self, path: &str) {
        let mut current = self.current.write();
        match current.join(path) {
            Ok(next) => {
                debug!(path, "navigating");
                self.history.write().push(next.clone());
                *current = next;
            }
            Err(e) => warn!(path, error = %e, "ignoring navigation to invalid path"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigate_rewrites_path_and_drops_query() {
        let navigator =
            MemoryNavigator::new(Url::parse("http://localhost:8888/?code=ABC123").unwrap());

        navigator.navigate_to("/");

        assert_eq!(navigator.current_url().as_str(), "http://localhost:8888/");
        assert_eq!(navigator.history().len(), 1);
    }

    #[test]
    fn set_current_url_is_not_history() {
        let navigator = MemoryNavigator::new(Url::parse("http://localhost:8888/").unwrap());
        navigator.set_current_url(Url::parse("http://localhost:8888/?code=X").unwrap());

        assert_eq!(navigator.current_url().query(), Some("code=X"));
        assert!(navigator.history().is_empty());
    }
}
