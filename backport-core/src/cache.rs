//! Request-scoped store of fetched pull requests
//!
//! Ticket creation only works for pull requests fetched earlier in the same
//! session. The cache is passed explicitly to the creation step instead of
//! living inside the GitHub or Jira clients.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::{Error, PullRequestDescriptor, Result};

/// Pull requests keyed by number, safe to share between concurrent requests
#[derive(Debug, Default)]
pub struct PullRequestCache {
    entries: RwLock<HashMap<u64, PullRequestDescriptor>>,
}

impl PullRequestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a pull request, replacing any earlier entry with the same number
    pub fn insert(&self, pr: PullRequestDescriptor) {
        debug!(number = pr.number, url = %pr.url, "Caching pull request");
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(pr.number, pr);
    }

    /// Remember every pull request of a listing
    pub fn extend<I>(&self, prs: I)
    where
        I: IntoIterator<Item = PullRequestDescriptor>,
    {
        for pr in prs {
            self.insert(pr);
        }
    }

    /// Look up a pull request by number
    pub fn get(&self, number: u64) -> Result<PullRequestDescriptor> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries
            .get(&number)
            .cloned()
            .ok_or(Error::MissingCacheEntry(number))
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn pr(number: u64) -> PullRequestDescriptor {
        PullRequestDescriptor::new(
            number,
            format!("https://github.com/org/repo/pull/{}", number),
            "title",
            "body",
        )
    }

    #[test]
    fn test_get_missing_entry() {
        let cache = PullRequestCache::new();
        let err = cache.get(42).unwrap_err();
        assert!(matches!(err, Error::MissingCacheEntry(42)));
    }

    #[test]
    fn test_insert_and_get() {
        let cache = PullRequestCache::new();
        cache.extend(vec![pr(1), pr(2)]);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(2).unwrap().url, "https://github.com/org/repo/pull/2");
    }

    #[test]
    fn test_insert_replaces() {
        let cache = PullRequestCache::new();
        cache.insert(pr(1));
        let mut updated = pr(1);
        updated.title = "new title".to_string();
        cache.insert(updated);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(1).unwrap().title, "new title");
    }

    #[test]
    fn test_shared_between_threads() {
        let cache = Arc::new(PullRequestCache::new());
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.insert(pr(n)))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 4);
    }
}
