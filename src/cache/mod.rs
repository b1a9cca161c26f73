//! Client-side query cache.
//!
//! Entries are keyed by [`QueryKey`] and addressed in bulk through
//! [`QueryFilter`] prefixes (`users` covers every list and detail, `user lists`
//! covers every page). Mutations snapshot the matching entries before an
//! optimistic change and restore the snapshot when the remote call fails, so
//! after a failure each entry equals its snapshot.

pub mod queries;

pub use self::queries::UserQueries;

use crate::api::types::{PaginationParams, User, UsersPage};
use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

/// Entries are collected after this long without being read or written.
pub const DEFAULT_GC_TIME: Duration = Duration::from_secs(10 * 60);
/// User lists are served from cache for this long.
pub const USER_LIST_STALE_TIME: Duration = Duration::from_secs(5 * 60);

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QueryKey {
    Auth,
    UserList(PaginationParams),
    UserDetail(u64),
}

/// Prefix selecting a group of keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryFilter {
    All,
    Auth,
    Users,
    UserLists,
    UserDetails,
    Exact(QueryKey),
}

impl QueryFilter {
    #[must_use]
    pub fn matches(&self, key: &QueryKey) -> bool {
        match self {
            Self::All => true,
            Self::Auth => matches!(key, QueryKey::Auth),
            Self::Users => matches!(key, QueryKey::UserList(_) | QueryKey::UserDetail(_)),
            Self::UserLists => matches!(key, QueryKey::UserList(_)),
            Self::UserDetails => matches!(key, QueryKey::UserDetail(_)),
            Self::Exact(exact) => exact == key,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryData {
    Auth(bool),
    UserList(UsersPage),
    UserDetail(User),
}

#[derive(Clone, Debug)]
struct Entry {
    data: QueryData,
    updated_at: Instant,
    accessed_at: Instant,
    invalidated: bool,
}

/// Entries captured before an optimistic change.
pub type Snapshot = Vec<(QueryKey, QueryData)>;

#[derive(Debug)]
pub struct QueryCache {
    entries: BTreeMap<QueryKey, Entry>,
    stale_time: Duration,
    gc_time: Duration,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(Duration::ZERO, DEFAULT_GC_TIME)
    }
}

impl QueryCache {
    #[must_use]
    pub fn new(stale_time: Duration, gc_time: Duration) -> Self {
        Self {
            entries: BTreeMap::new(),
            stale_time,
            gc_time,
        }
    }

    pub fn get(&mut self, key: &QueryKey) -> Option<&QueryData> {
        let entry = self.entries.get_mut(key)?;
        entry.accessed_at = Instant::now();
        Some(&entry.data)
    }

    #[must_use]
    pub fn peek(&self, key: &QueryKey) -> Option<&QueryData> {
        self.entries.get(key).map(|entry| &entry.data)
    }

    pub fn set(&mut self, key: QueryKey, data: QueryData) {
        let now = Instant::now();
        self.entries.insert(
            key,
            Entry {
                data,
                updated_at: now,
                accessed_at: now,
                invalidated: false,
            },
        );
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `key` must be refetched before use, given its stale time.
    #[must_use]
    pub fn is_stale(&self, key: &QueryKey, stale_time: Option<Duration>) -> bool {
        let stale_time = stale_time.unwrap_or(self.stale_time);
        self.entries.get(key).map_or(true, |entry| {
            entry.invalidated || entry.updated_at.elapsed() >= stale_time
        })
    }

    /// Copies every entry matching `filter`.
    #[must_use]
    pub fn get_queries(&self, filter: &QueryFilter) -> Snapshot {
        self.entries
            .iter()
            .filter(|(key, _)| filter.matches(key))
            .map(|(key, entry)| (key.clone(), entry.data.clone()))
            .collect()
    }

    /// Rewrites every entry matching `filter` in place.
    pub fn set_queries(&mut self, filter: &QueryFilter, mut update: impl FnMut(&mut QueryData)) {
        let now = Instant::now();
        for (key, entry) in &mut self.entries {
            if filter.matches(key) {
                update(&mut entry.data);
                entry.updated_at = now;
                entry.accessed_at = now;
            }
        }
    }

    /// Puts snapshotted entries back exactly as they were captured.
    pub fn restore(&mut self, snapshot: Snapshot) {
        for (key, data) in snapshot {
            self.set(key, data);
        }
    }

    /// Marks matching entries stale; the next read refetches them.
    pub fn invalidate(&mut self, filter: &QueryFilter) -> usize {
        let mut count = 0;
        for (key, entry) in &mut self.entries {
            if filter.matches(key) {
                entry.invalidated = true;
                count += 1;
            }
        }
        count
    }

    pub fn remove(&mut self, filter: &QueryFilter) {
        self.entries.retain(|key, _| !filter.matches(key));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drops entries nobody touched within the collection window.
    pub fn gc(&mut self) -> usize {
        let before = self.entries.len();
        let gc_time = self.gc_time;
        self.entries
            .retain(|_, entry| entry.accessed_at.elapsed() < gc_time);
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::seed_users;

    fn page(page: u32) -> UsersPage {
        UsersPage {
            page,
            per_page: 6,
            total: 12,
            total_pages: 2,
            data: seed_users().into_iter().skip((page as usize - 1) * 6).take(6).collect(),
            support: crate::api::types::Support::default(),
        }
    }

    fn list_key(page: u32) -> QueryKey {
        QueryKey::UserList(PaginationParams::page(page))
    }

    #[test]
    fn filters_select_by_prefix() {
        assert!(QueryFilter::Users.matches(&list_key(1)));
        assert!(QueryFilter::Users.matches(&QueryKey::UserDetail(3)));
        assert!(!QueryFilter::Users.matches(&QueryKey::Auth));
        assert!(QueryFilter::UserLists.matches(&list_key(2)));
        assert!(!QueryFilter::UserLists.matches(&QueryKey::UserDetail(3)));
        assert!(QueryFilter::Exact(list_key(2)).matches(&list_key(2)));
        assert!(!QueryFilter::Exact(list_key(2)).matches(&list_key(1)));
    }

    #[test]
    fn snapshot_and_restore_round_trip() {
        let mut cache = QueryCache::default();
        cache.set(list_key(1), QueryData::UserList(page(1)));
        cache.set(list_key(2), QueryData::UserList(page(2)));
        cache.set(QueryKey::UserDetail(1), QueryData::UserDetail(seed_users()[0].clone()));

        let snapshot = cache.get_queries(&QueryFilter::UserLists);
        assert_eq!(snapshot.len(), 2);

        cache.set_queries(&QueryFilter::UserLists, |data| {
            if let QueryData::UserList(page) = data {
                page.data.clear();
            }
        });
        assert!(matches!(
            cache.peek(&list_key(1)),
            Some(QueryData::UserList(page)) if page.data.is_empty()
        ));

        cache.restore(snapshot);
        assert_eq!(cache.peek(&list_key(1)), Some(&QueryData::UserList(page(1))));
        assert_eq!(cache.peek(&list_key(2)), Some(&QueryData::UserList(page(2))));
    }

    #[test]
    fn invalidation_marks_entries_stale() {
        let mut cache = QueryCache::new(Duration::from_secs(60), DEFAULT_GC_TIME);
        cache.set(list_key(1), QueryData::UserList(page(1)));
        cache.set(QueryKey::UserDetail(1), QueryData::UserDetail(seed_users()[0].clone()));
        assert!(!cache.is_stale(&list_key(1), None));

        assert_eq!(cache.invalidate(&QueryFilter::UserLists), 1);
        assert!(cache.is_stale(&list_key(1), None));
        assert!(!cache.is_stale(&QueryKey::UserDetail(1), None));
        assert!(cache.is_stale(&list_key(9), None));
    }

    #[test]
    fn zero_stale_time_always_refetches() {
        let mut cache = QueryCache::default();
        cache.set(list_key(1), QueryData::UserList(page(1)));
        assert!(cache.is_stale(&list_key(1), None));
        assert!(!cache.is_stale(&list_key(1), Some(USER_LIST_STALE_TIME)));
    }

    #[test]
    fn clear_remove_and_gc() {
        let mut cache = QueryCache::new(Duration::ZERO, Duration::ZERO);
        cache.set(QueryKey::Auth, QueryData::Auth(true));
        cache.set(list_key(1), QueryData::UserList(page(1)));

        cache.remove(&QueryFilter::Auth);
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.gc(), 1);
        assert!(cache.is_empty());

        cache.set(list_key(1), QueryData::UserList(page(1)));
        cache.clear();
        assert!(cache.is_empty());
    }
}
