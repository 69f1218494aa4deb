//! Collision-resistant temporary identifiers for in-flight content.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

/// Identifier of one in-flight optimistic entry.
///
/// Persisted records are keyed by `Uuid`, so a numeric temp id can never be
/// confused with a real one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TempId(u64);

impl TempId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TempId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Marker text occupying a buffer position while its content uploads.
///
/// Bracket-delimited and carrying both a counter and a random suffix, so it
/// reads as an upload notice to the user and cannot collide with another
/// marker in the same editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker(String);

impl Marker {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Allocates temp ids and upload markers.
///
/// The counter is seeded from the wall clock and only ever increments, so
/// ids stay unique under rapid allocation and across engine restarts within
/// the same session lifetime.
#[derive(Debug)]
pub struct PlaceholderAllocator {
    next: AtomicU64,
}

impl PlaceholderAllocator {
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0);
        Self {
            next: AtomicU64::new(seed),
        }
    }

    /// Fresh temporary id, unique within this allocator.
    pub fn temp_id(&self) -> TempId {
        TempId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Fresh upload marker, unique within any buffer this session edits.
    pub fn marker(&self) -> Marker {
        let id = self.temp_id();
        let suffix = Uuid::new_v4().simple().to_string();
        Marker(format!("[Uploading image...{}_{}]", id.0, &suffix[..12]))
    }
}

impl Default for PlaceholderAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ten_thousand_rapid_ids_never_collide() {
        let alloc = PlaceholderAllocator::new();
        let mut seen = HashSet::new();

        for _ in 0..10_000 {
            assert!(seen.insert(alloc.temp_id()));
        }
    }

    #[test]
    fn markers_are_delimited_and_distinct() {
        let alloc = PlaceholderAllocator::new();

        let first = alloc.marker();
        let second = alloc.marker();

        assert!(first.as_str().starts_with('['));
        assert!(first.as_str().ends_with(']'));
        assert_ne!(first, second);
    }

    #[test]
    fn marker_never_contains_an_earlier_marker() {
        // Substitution replaces the first occurrence, so no marker may be a
        // substring of another.
        let alloc = PlaceholderAllocator::new();
        let markers: Vec<Marker> = (0..100).map(|_| alloc.marker()).collect();

        for (i, outer) in markers.iter().enumerate() {
            for (j, inner) in markers.iter().enumerate() {
                if i != j {
                    assert!(!outer.as_str().contains(inner.as_str()));
                }
            }
        }
    }
}
