// In-memory visit store: the one owner of all records and the id counter

use crate::error::StoreError;
use crate::model::{SeedVisit, VisitTask, now_ms};
use crate::query::{QueryParams, SortKey};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::{debug, info};

// Shape check only: "2025-13-40" passes. Calendar validity is deliberately
// not enforced, matching the behavior callers already depend on.
static DATE_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date shape regex"));

/// Keyed collection of [`VisitTask`] records plus the monotonic id counter.
///
/// Exclusively owned by one session; every operation is synchronous and runs
/// to completion. Destructive bulk operations expect the caller to have
/// obtained user confirmation already — the store never asks.
pub struct VisitStore {
    tasks: BTreeMap<u64, VisitTask>,
    next_id: u64,
}

impl Default for VisitStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VisitStore {
    /// Create an empty store with the id counter at 1
    pub fn new() -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Create a store pre-populated from seed tuples
    pub fn from_seed(seed: &[SeedVisit]) -> Self {
        let mut store = Self::new();
        store.initialize(seed);
        store
    }

    /// Replace all state with the given seed list.
    ///
    /// Ids are assigned 1..N in seed order and `next_id` becomes N+1 (or 1
    /// for an empty list). Seed data is trusted: no validation.
    pub fn initialize(&mut self, seed: &[SeedVisit]) {
        self.tasks.clear();
        for (i, entry) in seed.iter().enumerate() {
            let id = i as u64 + 1;
            self.tasks.insert(
                id,
                VisitTask {
                    id,
                    name: entry.name.clone(),
                    visit_date: entry.date.clone(),
                    completed: entry.completed,
                    created_at: now_ms(),
                },
            );
        }
        self.next_id = seed.len() as u64 + 1;
        info!(count = seed.len(), "store initialized from seed");
    }

    /// Get a record by id
    pub fn get(&self, id: u64) -> Option<&VisitTask> {
        self.tasks.get(&id)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Add a new visit.
    ///
    /// The name is trimmed; a blank name or missing date is rejected before
    /// anything is inserted. The date is NOT shape-checked here (only `edit`
    /// validates format).
    pub fn add(&mut self, name: &str, visit_date: &str) -> Result<VisitTask, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if visit_date.is_empty() {
            return Err(StoreError::MissingDate);
        }

        let id = self.next_id;
        let task = VisitTask {
            id,
            name: name.to_string(),
            visit_date: visit_date.to_string(),
            completed: false,
            created_at: now_ms(),
        };
        self.tasks.insert(id, task.clone());
        self.next_id += 1;

        debug!(id, name, visit_date, "added visit");
        Ok(task)
    }

    /// Flip the completion flag on one record. Applying it twice restores
    /// the original state.
    pub fn toggle_completed(&mut self, id: u64) -> Result<VisitTask, StoreError> {
        let task = self.tasks.get_mut(&id).ok_or(StoreError::NotFound { id })?;
        task.completed = !task.completed;
        debug!(id, completed = task.completed, "toggled visit");
        Ok(task.clone())
    }

    /// Delete a record if present. Returns whether anything was removed;
    /// a missing id is not an error.
    pub fn remove(&mut self, id: u64) -> bool {
        let removed = self.tasks.remove(&id).is_some();
        if removed {
            debug!(id, "removed visit");
        }
        removed
    }

    /// Update name and/or date on an existing record.
    ///
    /// The two updates are independent: a new name is applied when it is
    /// non-blank and differs from the current one, and it stays applied even
    /// when the date in the same call is rejected. A new date that differs
    /// from the current one must match `YYYY-MM-DD`; on mismatch the prior
    /// date is kept and `InvalidDateFormat` is returned.
    pub fn edit(
        &mut self,
        id: u64,
        new_name: Option<&str>,
        new_date: Option<&str>,
    ) -> Result<VisitTask, StoreError> {
        let task = self.tasks.get_mut(&id).ok_or(StoreError::NotFound { id })?;

        if let Some(name) = new_name {
            let name = name.trim();
            if !name.is_empty() && name != task.name {
                debug!(id, name, "renamed visit");
                task.name = name.to_string();
            }
        }

        if let Some(date) = new_date {
            if date != task.visit_date {
                if !DATE_SHAPE_RE.is_match(date) {
                    return Err(StoreError::InvalidDateFormat {
                        value: date.to_string(),
                    });
                }
                debug!(id, date, "rescheduled visit");
                task.visit_date = date.to_string();
            }
        }

        Ok(task.clone())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Filter, search and sort the current records for display.
    ///
    /// Pure read: neither the records nor the store are mutated. All sorts
    /// are stable; [`SortKey::Unsorted`] keeps id order.
    pub fn query(&self, params: &QueryParams) -> Vec<&VisitTask> {
        let search = params.search.to_lowercase();

        let mut results: Vec<&VisitTask> = self
            .tasks
            .values()
            .filter(|t| params.status.matches(t.completed))
            .filter(|t| search.is_empty() || t.name.to_lowercase().contains(&search))
            .collect();

        match params.sort {
            SortKey::Name => {
                results.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
            }
            // Option<NaiveDate> orders None first, so a date the parser
            // rejects sorts before every valid date.
            SortKey::Date => {
                results.sort_by_key(|t| NaiveDate::parse_from_str(&t.visit_date, "%Y-%m-%d").ok());
            }
            SortKey::Status => {
                results.sort_by_key(|t| t.completed);
            }
            SortKey::Unsorted => {}
        }

        results
    }

    /// Number of records in the store, ignoring any filter
    pub fn count_total(&self) -> usize {
        self.tasks.len()
    }

    /// Number of completed records
    pub fn count_completed(&self) -> usize {
        self.tasks.values().filter(|t| t.completed).count()
    }

    /// Number of pending records
    pub fn count_pending(&self) -> usize {
        self.count_total() - self.count_completed()
    }

    // ========================================================================
    // Bulk operations (caller confirms first)
    // ========================================================================

    /// Mark every record completed. Rejects with `EmptyStore` instead of
    /// mutating when there is nothing to mark.
    pub fn mark_all_completed(&mut self) -> Result<(), StoreError> {
        if self.tasks.is_empty() {
            return Err(StoreError::EmptyStore);
        }
        for task in self.tasks.values_mut() {
            task.completed = true;
        }
        info!(count = self.tasks.len(), "marked all visits completed");
        Ok(())
    }

    /// Remove every completed record, returning how many were removed.
    /// Rejects with `NothingToClear` when no record is completed.
    pub fn clear_completed(&mut self) -> Result<usize, StoreError> {
        let count = self.count_completed();
        if count == 0 {
            return Err(StoreError::NothingToClear);
        }
        self.tasks.retain(|_, t| !t.completed);
        info!(count, "cleared completed visits");
        Ok(count)
    }

    /// Empty the store and reset the id counter to 1. Rejects with
    /// `EmptyStore` when already empty.
    pub fn clear_all(&mut self) -> Result<(), StoreError> {
        if self.tasks.is_empty() {
            return Err(StoreError::EmptyStore);
        }
        let count = self.tasks.len();
        self.tasks.clear();
        self.next_id = 1;
        info!(count, "cleared all visits");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::StatusFilter;
    use crate::seed::default_visits;

    fn seeded() -> VisitStore {
        VisitStore::from_seed(&default_visits())
    }

    #[test]
    fn test_add_assigns_increasing_unique_ids() {
        let mut store = VisitStore::new();
        let a = store.add("Museo Egizio", "2025-04-02").unwrap();
        let b = store.add("Museo Galileo", "2025-06-10").unwrap();
        let c = store.add("Museo del Prado", "2025-03-15").unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(c.id, 3);
    }

    #[test]
    fn test_add_rejects_blank_name() {
        let mut store = VisitStore::new();
        assert_eq!(store.add("", "2025-01-01"), Err(StoreError::EmptyName));
        assert_eq!(store.add("   ", "2025-01-01"), Err(StoreError::EmptyName));
        assert_eq!(store.count_total(), 0);
    }

    #[test]
    fn test_add_rejects_missing_date() {
        let mut store = VisitStore::new();
        assert_eq!(store.add("Museo Egizio", ""), Err(StoreError::MissingDate));
        assert_eq!(store.count_total(), 0);
    }

    #[test]
    fn test_add_trims_name_and_skips_format_check() {
        let mut store = VisitStore::new();
        let task = store.add("  Museo Egizio  ", "next week").unwrap();
        assert_eq!(task.name, "Museo Egizio");
        // Format is only checked on edit
        assert_eq!(task.visit_date, "next week");
        assert!(!task.completed);
    }

    #[test]
    fn test_toggle_is_an_involution() {
        let mut store = VisitStore::new();
        let id = store.add("Museo Galileo", "2025-06-10").unwrap().id;

        let toggled = store.toggle_completed(id).unwrap();
        assert!(toggled.completed);
        let toggled = store.toggle_completed(id).unwrap();
        assert!(!toggled.completed);
    }

    #[test]
    fn test_toggle_missing_id_is_not_found() {
        let mut store = VisitStore::new();
        assert_eq!(store.toggle_completed(99), Err(StoreError::NotFound { id: 99 }));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = seeded();
        assert!(store.remove(3));
        assert_eq!(store.count_total(), 7);
        assert!(!store.remove(3));
        assert_eq!(store.count_total(), 7);
    }

    #[test]
    fn test_removed_ids_are_never_reused() {
        let mut store = VisitStore::new();
        store.add("Museo Egizio", "2025-04-02").unwrap();
        store.remove(1);
        let next = store.add("Museo Galileo", "2025-06-10").unwrap();
        assert_eq!(next.id, 2);
    }

    #[test]
    fn test_edit_updates_name_and_date() {
        let mut store = seeded();
        let task = store
            .edit(2, Some("Museo Egizio di Torino"), Some("2025-09-01"))
            .unwrap();
        assert_eq!(task.name, "Museo Egizio di Torino");
        assert_eq!(task.visit_date, "2025-09-01");
    }

    #[test]
    fn test_edit_missing_id_is_not_found() {
        let mut store = VisitStore::new();
        assert_eq!(
            store.edit(5, Some("Museo"), None),
            Err(StoreError::NotFound { id: 5 })
        );
    }

    #[test]
    fn test_edit_rejects_bad_date_shape_and_keeps_prior_date() {
        let mut store = seeded();
        let before = store.get(1).unwrap().visit_date.clone();
        let err = store.edit(1, None, Some("15-03-2025")).unwrap_err();
        assert_eq!(
            err,
            StoreError::InvalidDateFormat {
                value: "15-03-2025".to_string()
            }
        );
        assert_eq!(store.get(1).unwrap().visit_date, before);
    }

    #[test]
    fn test_edit_shape_check_accepts_invalid_calendar_date() {
        // "2025-13-40" matches the shape even though no such day exists;
        // calendar validation is intentionally absent.
        let mut store = seeded();
        let task = store.edit(1, None, Some("2025-13-40")).unwrap();
        assert_eq!(task.visit_date, "2025-13-40");
    }

    #[test]
    fn test_edit_name_applies_even_when_date_is_rejected() {
        let mut store = seeded();
        let err = store.edit(1, Some("Museo Rinominato"), Some("bad-date")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidDateFormat { .. }));
        assert_eq!(store.get(1).unwrap().name, "Museo Rinominato");
    }

    #[test]
    fn test_edit_blank_name_is_ignored() {
        let mut store = seeded();
        let before = store.get(1).unwrap().name.clone();
        store.edit(1, Some("   "), None).unwrap();
        assert_eq!(store.get(1).unwrap().name, before);
    }

    #[test]
    fn test_query_all_sorted_by_name() {
        let store = seeded();
        let params = QueryParams::new(StatusFilter::All, "", SortKey::Name);
        let results = store.query(&params);
        assert_eq!(results.len(), 8);
        for pair in results.windows(2) {
            assert!(pair[0].name.to_lowercase() <= pair[1].name.to_lowercase());
        }
    }

    #[test]
    fn test_query_pending_only() {
        let store = seeded();
        let params = QueryParams::new(StatusFilter::Pending, "", SortKey::Unsorted);
        let results = store.query(&params);
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|t| !t.completed));
    }

    #[test]
    fn test_query_completed_only() {
        let store = seeded();
        let params = QueryParams::new(StatusFilter::Completed, "", SortKey::Unsorted);
        let results = store.query(&params);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|t| t.completed));
    }

    #[test]
    fn test_query_search_is_case_insensitive() {
        let store = seeded();
        // Every seed name contains "Museo"
        let params = QueryParams::new(StatusFilter::All, "museo", SortKey::Unsorted);
        assert_eq!(store.query(&params).len(), 8);

        let params = QueryParams::new(StatusFilter::All, "EGIZIO", SortKey::Unsorted);
        let results = store.query(&params);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Museo Egizio");
    }

    #[test]
    fn test_query_sort_by_date_ascending() {
        let store = seeded();
        let params = QueryParams::new(StatusFilter::All, "", SortKey::Date);
        let results = store.query(&params);
        let dates: Vec<&str> = results.iter().map(|t| t.visit_date.as_str()).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        // Seed dates are all well-formed, so string order equals calendar order
        assert_eq!(dates, sorted);
    }

    #[test]
    fn test_query_malformed_date_sorts_first() {
        let mut store = VisitStore::new();
        store.add("Museo Galileo", "2025-06-10").unwrap();
        store.add("Museo Egizio", "someday").unwrap();
        store.add("Museo del Prado", "2024-12-01").unwrap();

        let params = QueryParams::new(StatusFilter::All, "", SortKey::Date);
        let results = store.query(&params);
        assert_eq!(results[0].visit_date, "someday");
        assert_eq!(results[1].visit_date, "2024-12-01");
        assert_eq!(results[2].visit_date, "2025-06-10");
    }

    #[test]
    fn test_query_sort_by_status_pending_first() {
        let store = seeded();
        let params = QueryParams::new(StatusFilter::All, "", SortKey::Status);
        let results = store.query(&params);
        let first_completed = results.iter().position(|t| t.completed).unwrap();
        assert!(results[..first_completed].iter().all(|t| !t.completed));
        assert!(results[first_completed..].iter().all(|t| t.completed));
        // Stable within each group: ids still ascending
        for pair in results[..first_completed].windows(2) {
            assert!(pair[0].id < pair[1].id);
        }
    }

    #[test]
    fn test_query_unknown_sort_preserves_id_order() {
        let store = seeded();
        let params = QueryParams::new(StatusFilter::All, "", SortKey::from_key("priority"));
        let results = store.query(&params);
        let ids: Vec<u64> = results.iter().map(|t| t.id).collect();
        assert_eq!(ids, (1..=8).collect::<Vec<u64>>());
    }

    #[test]
    fn test_query_does_not_mutate() {
        let store = seeded();
        let params = QueryParams::new(StatusFilter::Completed, "egizio", SortKey::Name);
        store.query(&params);
        assert_eq!(store.count_total(), 8);
    }

    #[test]
    fn test_seed_counts() {
        let store = seeded();
        assert_eq!(store.count_total(), 8);
        assert_eq!(store.count_completed(), 3);
        assert_eq!(store.count_pending(), 5);
    }

    #[test]
    fn test_initialize_sets_next_id_after_seed() {
        let mut store = seeded();
        let task = store.add("Museo Nuovo", "2025-10-01").unwrap();
        assert_eq!(task.id, 9);
    }

    #[test]
    fn test_initialize_empty_seed() {
        let mut store = VisitStore::from_seed(&[]);
        assert_eq!(store.count_total(), 0);
        assert_eq!(store.add("Museo Egizio", "2025-04-02").unwrap().id, 1);
    }

    #[test]
    fn test_mark_all_completed() {
        let mut store = seeded();
        store.mark_all_completed().unwrap();
        assert_eq!(store.count_completed(), 8);
        assert_eq!(store.count_pending(), 0);
    }

    #[test]
    fn test_mark_all_on_empty_store() {
        let mut store = VisitStore::new();
        assert_eq!(store.mark_all_completed(), Err(StoreError::EmptyStore));
    }

    #[test]
    fn test_clear_completed_removes_exactly_the_completed() {
        let mut store = seeded();
        let removed = store.clear_completed().unwrap();
        assert_eq!(removed, 3);
        assert_eq!(store.count_total(), 5);
        assert_eq!(store.count_completed(), 0);
    }

    #[test]
    fn test_clear_completed_with_nothing_completed() {
        let mut store = VisitStore::new();
        store.add("Museo Egizio", "2025-04-02").unwrap();
        assert_eq!(store.clear_completed(), Err(StoreError::NothingToClear));
        assert_eq!(store.count_total(), 1);
    }

    #[test]
    fn test_clear_all_resets_id_counter() {
        let mut store = seeded();
        store.clear_all().unwrap();
        assert_eq!(store.count_total(), 0);
        let task = store.add("X", "2025-01-01").unwrap();
        assert_eq!(task.id, 1);
    }

    #[test]
    fn test_clear_all_on_empty_store() {
        let mut store = VisitStore::new();
        assert_eq!(store.clear_all(), Err(StoreError::EmptyStore));
    }
}
