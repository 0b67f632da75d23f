//! Client-side tabular view: search, pagination and CRUD dialog state.
//!
//! A [`ListView`] owns the full collection fetched for a page and derives the
//! filtered collection and the current page window from it. The derived views
//! are recomputed after every mutation using the current search term, so they
//! can never drift from the source collection.
//!
//! [`PageState`] adds the dialog and error-banner state that every list screen
//! shares. Neither type performs I/O.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Rows per page when a screen is first mounted.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Page sizes offered by the pagination control.
pub const PAGE_SIZE_OPTIONS: &[usize] = &[5, 10, 25];

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// An entity that can be shown in a searchable list.
pub trait Listable {
    /// Unique key of the entity within its collection.
    type Key: Clone + PartialEq + fmt::Debug + fmt::Display + Serialize + Send + Sync;

    /// Human-readable entity name used in error messages.
    const ENTITY: &'static str;

    fn key(&self) -> &Self::Key;

    /// Text fields the search box matches against.
    fn search_fields(&self) -> Vec<Cow<'_, str>>;
}

/// An entity that accepts a partial update.
pub trait Patchable: Listable {
    type Patch: Send + Sync;

    /// Merge a server-accepted `patch` into `self`.
    fn apply_patch(&mut self, patch: &Self::Patch);
}

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

/// Whether any searchable field of `item` contains `term`, ignoring case.
///
/// An empty term matches everything.
pub fn matches_term<T: Listable>(item: &T, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// The subsequence of `items` matching `term`.
pub fn filter_items<'a, T: Listable>(items: &'a [T], term: &str) -> Vec<&'a T> {
    items.iter().filter(|i| matches_term(*i, term)).collect()
}

/// `items[page*size .. page*size+size]`, clipped to the slice bounds.
pub fn window<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Number of pages needed to show `len` rows, at least one.
pub fn page_count(len: usize, page_size: usize) -> usize {
    if len == 0 || page_size == 0 {
        1
    } else {
        len.div_ceil(page_size)
    }
}

// ---------------------------------------------------------------------------
// ListView
// ---------------------------------------------------------------------------

/// Full collection plus its filtered and paginated derivations.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    items: Vec<T>,
    term: String,
    /// Positions in `items` that match `term`, in collection order.
    filtered: Vec<usize>,
    page: usize,
    page_size: usize,
}

impl<T: Listable> ListView<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            term: String::new(),
            filtered: Vec::new(),
            page: 0,
            page_size: page_size.max(1),
        }
    }

    /// Replace the full collection, keeping the current search term.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
        self.page = 0;
        self.recompute();
    }

    pub fn clear(&mut self) {
        self.replace_all(Vec::new());
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn search_term(&self) -> &str {
        &self.term
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search(&mut self, text: &str) {
        self.term = text.to_string();
        self.recompute();
        self.page = 0;
    }

    /// Select a page. Pages past the end are allowed and show no rows.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), CoreError> {
        if page_size == 0 {
            return Err(CoreError::field("page_size", "Page size must be positive"));
        }
        self.page_size = page_size;
        self.page = 0;
        Ok(())
    }

    pub fn filtered(&self) -> impl Iterator<Item = &T> {
        self.filtered.iter().map(|&i| &self.items[i])
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Rows on the current page.
    pub fn window(&self) -> Vec<&T> {
        window(&self.filtered, self.page, self.page_size)
            .iter()
            .map(|&i| &self.items[i])
            .collect()
    }

    pub fn page_count(&self) -> usize {
        page_count(self.filtered.len(), self.page_size)
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.items.iter().find(|i| i.key() == key)
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.get(key).is_some()
    }

    /// Add an entity. An entity with the same key is replaced in place so a
    /// key is never present twice.
    pub fn append(&mut self, item: T) {
        match self.items.iter().position(|i| i.key() == item.key()) {
            Some(pos) => self.items[pos] = item,
            None => self.items.push(item),
        }
        self.after_mutation();
    }

    /// Apply `f` to the entity with `key`.
    pub fn modify<F>(&mut self, key: &T::Key, f: F) -> Result<&T, CoreError>
    where
        F: FnOnce(&mut T),
    {
        let pos = self.position(key)?;
        f(&mut self.items[pos]);
        self.after_mutation();
        Ok(&self.items[pos])
    }

    pub fn remove(&mut self, key: &T::Key) -> Result<T, CoreError> {
        let pos = self.position(key)?;
        let removed = self.items.remove(pos);
        self.after_mutation();
        Ok(removed)
    }

    pub fn snapshot(&self) -> PageSnapshot<T>
    where
        T: Clone,
    {
        PageSnapshot {
            rows: self.window().into_iter().cloned().collect(),
            search: self.term.clone(),
            page: self.page,
            page_size: self.page_size,
            page_count: self.page_count(),
            total: self.items.len(),
            filtered_total: self.filtered.len(),
            first_row_number: self.page * self.page_size + 1,
        }
    }

    fn position(&self, key: &T::Key) -> Result<usize, CoreError> {
        self.items
            .iter()
            .position(|i| i.key() == key)
            .ok_or_else(|| CoreError::NotFound {
                entity: T::ENTITY,
                key: key.to_string(),
            })
    }

    fn recompute(&mut self) {
        self.filtered = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| matches_term(*item, &self.term))
            .map(|(i, _)| i)
            .collect();
        tracing::debug!(
            entity = T::ENTITY,
            total = self.items.len(),
            filtered = self.filtered.len(),
            "Recomputed list view"
        );
    }

    fn after_mutation(&mut self) {
        self.recompute();
        let pages = self.page_count();
        if self.page >= pages {
            self.page = pages - 1;
        }
    }
}

impl<T: Patchable> ListView<T> {
    /// Merge `patch` into the entity with `key`.
    pub fn merge(&mut self, key: &T::Key, patch: &T::Patch) -> Result<&T, CoreError> {
        self.modify(key, |item| item.apply_patch(patch))
    }
}

/// Serializable view of the current page.
#[derive(Debug, Clone, Serialize)]
pub struct PageSnapshot<T> {
    pub rows: Vec<T>,
    pub search: String,
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub total: usize,
    pub filtered_total: usize,
    /// Serial number ("S.No") of the first row on this page.
    pub first_row_number: usize,
}

// ---------------------------------------------------------------------------
// Dialogs
// ---------------------------------------------------------------------------

/// Which modal dialog a list screen currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum Dialog<K> {
    Closed,
    Create,
    Edit(K),
    ConfirmDelete(K),
}

impl<K> Default for Dialog<K> {
    fn default() -> Self {
        Dialog::Closed
    }
}

// ---------------------------------------------------------------------------
// PageState
// ---------------------------------------------------------------------------

/// Everything a list screen keeps in memory for one visit.
#[derive(Debug, Clone)]
pub struct PageState<T: Listable> {
    pub view: ListView<T>,
    pub dialog: Dialog<T::Key>,
    /// Error banner text from the last failed action.
    pub error: Option<String>,
    pub loading: bool,
}

impl<T: Listable> PageState<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            view: ListView::new(page_size),
            dialog: Dialog::Closed,
            error: None,
            loading: false,
        }
    }

    pub fn open_create(&mut self) {
        self.dialog = Dialog::Create;
    }

    pub fn open_edit(&mut self, key: &T::Key) -> Result<(), CoreError> {
        self.ensure_exists(key)?;
        self.dialog = Dialog::Edit(key.clone());
        Ok(())
    }

    /// First step of a deletion: ask the user to confirm.
    pub fn request_delete(&mut self, key: &T::Key) -> Result<(), CoreError> {
        self.ensure_exists(key)?;
        self.dialog = Dialog::ConfirmDelete(key.clone());
        Ok(())
    }

    /// Key awaiting delete confirmation, if it equals `key`.
    pub fn confirmed_delete(&self, key: &T::Key) -> Result<T::Key, CoreError> {
        match &self.dialog {
            Dialog::ConfirmDelete(pending) if pending == key => Ok(pending.clone()),
            _ => Err(CoreError::Conflict(format!(
                "Deletion of {} {key} has not been requested",
                T::ENTITY
            ))),
        }
    }

    pub fn close_dialog(&mut self) {
        self.dialog = Dialog::Closed;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn snapshot(&self) -> ListSnapshot<T, T::Key>
    where
        T: Clone,
    {
        ListSnapshot {
            page: self.view.snapshot(),
            dialog: self.dialog.clone(),
            error: self.error.clone(),
            loading: self.loading,
        }
    }

    fn ensure_exists(&self, key: &T::Key) -> Result<(), CoreError> {
        if self.view.contains(key) {
            Ok(())
        } else {
            Err(CoreError::NotFound {
                entity: T::ENTITY,
                key: key.to_string(),
            })
        }
    }
}

/// Serializable view of a whole list screen.
#[derive(Debug, Clone, Serialize)]
pub struct ListSnapshot<T, K> {
    #[serde(flatten)]
    pub page: PageSnapshot<T>,
    pub dialog: Dialog<K>,
    pub error: Option<String>,
    pub loading: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
