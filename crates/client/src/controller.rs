//! Async list-page controller.
//!
//! Ties a [`PageState`] to a [`RemoteCollection`]. Every operation takes the
//! state lock only around local reads and writes, never across an upstream
//! call. Each mount carries a [`CancellationToken`]; unmounting or remounting
//! cancels it, and a response that arrives for a cancelled mount is
//! discarded instead of being applied.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use validator::Validate;

use rubberwatch_core::attachments::Attachments;
use rubberwatch_core::listing::{ListSnapshot, Listable, PageState, Patchable};
use rubberwatch_core::validation;

use crate::api::UpstreamApi;
use crate::collections::{KeyOf, PatchOf, RemoteCollection, RemoteCreate, RemoteDelete, RemoteUpdate};
use crate::error::ClientError;

/// Snapshot type returned by a controller over `C`.
pub type SnapshotOf<C> =
    ListSnapshot<<C as RemoteCollection>::Item, KeyOf<C>>;

pub(crate) struct Mount<T: Listable> {
    pub(crate) state: PageState<T>,
    pub(crate) token: CancellationToken,
}

pub struct ListController<C: RemoteCollection> {
    collection: C,
    api: Arc<UpstreamApi>,
    page_size: usize,
    mount: Mutex<Option<Mount<C::Item>>>,
}

impl<C: RemoteCollection> ListController<C> {
    pub fn new(collection: C, api: Arc<UpstreamApi>, page_size: usize) -> Self {
        Self {
            collection,
            api,
            page_size,
            mount: Mutex::new(None),
        }
    }

    pub fn api(&self) -> &UpstreamApi {
        &self.api
    }

    /// Start a fresh visit to the page and load its collection.
    ///
    /// Any previous visit is cancelled first.
    pub async fn mount(&self) -> Result<SnapshotOf<C>, ClientError> {
        {
            let mut mount = self.mount.lock().await;
            if let Some(previous) = mount.take() {
                previous.token.cancel();
            }
            *mount = Some(Mount {
                state: PageState::new(self.page_size),
                token: CancellationToken::new(),
            });
        }
        tracing::info!(page = C::PAGE, "Page mounted");
        self.load().await
    }

    /// End the visit. In-flight responses will be discarded.
    pub async fn unmount(&self) {
        if let Some(previous) = self.mount.lock().await.take() {
            previous.token.cancel();
            tracing::info!(page = C::PAGE, "Page unmounted");
        }
    }

    pub async fn is_mounted(&self) -> bool {
        self.mount.lock().await.is_some()
    }

    /// Fetch the full collection, replacing the local one.
    ///
    /// On failure the collection is left empty and the error is kept as the
    /// page's error banner.
    pub async fn load(&self) -> Result<SnapshotOf<C>, ClientError> {
        let token = self
            .with_state(|state| {
                state.loading = true;
                state.clear_error();
            })
            .await?;

        let result = self.collection.list(&self.api).await;

        let mut guard = self.current(&token).await?;
        let state = Self::state_mut(&mut guard)?;
        state.loading = false;
        match result {
            Ok(items) => {
                tracing::debug!(page = C::PAGE, count = items.len(), "Collection loaded");
                state.view.replace_all(items);
                Ok(state.snapshot())
            }
            Err(e) => {
                tracing::warn!(page = C::PAGE, error = %e, "Failed to load collection");
                state.view.clear();
                state.fail(format!("Failed to load {}.", C::PAGE));
                Err(e.into())
            }
        }
    }

    pub async fn snapshot(&self) -> Result<SnapshotOf<C>, ClientError> {
        self.read_state(|state| state.snapshot()).await
    }

    pub async fn set_search(&self, text: &str) -> Result<SnapshotOf<C>, ClientError> {
        self.update_state(|state| {
            state.view.set_search(text);
            Ok(())
        })
        .await
    }

    pub async fn set_page(&self, page: usize) -> Result<SnapshotOf<C>, ClientError> {
        self.update_state(|state| {
            state.view.set_page(page);
            Ok(())
        })
        .await
    }

    pub async fn set_page_size(&self, page_size: usize) -> Result<SnapshotOf<C>, ClientError> {
        self.update_state(|state| state.view.set_page_size(page_size).map_err(Into::into))
            .await
    }

    /// Apply view parameters in order: search, page size, then page.
    ///
    /// Search and page size both reset the page, so an explicit page given
    /// with them still wins.
    pub async fn apply_view(
        &self,
        search: Option<&str>,
        page: Option<usize>,
        page_size: Option<usize>,
    ) -> Result<SnapshotOf<C>, ClientError> {
        self.update_state(|state| {
            if let Some(text) = search {
                if text != state.view.search_term() {
                    state.view.set_search(text);
                }
            }
            if let Some(size) = page_size {
                if size != state.view.page_size() {
                    state.view.set_page_size(size)?;
                }
            }
            if let Some(page) = page {
                state.view.set_page(page);
            }
            Ok(())
        })
        .await
    }

    pub async fn close_dialog(&self) -> Result<SnapshotOf<C>, ClientError> {
        self.update_state(|state| {
            state.close_dialog();
            Ok(())
        })
        .await
    }

    // ---- crate helpers ----

    /// Run `f` on the mounted state, returning the mount's token.
    pub(crate) async fn with_state<F>(&self, f: F) -> Result<CancellationToken, ClientError>
    where
        F: FnOnce(&mut PageState<C::Item>),
    {
        let mut guard = self.mount.lock().await;
        let mount = guard.as_mut().ok_or(ClientError::NotMounted(C::PAGE))?;
        f(&mut mount.state);
        Ok(mount.token.clone())
    }

    /// Like [`with_state`](Self::with_state) but `f` may fail before any
    /// request is issued.
    pub(crate) async fn try_with_state<F>(&self, f: F) -> Result<CancellationToken, ClientError>
    where
        F: FnOnce(&mut PageState<C::Item>) -> Result<(), ClientError>,
    {
        let mut guard = self.mount.lock().await;
        let mount = guard.as_mut().ok_or(ClientError::NotMounted(C::PAGE))?;
        f(&mut mount.state)?;
        Ok(mount.token.clone())
    }

    /// Re-acquire the state after an upstream call, or report that the mount
    /// that issued the call is gone.
    pub(crate) async fn current(
        &self,
        token: &CancellationToken,
    ) -> Result<MutexGuard<'_, Option<Mount<C::Item>>>, ClientError> {
        let guard = self.mount.lock().await;
        if token.is_cancelled() {
            tracing::debug!(page = C::PAGE, "Discarding response for unmounted page");
            return Err(ClientError::Stale(C::PAGE));
        }
        Ok(guard)
    }

    pub(crate) fn state_mut<'a>(
        guard: &'a mut MutexGuard<'_, Option<Mount<C::Item>>>,
    ) -> Result<&'a mut PageState<C::Item>, ClientError> {
        guard
            .as_mut()
            .map(|m| &mut m.state)
            .ok_or(ClientError::Stale(C::PAGE))
    }

    async fn read_state<R, F>(&self, f: F) -> Result<R, ClientError>
    where
        F: FnOnce(&PageState<C::Item>) -> R,
    {
        let guard = self.mount.lock().await;
        let mount = guard.as_ref().ok_or(ClientError::NotMounted(C::PAGE))?;
        Ok(f(&mount.state))
    }

    async fn update_state<F>(&self, f: F) -> Result<SnapshotOf<C>, ClientError>
    where
        F: FnOnce(&mut PageState<C::Item>) -> Result<(), ClientError>,
    {
        let mut guard = self.mount.lock().await;
        let mount = guard.as_mut().ok_or(ClientError::NotMounted(C::PAGE))?;
        f(&mut mount.state)?;
        Ok(mount.state.snapshot())
    }
}

impl<C: RemoteCreate> ListController<C> {
    /// Submit a new entity.
    ///
    /// Invalid drafts are rejected before any request. On success the echoed
    /// entity (or the draft itself) joins the collection and the dialog
    /// closes; on failure the dialog stays open with the error.
    pub async fn create(
        &self,
        draft: C::Draft,
        files: Attachments,
    ) -> Result<SnapshotOf<C>, ClientError> {
        let token = self
            .try_with_state(|state| {
                state.open_create();
                validation::check(&draft)?;
                Ok(())
            })
            .await?;

        let result = self.collection.create(&self.api, &draft, &files).await;

        let mut guard = self.current(&token).await?;
        let state = Self::state_mut(&mut guard)?;
        match result {
            Ok(echoed) => {
                let item = echoed.unwrap_or_else(|| self.collection.provisional(draft));
                tracing::info!(page = C::PAGE, key = %item.key(), "Entity created");
                state.view.append(item);
                state.close_dialog();
                state.clear_error();
                Ok(state.snapshot())
            }
            Err(e) => {
                tracing::warn!(page = C::PAGE, error = %e, "Create failed");
                state.fail(e.to_string());
                Err(e.into())
            }
        }
    }
}

impl<C> ListController<C>
where
    C: RemoteUpdate,
    C::Item: Patchable,
    PatchOf<C>: Validate,
{
    /// Submit a patch for the entity with `key` and merge it on success.
    pub async fn update(
        &self,
        key: KeyOf<C>,
        patch: PatchOf<C>,
        files: Attachments,
    ) -> Result<SnapshotOf<C>, ClientError> {
        let token = self
            .try_with_state(|state| {
                state.open_edit(&key)?;
                validation::check(&patch)?;
                Ok(())
            })
            .await?;

        let result = self.collection.update(&self.api, &key, &patch, &files).await;

        let mut guard = self.current(&token).await?;
        let state = Self::state_mut(&mut guard)?;
        match result {
            Ok(()) => {
                state.view.merge(&key, &patch)?;
                tracing::info!(page = C::PAGE, %key, "Entity updated");
                state.close_dialog();
                state.clear_error();
                Ok(state.snapshot())
            }
            Err(e) => {
                tracing::warn!(page = C::PAGE, %key, error = %e, "Update failed");
                state.fail(e.to_string());
                Err(e.into())
            }
        }
    }
}

impl<C: RemoteDelete> ListController<C> {
    /// First step of a deletion: open the confirmation dialog.
    pub async fn request_remove(&self, key: KeyOf<C>) -> Result<SnapshotOf<C>, ClientError> {
        self.update_state(|state| state.request_delete(&key).map_err(Into::into))
            .await
    }

    /// Second step: delete the entity whose deletion was requested.
    pub async fn confirm_remove(&self, key: KeyOf<C>) -> Result<SnapshotOf<C>, ClientError> {
        let token = self
            .try_with_state(|state| {
                state.confirmed_delete(&key)?;
                Ok(())
            })
            .await?;

        let result = self.collection.remove(&self.api, &key).await;

        let mut guard = self.current(&token).await?;
        let state = Self::state_mut(&mut guard)?;
        match result {
            Ok(()) => {
                // Already gone locally is fine; the upstream is the source of truth.
                let _ = state.view.remove(&key);
                tracing::info!(page = C::PAGE, %key, "Entity deleted");
                state.close_dialog();
                state.clear_error();
                Ok(state.snapshot())
            }
            Err(e) => {
                tracing::warn!(page = C::PAGE, %key, error = %e, "Delete failed");
                state.fail(e.to_string());
                Err(e.into())
            }
        }
    }
}
