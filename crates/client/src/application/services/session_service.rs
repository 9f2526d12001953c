//! Session state store
//!
//! Owns the single `GameState` for the active story. All mutation happens
//! here, and only by whole-value replacement - callers get clones out and
//! hand complete new values in, which makes each update atomic in effect.
//!
//! The store also tracks the optimistic local-only entries ("pending") that
//! have been appended ahead of server confirmation. Pending entries are
//! resolved exactly once: either the next adopted action response or the
//! next history merge consumes them.

use tokio::sync::Mutex;

use taleweave_domain::{merge_pending, GameState, TranscriptEntry};

#[derive(Default)]
struct Inner {
    active_story: Option<i64>,
    state: Option<GameState>,
    pending: Vec<TranscriptEntry>,
}

/// In-memory owner of the client's game state.
#[derive(Default)]
pub struct SessionStore {
    inner: Mutex<Inner>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the snapshot for a newly selected story.
    ///
    /// Pending entries survive installation: history loaded right after
    /// selection still has to reconcile against them (the selection race).
    pub async fn install(&self, story_id: i64, snapshot: GameState) {
        let mut inner = self.inner.lock().await;
        inner.active_story = Some(story_id);
        inner.state = Some(snapshot);
    }

    /// Destroy the session state (logout or story deselection).
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        *inner = Inner::default();
    }

    pub async fn active_story(&self) -> Option<i64> {
        self.inner.lock().await.active_story
    }

    /// Clone of the current state, if a story is active.
    pub async fn snapshot(&self) -> Option<GameState> {
        self.inner.lock().await.state.clone()
    }

    /// Clone of the current transcript (empty when no story is active).
    pub async fn transcript(&self) -> Vec<TranscriptEntry> {
        self.inner
            .lock()
            .await
            .state
            .as_ref()
            .map(|s| s.dialogue_history.clone())
            .unwrap_or_default()
    }

    /// Optimistically append a local entry ahead of server confirmation.
    ///
    /// The entry becomes visible immediately and is remembered as pending
    /// until an authoritative response accounts for it.
    pub async fn append_optimistic(&self, entry: TranscriptEntry) {
        let mut inner = self.inner.lock().await;
        inner.pending.push(entry.clone());
        if let Some(state) = &inner.state {
            let mut history = state.dialogue_history.clone();
            history.push(entry);
            inner.state = Some(state.with_history(history));
        }
    }

    /// Append a locally synthesized entry without pending tracking.
    ///
    /// Used for System-speaker error lines: they are display-only and are
    /// expected to vanish on the next authoritative replacement.
    pub async fn append_local(&self, entry: TranscriptEntry) {
        let mut inner = self.inner.lock().await;
        if let Some(state) = &inner.state {
            let mut history = state.dialogue_history.clone();
            history.push(entry);
            inner.state = Some(state.with_history(history));
        }
    }

    /// Adopt the snapshot returned by a mutating action.
    ///
    /// The response is partial trust - its transcript may lag the full log -
    /// but it does account for the submitted action, so the pending batch is
    /// resolved here. The authoritative refetch that follows replaces the
    /// transcript wholesale anyway; this state survives only as the degraded
    /// fallback when that refetch fails.
    pub async fn adopt_action_state(&self, new_state: GameState) {
        let mut inner = self.inner.lock().await;
        inner.pending.clear();
        inner.state = Some(new_state);
    }

    /// Replace the transcript with a freshly fetched authoritative history.
    ///
    /// Pending local-only entries are reconciled by first-element
    /// containment (see `merge_pending`) and consumed: a batch is either
    /// recognized inside the fetch result and dropped, or prepended. Either
    /// way it is dealt with exactly once.
    pub async fn merge_history(&self, fetched: Vec<TranscriptEntry>) {
        let mut inner = self.inner.lock().await;
        let pending = std::mem::take(&mut inner.pending);
        match &inner.state {
            Some(state) => {
                let merged = merge_pending(fetched, &pending);
                tracing::debug!(entries = merged.len(), "transcript replaced from history");
                inner.state = Some(state.with_history(merged));
            }
            None => {
                // No story installed; nothing to merge onto. Put the batch
                // back so a following install still sees it.
                inner.pending = pending;
                tracing::warn!("history merge with no active state, keeping pending entries");
            }
        }
    }
}
