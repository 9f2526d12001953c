//! Reconciliation controller
//!
//! Orchestrates the optimistic-update cycle for player actions:
//!
//! ```text
//! Idle -> Submitting -> Refetching -> Idle
//! ```
//!
//! A submit optimistically appends the player's line, posts the action,
//! adopts the (partial-trust) response snapshot, then refetches the full
//! message log and replaces the transcript with the normalized result. The
//! refetch is the single source of truth after every mutating action; the
//! response's own transcript survives only when the refetch fails.
//!
//! Two mechanisms keep overlapping triggers from double-applying work:
//! a busy flag rejects re-entrant submits outright, and a monotonically
//! increasing epoch marks each cycle so a completion that lost the race
//! (story deselected, logout forced) is discarded instead of applied.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use taleweave_domain::{filter_for_npc, TranscriptEntry};
use taleweave_shared::ProcessActionRequest;

use crate::application::error::ServiceError;
use crate::application::services::{AuthService, HistoryService, SessionStore};
use crate::ports::outbound::GameApiPort;

/// Controller phase, exposed for introspection (prompts, spinners).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Refetching,
}

/// How a submit cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Action accepted and the transcript replaced from the refetched log.
    Applied,
    /// Action accepted but the refetch failed; the action response's own
    /// transcript was kept as a degraded fallback.
    Degraded { error: String },
    /// The backend rejected the action; a System error line was appended
    /// locally and nothing was retried.
    Rejected { error: String },
    /// The cycle was superseded (story deselected or session cleared) before
    /// its history fetch landed; the result was discarded.
    Superseded,
}

/// NPC-scoped view returned by [`GameService::talk_to_npc`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpcChat {
    pub outcome: SubmitOutcome,
    /// The NPC's sub-transcript recomputed from the post-merge transcript.
    pub transcript: Vec<TranscriptEntry>,
}

/// Orchestrates state synchronization between the store and the backend.
pub struct GameService {
    api: Arc<dyn GameApiPort>,
    history: HistoryService,
    store: Arc<SessionStore>,
    auth: AuthService,
    busy: AtomicBool,
    epoch: AtomicU64,
    phase: AtomicU8,
}

impl GameService {
    pub fn new(
        api: Arc<dyn GameApiPort>,
        history: HistoryService,
        store: Arc<SessionStore>,
        auth: AuthService,
    ) -> Self {
        Self {
            api,
            history,
            store,
            auth,
            busy: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
            phase: AtomicU8::new(Phase::Idle as u8),
        }
    }

    pub fn phase(&self) -> Phase {
        match self.phase.load(Ordering::SeqCst) {
            x if x == Phase::Submitting as u8 => Phase::Submitting,
            x if x == Phase::Refetching as u8 => Phase::Refetching,
            _ => Phase::Idle,
        }
    }

    /// Select a story: fetch its snapshot, then load and merge its history.
    ///
    /// History loaded here may race an optimistic append that has not been
    /// confirmed yet; the store's pending reconciliation handles that.
    pub async fn select_story(&self, story_id: i64) -> Result<(), ServiceError> {
        self.acquire()?;
        let result = self.load_story(story_id).await;
        self.release();
        result
    }

    async fn load_story(&self, story_id: i64) -> Result<(), ServiceError> {
        let cycle = self.next_cycle();
        self.set_phase(Phase::Refetching);
        tracing::info!(story_id, "selecting story");

        let snapshot = match self.api.fetch_game_state(story_id).await {
            Ok(snapshot) => snapshot,
            Err(err) if err.is_auth_expired() => {
                self.force_logout().await;
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        };
        self.store.install(story_id, snapshot).await;

        match self.history.fetch_transcript(story_id).await {
            Ok(entries) if self.cycle_is_current(cycle) => {
                self.store.merge_history(entries).await;
                Ok(())
            }
            Ok(_) => {
                tracing::debug!(cycle, "discarding history for a superseded selection");
                Ok(())
            }
            Err(err) if err.is_auth_expired() => {
                self.force_logout().await;
                Err(err.into())
            }
            Err(err) => {
                // Degrade to the snapshot's own transcript.
                tracing::warn!(%err, "history load failed, keeping snapshot transcript");
                Ok(())
            }
        }
    }

    /// Drop the active story and invalidate any in-flight cycle.
    pub async fn deselect_story(&self) {
        self.next_cycle();
        self.store.clear().await;
    }

    /// Submit a free-text player action through the full reconciliation
    /// cycle. Exactly one attempt; no retry, no backoff.
    pub async fn submit_action(&self, action: &str) -> Result<SubmitOutcome, ServiceError> {
        let action = action.trim();
        if action.is_empty() {
            return Err(ServiceError::EmptyAction);
        }
        let story_id = self
            .store
            .active_story()
            .await
            .ok_or(ServiceError::NoActiveStory)?;

        self.acquire()?;
        let result = self.run_cycle(story_id, action).await;
        self.release();
        result
    }

    /// Talk to an NPC through the same pipeline as any other action, then
    /// recompute the NPC's scoped view from the merged transcript.
    pub async fn talk_to_npc(&self, npc_name: &str, text: &str) -> Result<NpcChat, ServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::EmptyAction);
        }

        let action = format!("talk to {npc_name}: {text}");
        let outcome = self.submit_action(&action).await?;
        let transcript = self.npc_transcript(npc_name).await;
        Ok(NpcChat { outcome, transcript })
    }

    /// The NPC-scoped sub-transcript, computed on demand from the current
    /// transcript. Pure view; never mutates the store.
    pub async fn npc_transcript(&self, npc_name: &str) -> Vec<TranscriptEntry> {
        filter_for_npc(&self.store.transcript().await, npc_name)
    }

    async fn run_cycle(&self, story_id: i64, action: &str) -> Result<SubmitOutcome, ServiceError> {
        let cycle = self.next_cycle();
        self.set_phase(Phase::Submitting);
        self.store
            .append_optimistic(TranscriptEntry::player(action))
            .await;
        tracing::info!(story_id, "submitting action");

        let request = ProcessActionRequest {
            action: action.to_string(),
            story_id,
        };
        match self.api.process_action(request).await {
            Ok(new_state) => {
                self.store.adopt_action_state(new_state).await;
                self.set_phase(Phase::Refetching);
                self.refresh_transcript(story_id, cycle).await
            }
            Err(err) if err.is_auth_expired() => {
                self.force_logout().await;
                Err(err.into())
            }
            Err(err) => {
                tracing::warn!(%err, "action submission failed");
                self.store
                    .append_local(TranscriptEntry::system(format!(
                        "[Error] failed to process action: {err}"
                    )))
                    .await;
                Ok(SubmitOutcome::Rejected {
                    error: err.to_string(),
                })
            }
        }
    }

    async fn refresh_transcript(
        &self,
        story_id: i64,
        cycle: u64,
    ) -> Result<SubmitOutcome, ServiceError> {
        match self.history.fetch_transcript(story_id).await {
            Ok(entries) => {
                if !self.cycle_is_current(cycle) {
                    tracing::debug!(cycle, "discarding stale history fetch");
                    return Ok(SubmitOutcome::Superseded);
                }
                self.store.merge_history(entries).await;
                Ok(SubmitOutcome::Applied)
            }
            Err(err) if err.is_auth_expired() => {
                self.force_logout().await;
                Err(err.into())
            }
            Err(err) => {
                tracing::warn!(%err, "history refetch failed, keeping action-response transcript");
                Ok(SubmitOutcome::Degraded {
                    error: err.to_string(),
                })
            }
        }
    }

    /// Clear everything tied to the expired credential and invalidate any
    /// in-flight cycle. Never retries.
    async fn force_logout(&self) {
        tracing::warn!("credential expired, clearing session");
        self.next_cycle();
        self.auth.clear_session().await;
        self.store.clear().await;
    }

    fn acquire(&self) -> Result<(), ServiceError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ServiceError::Busy);
        }
        Ok(())
    }

    fn release(&self) {
        self.set_phase(Phase::Idle);
        self.busy.store(false, Ordering::SeqCst);
    }

    fn next_cycle(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn cycle_is_current(&self, cycle: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == cycle
    }

    fn set_phase(&self, phase: Phase) {
        self.phase.store(phase as u8, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use taleweave_domain::GameState;
    use taleweave_shared::{
        GameMessage, LoginRequest, LoginResponse, MessageHistory, MessageKind, UserInfo,
    };

    use crate::ports::outbound::{ApiError, BearerToken, MockGameApiPort};

    fn entry(speaker: &str, message: &str) -> TranscriptEntry {
        TranscriptEntry::new(speaker, message)
    }

    fn snapshot_with(history: Vec<TranscriptEntry>) -> GameState {
        GameState {
            player_location: "kitchen".into(),
            current_time: "08:00".into(),
            location_description: "A narrow kitchen.".into(),
            dialogue_history: history,
            ..GameState::default()
        }
    }

    fn log_message(id: i64, kind: MessageKind, content: &str) -> GameMessage {
        GameMessage {
            id,
            user_id: 1,
            story_id: 7,
            session_id: "default".into(),
            message_type: 0,
            message_type_name: kind,
            sub_type: None,
            content: content.into(),
            structured_data: None,
            related_entity: None,
            related_entity_name: None,
            location: None,
            location_name: None,
            game_time: None,
            message_metadata: None,
            created_at: Utc::now(),
        }
    }

    fn npc_message(id: i64, name: &str, content: &str) -> GameMessage {
        let mut msg = log_message(id, MessageKind::NpcDialogue, content);
        msg.related_entity_name = Some(name.into());
        msg
    }

    fn full_page(messages: Vec<GameMessage>) -> MessageHistory {
        MessageHistory {
            total_count: messages.len() as u64,
            limit: 100,
            offset: 0,
            has_more: false,
            messages,
        }
    }

    fn user() -> UserInfo {
        UserInfo {
            id: 1,
            username: "player1".into(),
            email: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn submit_replaces_transcript_from_refetched_log() {
        let mut api = MockGameApiPort::new();
        api.expect_fetch_game_state()
            .returning(|_| Ok(snapshot_with(Vec::new())));
        api.expect_fetch_messages()
            .returning(|_, _| Ok(full_page(vec![log_message(1, MessageKind::SystemInfo, "You wake up.")])))
            .times(1);
        api.expect_process_action()
            .withf(|req| req.action == "look around" && req.story_id == 7)
            .returning(|_| Ok(snapshot_with(vec![entry("Player", "look around")])));
        // Refetch after the action returns the authoritative log.
        api.expect_fetch_messages().returning(|_, _| {
            Ok(full_page(vec![
                log_message(1, MessageKind::SystemInfo, "You wake up."),
                log_message(2, MessageKind::UserInput, "look around"),
                log_message(3, MessageKind::SystemAction, "You see a kitchen."),
            ]))
        });

        let api: Arc<dyn GameApiPort> = Arc::new(api);
        let store = Arc::new(SessionStore::new());
        let token = BearerToken::new();
        let auth = AuthService::new(api.clone(), token.clone());
        let service = GameService::new(
            api.clone(),
            HistoryService::new(api),
            store.clone(),
            auth,
        );

        service.select_story(7).await.expect("select");
        let outcome = service.submit_action("look around").await.expect("submit");

        assert_eq!(outcome, SubmitOutcome::Applied);
        assert_eq!(
            store.transcript().await,
            vec![
                entry("System", "You wake up."),
                entry("Player", "look around"),
                entry("System", "You see a kitchen."),
            ]
        );
        assert_eq!(service.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn rejected_action_appends_a_system_error_line() {
        let mut api = MockGameApiPort::new();
        api.expect_fetch_game_state()
            .returning(|_| Ok(snapshot_with(Vec::new())));
        api.expect_fetch_messages()
            .returning(|_, _| Ok(full_page(Vec::new())));
        api.expect_process_action()
            .returning(|_| Err(ApiError::Server("story engine crashed".into())));

        let api: Arc<dyn GameApiPort> = Arc::new(api);
        let store = Arc::new(SessionStore::new());
        let auth = AuthService::new(api.clone(), BearerToken::new());
        let service =
            GameService::new(api.clone(), HistoryService::new(api), store.clone(), auth);

        service.select_story(7).await.expect("select");
        let outcome = service.submit_action("look around").await.expect("submit");

        assert!(matches!(outcome, SubmitOutcome::Rejected { .. }));
        let transcript = store.transcript().await;
        assert_eq!(transcript[0], entry("Player", "look around"));
        assert_eq!(transcript[1].speaker, "System");
        assert!(transcript[1].message.starts_with("[Error] "));
    }

    #[tokio::test]
    async fn refetch_failure_degrades_to_the_action_response() {
        let mut api = MockGameApiPort::new();
        api.expect_fetch_game_state()
            .returning(|_| Ok(snapshot_with(Vec::new())));
        api.expect_fetch_messages()
            .times(1)
            .returning(|_, _| Ok(full_page(Vec::new())));
        api.expect_process_action().returning(|_| {
            Ok(snapshot_with(vec![
                entry("Player", "look around"),
                entry("System", "You see a kitchen."),
            ]))
        });
        api.expect_fetch_messages()
            .returning(|_, _| Err(ApiError::Network("connection reset".into())));

        let api: Arc<dyn GameApiPort> = Arc::new(api);
        let store = Arc::new(SessionStore::new());
        let auth = AuthService::new(api.clone(), BearerToken::new());
        let service =
            GameService::new(api.clone(), HistoryService::new(api), store.clone(), auth);

        service.select_story(7).await.expect("select");
        let outcome = service.submit_action("look around").await.expect("submit");

        assert!(matches!(outcome, SubmitOutcome::Degraded { .. }));
        assert_eq!(
            store.transcript().await,
            vec![
                entry("Player", "look around"),
                entry("System", "You see a kitchen."),
            ]
        );
    }

    #[tokio::test]
    async fn credential_expiry_clears_session_and_surfaces() {
        let mut api = MockGameApiPort::new();
        api.expect_login().returning(|_| {
            Ok(LoginResponse {
                user: user(),
                access_token: "tok".into(),
                token_type: "bearer".into(),
            })
        });
        api.expect_fetch_game_state()
            .returning(|_| Err(ApiError::AuthExpired));

        let api: Arc<dyn GameApiPort> = Arc::new(api);
        let store = Arc::new(SessionStore::new());
        let token = BearerToken::new();
        let auth = AuthService::new(api.clone(), token.clone());
        let service = GameService::new(
            api.clone(),
            HistoryService::new(api),
            store.clone(),
            auth.clone(),
        );

        auth.login(LoginRequest {
            username: "player1".into(),
            password: "secret".into(),
        })
        .await
        .expect("login");
        assert!(token.is_set().await);

        let err = service.select_story(7).await.expect_err("auth error");

        assert!(err.is_auth_expired());
        assert!(!token.is_set().await);
        assert_eq!(auth.current_user().await, None);
        assert_eq!(store.snapshot().await, None);
    }

    #[tokio::test]
    async fn submit_without_a_story_is_refused() {
        let api: Arc<dyn GameApiPort> = Arc::new(MockGameApiPort::new());
        let auth = AuthService::new(api.clone(), BearerToken::new());
        let service = GameService::new(
            api.clone(),
            HistoryService::new(api),
            Arc::new(SessionStore::new()),
            auth,
        );

        let err = service.submit_action("look around").await.expect_err("err");
        assert_eq!(err, ServiceError::NoActiveStory);

        let err = service.submit_action("   ").await.expect_err("err");
        assert_eq!(err, ServiceError::EmptyAction);
    }

    #[tokio::test]
    async fn npc_chat_flows_through_reconciliation_and_filters_the_view() {
        let mut api = MockGameApiPort::new();
        api.expect_fetch_game_state()
            .returning(|_| Ok(snapshot_with(Vec::new())));
        api.expect_fetch_messages()
            .times(1)
            .returning(|_, _| Ok(full_page(Vec::new())));
        api.expect_process_action()
            .withf(|req| req.action == "talk to Alice: hi")
            .returning(|_| Ok(snapshot_with(Vec::new())));
        api.expect_fetch_messages().returning(|_, _| {
            Ok(full_page(vec![
                log_message(1, MessageKind::UserInput, "talk to Alice: hi"),
                npc_message(2, "Alice", "hi back"),
                log_message(3, MessageKind::UserInput, "move to kitchen"),
            ]))
        });

        let api: Arc<dyn GameApiPort> = Arc::new(api);
        let store = Arc::new(SessionStore::new());
        let auth = AuthService::new(api.clone(), BearerToken::new());
        let service =
            GameService::new(api.clone(), HistoryService::new(api), store.clone(), auth);

        service.select_story(7).await.expect("select");
        let chat = service.talk_to_npc("Alice", "hi").await.expect("chat");

        assert_eq!(chat.outcome, SubmitOutcome::Applied);
        assert_eq!(
            chat.transcript,
            vec![
                entry("Player", "talk to Alice: hi"),
                entry("Alice", "hi back"),
            ]
        );
    }

    #[tokio::test]
    async fn select_story_keeps_snapshot_transcript_when_history_fails() {
        let mut api = MockGameApiPort::new();
        api.expect_fetch_game_state()
            .returning(|_| Ok(snapshot_with(vec![entry("System", "You wake up.")])));
        api.expect_fetch_messages()
            .returning(|_, _| Err(ApiError::Server("log unavailable".into())));

        let api: Arc<dyn GameApiPort> = Arc::new(api);
        let store = Arc::new(SessionStore::new());
        let auth = AuthService::new(api.clone(), BearerToken::new());
        let service =
            GameService::new(api.clone(), HistoryService::new(api), store.clone(), auth);

        // Selection succeeds degraded: the snapshot's own transcript stands in.
        service.select_story(7).await.expect("select");
        assert_eq!(
            store.transcript().await,
            vec![entry("System", "You wake up.")]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn superseded_cycle_discards_its_fetch_result() {
        let (started_tx, started_rx) = std::sync::mpsc::channel();
        let (resume_tx, resume_rx) = std::sync::mpsc::channel::<()>();

        let mut api = MockGameApiPort::new();
        api.expect_fetch_game_state()
            .returning(|_| Ok(snapshot_with(Vec::new())));
        api.expect_fetch_messages()
            .times(1)
            .returning(|_, _| Ok(full_page(Vec::new())));
        api.expect_process_action()
            .returning(|_| Ok(snapshot_with(vec![entry("Player", "look around")])));
        // The post-action refetch parks until the story has been deselected.
        api.expect_fetch_messages().returning(move |_, _| {
            started_tx.send(()).ok();
            resume_rx.recv().ok();
            Ok(full_page(vec![log_message(
                1,
                MessageKind::SystemInfo,
                "late arrival",
            )]))
        });

        let api: Arc<dyn GameApiPort> = Arc::new(api);
        let store = Arc::new(SessionStore::new());
        let auth = AuthService::new(api.clone(), BearerToken::new());
        let service = Arc::new(GameService::new(
            api.clone(),
            HistoryService::new(api),
            store.clone(),
            auth,
        ));

        service.select_story(7).await.expect("select");

        let submit = tokio::spawn({
            let service = service.clone();
            async move { service.submit_action("look around").await }
        });

        started_rx.recv().expect("refetch started");
        service.deselect_story().await;
        resume_tx.send(()).expect("resume refetch");

        let outcome = submit.await.expect("join").expect("submit");
        assert_eq!(outcome, SubmitOutcome::Superseded);
        // The stale history was discarded, not applied to the cleared store.
        assert_eq!(store.snapshot().await, None);
    }

    #[tokio::test]
    async fn deselecting_clears_state_and_invalidates_cycles() {
        let mut api = MockGameApiPort::new();
        api.expect_fetch_game_state()
            .returning(|_| Ok(snapshot_with(Vec::new())));
        api.expect_fetch_messages()
            .returning(|_, _| Ok(full_page(Vec::new())));

        let api: Arc<dyn GameApiPort> = Arc::new(api);
        let store = Arc::new(SessionStore::new());
        let auth = AuthService::new(api.clone(), BearerToken::new());
        let service = GameService::new(
            api.clone(),
            HistoryService::new(api),
            store.clone(),
            auth,
        );

        service.select_story(7).await.expect("select");
        service.deselect_story().await;

        assert_eq!(store.snapshot().await, None);
        assert_eq!(store.active_story().await, None);
    }
}
