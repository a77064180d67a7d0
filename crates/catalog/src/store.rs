//! The game catalog store: single owner of the in-memory catalog.
//!
//! Writes go to the remote source while it is reachable. Any remote
//! failure switches the store to the local snapshot (degraded mode) until
//! [`CatalogStore::retry_remote`] succeeds. Mutations are serialized
//! through one async mutex, and every state change is published to
//! subscribers only after the backing write or response is confirmed.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::{CatalogError, ErrorInfo, ErrorKind, RemoteError};
use crate::remote::{RemoteFuture, RemoteSource};
use crate::seed::seed_games;
use crate::snapshot::SnapshotStore;
use crate::types::{
    CatalogSnapshot, GameInput, GameRecord, Mode, RetryReport, SeedReport, Status,
};
use crate::validation::{GameDraft, validate};
use crate::wire;

/// Bookkeeping owned by whoever holds the operation lock.
#[derive(Debug, Default)]
struct OpState {
    last_local_id: u64,
}

impl OpState {
    /// Millisecond timestamp id, strictly increasing per store and unique
    /// within `games`.
    fn next_local_id(&mut self, games: &[GameRecord]) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        let mut candidate = now.max(self.last_local_id + 1);
        while games.iter().any(|g| g.id == candidate.to_string()) {
            candidate += 1;
        }
        self.last_local_id = candidate;
        candidate.to_string()
    }
}

/// Owns the game catalog and hides the remote/local split from consumers.
///
/// Share it as `Arc<CatalogStore>`. Call [`initialize`](Self::initialize)
/// once before use and [`shutdown`](Self::shutdown) on teardown.
pub struct CatalogStore {
    remote: Option<Arc<dyn RemoteSource>>,
    local: SnapshotStore,
    state: watch::Sender<CatalogSnapshot>,
    ops: Mutex<OpState>,
    cancel: CancellationToken,
}

impl CatalogStore {
    /// Creates a store backed by `remote`, falling back to `snapshot`.
    pub fn new(remote: Arc<dyn RemoteSource>, snapshot: SnapshotStore) -> Self {
        Self::build(Some(remote), snapshot)
    }

    /// Creates a store without a remote source. It always runs degraded.
    pub fn offline(snapshot: SnapshotStore) -> Self {
        Self::build(None, snapshot)
    }

    fn build(remote: Option<Arc<dyn RemoteSource>>, local: SnapshotStore) -> Self {
        let (state, _) = watch::channel(CatalogSnapshot::loading());
        Self {
            remote,
            local,
            state,
            ops: Mutex::new(OpState::default()),
            cancel: CancellationToken::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Current state of the store.
    pub fn snapshot(&self) -> CatalogSnapshot {
        self.state.borrow().clone()
    }

    /// Current catalog, in display order.
    pub fn games(&self) -> Vec<GameRecord> {
        self.state.borrow().games.clone()
    }

    pub fn get(&self, id: &str) -> Option<GameRecord> {
        self.state.borrow().get(id).cloned()
    }

    pub fn mode(&self) -> Mode {
        self.state.borrow().mode
    }

    pub fn status(&self) -> Status {
        self.state.borrow().status
    }

    /// Registers for change notifications.
    ///
    /// The receiver always holds the latest snapshot; intermediate states
    /// may be coalesced.
    pub fn subscribe(&self) -> watch::Receiver<CatalogSnapshot> {
        self.state.subscribe()
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Loads the catalog, preferring the remote source.
    ///
    /// Never fails: remote and snapshot problems end up in the returned
    /// snapshot's `status` and `last_error`.
    ///
    /// Local edits persisted by an earlier degraded run are kept and counted
    /// in `unsynced_edits` until [`retry_remote`](Self::retry_remote)
    /// discards them.
    pub async fn initialize(&self) -> CatalogSnapshot {
        let _ops = self.ops.lock().await;
        if !self.cancel.is_cancelled() {
            self.load(false).await;
        }
        self.snapshot()
    }

    /// Reconnects to the remote source.
    ///
    /// On success the remote catalog **replaces** the in-memory one and
    /// every unsynced local edit, including those persisted by an earlier
    /// run, is dropped together with the snapshot; the report says how many.
    pub async fn retry_remote(&self) -> RetryReport {
        let _ops = self.ops.lock().await;
        let loaded = if self.cancel.is_cancelled() {
            None
        } else {
            self.load(true).await
        };
        match loaded {
            Some(discarded_edits) => RetryReport {
                reconnected: true,
                discarded_edits,
            },
            None => RetryReport {
                reconnected: false,
                discarded_edits: 0,
            },
        }
    }

    /// Cancels in-flight remote calls. Later operations fail with
    /// [`CatalogError::Cancelled`] and leave the state untouched.
    pub fn shutdown(&self) {
        info!("shutting down catalog store");
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Validates and adds a game, returning it with its assigned id.
    pub async fn add(&self, input: GameInput) -> Result<GameRecord, CatalogError> {
        let draft = validate(&input).map_err(CatalogError::Validation)?;

        let mut ops = self.ops.lock().await;
        self.ensure_live()?;

        let mut remote_error = None;
        if let Some(remote) = self.active_remote() {
            let body = wire::to_wire(&draft);
            match self.guarded(remote.create(&body)).await? {
                Ok(value) => match wire::from_wire(value) {
                    Ok(game) => {
                        info!(id = %game.id, title = %game.title, "game created on remote");
                        let stored = game.clone();
                        self.state.send_modify(|s| upsert(&mut s.games, None, stored));
                        return Ok(game);
                    }
                    Err(e) => remote_error = Some(e),
                },
                Err(e) => remote_error = Some(e),
            }
        }

        let mut games = self.games();
        let id = ops.next_local_id(&games);
        let game = draft.into_record(id);
        games.push(game.clone());
        self.commit_local(games, remote_error.as_ref())?;
        info!(id = %game.id, title = %game.title, "game added locally");
        Ok(game)
    }

    /// Merges `partial` over the game with `id` and writes it through.
    pub async fn update(&self, id: &str, partial: GameInput) -> Result<GameRecord, CatalogError> {
        let _ops = self.ops.lock().await;
        self.ensure_live()?;

        let current = self
            .get(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        let merged = GameInput::from(&current).merge(partial);
        let draft = validate(&merged).map_err(CatalogError::Validation)?;

        let mut remote_error = None;
        if let Some(remote) = self.active_remote() {
            let body = wire::to_wire(&draft);
            match self.guarded(remote.update(id, &body)).await? {
                Ok(value) => match wire::from_wire(value) {
                    Ok(game) => {
                        info!(id = %game.id, "game updated on remote");
                        let stored = game.clone();
                        self.state
                            .send_modify(|s| upsert(&mut s.games, Some(id), stored));
                        return Ok(game);
                    }
                    Err(e) => remote_error = Some(e),
                },
                Err(e) => remote_error = Some(e),
            }
        }

        let game = draft.into_record(id.to_string());
        let mut games = self.games();
        upsert(&mut games, Some(id), game.clone());
        self.commit_local(games, remote_error.as_ref())?;
        info!(id = %game.id, "game updated locally");
        Ok(game)
    }

    /// Removes the game with `id`, returning it.
    ///
    /// Missing ids are always reported as [`CatalogError::NotFound`].
    pub async fn remove(&self, id: &str) -> Result<GameRecord, CatalogError> {
        let _ops = self.ops.lock().await;
        self.ensure_live()?;

        let removed = self
            .get(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

        let mut remote_error = None;
        if let Some(remote) = self.active_remote() {
            match self.guarded(remote.delete(id)).await? {
                Ok(()) => {
                    info!(id, "game deleted on remote");
                    self.state.send_modify(|s| s.games.retain(|g| g.id != id));
                    return Ok(removed);
                }
                Err(e) => remote_error = Some(e),
            }
        }

        let mut games = self.games();
        games.retain(|g| g.id != id);
        self.commit_local(games, remote_error.as_ref())?;
        info!(id, "game removed locally");
        Ok(removed)
    }

    /// Pushes every seed game to the remote source, then reloads.
    ///
    /// Individual failures are collected in the report; nothing here
    /// aborts half-way except cancellation.
    pub async fn seed_remote(&self) -> Result<SeedReport, CatalogError> {
        let _ops = self.ops.lock().await;
        self.ensure_live()?;

        let seed = seed_games();
        let mut report = SeedReport::default();
        let Some(remote) = self.remote.as_ref() else {
            for game in &seed {
                report
                    .failed
                    .push((game.title.clone(), RemoteError::Disabled.to_string()));
            }
            return Ok(report);
        };

        info!(count = seed.len(), "seeding remote with sample games");
        for game in &seed {
            let body = wire::to_wire(&GameDraft::from(game));
            match self.guarded(remote.create(&body)).await? {
                Ok(_) => {
                    debug!(title = %game.title, "seeded game");
                    report.added.push(game.title.clone());
                }
                Err(e) => {
                    warn!(title = %game.title, error = %e, "failed to seed game");
                    report.failed.push((game.title.clone(), e.to_string()));
                }
            }
        }

        self.load(false).await;
        info!(
            added = report.added.len(),
            failed = report.failed.len(),
            "remote seeding completed"
        );
        Ok(report)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn ensure_live(&self) -> Result<(), CatalogError> {
        if self.cancel.is_cancelled() {
            return Err(CatalogError::Cancelled);
        }
        Ok(())
    }

    /// The remote source, if the store is currently writing to it.
    fn active_remote(&self) -> Option<&Arc<dyn RemoteSource>> {
        match self.mode() {
            Mode::Remote => self.remote.as_ref(),
            Mode::Local => None,
        }
    }

    /// Races a remote call against shutdown.
    async fn guarded<T>(
        &self,
        call: RemoteFuture<'_, T>,
    ) -> Result<Result<T, RemoteError>, CatalogError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(CatalogError::Cancelled),
            result = call => Ok(result),
        }
    }

    /// Populates the catalog from the remote, or from the local fallback.
    ///
    /// Returns the number of discarded local edits when the remote
    /// answered, `None` otherwise. Local edits are only dropped with
    /// `discard_local`; without it they stay counted in `unsynced_edits`
    /// and on disk. A cancelled load restores the previous status.
    async fn load(&self, discard_local: bool) -> Option<usize> {
        let previous = self.state.borrow().status;
        self.state.send_modify(|s| s.status = Status::Loading);

        let listed = match self.remote.as_ref() {
            None => Err(RemoteError::Disabled),
            Some(remote) => match self.guarded(remote.list()).await {
                Ok(result) => result.and_then(wire::from_wire_list),
                Err(_) => {
                    debug!("catalog load cancelled");
                    self.state.send_modify(|s| s.status = previous);
                    return None;
                }
            },
        };

        match listed {
            Ok(games) => {
                info!(count = games.len(), "catalog loaded from remote");
                let pending = self.state.borrow().unsynced_edits.max(self.persisted_edits());
                let unsynced = if discard_local && pending > 0 {
                    warn!(
                        discarded = pending,
                        "reconnected to remote, local-only edits were discarded"
                    );
                    if let Err(e) = self.local.clear_catalog() {
                        warn!(error = %e, "failed to clear local snapshot");
                    }
                    0
                } else {
                    if pending > 0 {
                        warn!(
                            pending,
                            "local-only edits are not on the remote, a retry will discard them"
                        );
                    }
                    pending
                };
                self.state.send_modify(|s| {
                    s.games = games;
                    s.mode = Mode::Remote;
                    s.status = Status::Ready;
                    s.last_error = None;
                    s.unsynced_edits = unsynced;
                });
                Some(if discard_local { pending } else { 0 })
            }
            Err(e) => {
                warn!(error = %e, "backend not available, falling back to local snapshot");
                let (games, persisted) = self.load_fallback();
                self.state.send_modify(|s| {
                    s.games = games;
                    s.mode = Mode::Local;
                    s.status = Status::Degraded;
                    s.last_error = Some(offline_error(&e));
                    s.unsynced_edits = s.unsynced_edits.max(persisted);
                });
                None
            }
        }
    }

    /// Local snapshot if readable, otherwise the seed set, along with the
    /// number of local edits the returned games carry.
    fn load_fallback(&self) -> (Vec<GameRecord>, usize) {
        match self.local.load_catalog() {
            Ok(Some(games)) => {
                info!(count = games.len(), "catalog loaded from local snapshot");
                (games, self.persisted_edits())
            }
            Ok(None) => {
                let seed = seed_games();
                info!(count = seed.len(), "no local snapshot, using seed games");
                (seed, 0)
            }
            Err(e) => {
                error!(error = %e, "local snapshot unreadable, using seed games");
                (seed_games(), 0)
            }
        }
    }

    fn persisted_edits(&self) -> usize {
        self.local.load_unsynced().unwrap_or_else(|e| {
            warn!(error = %e, "unreadable edit counter, assuming one local edit");
            1
        })
    }

    /// Persists `games` and then publishes them.
    ///
    /// The in-memory catalog only changes once the snapshot write has
    /// succeeded. `remote_error` switches the store to degraded mode.
    fn commit_local(
        &self,
        games: Vec<GameRecord>,
        remote_error: Option<&RemoteError>,
    ) -> Result<(), CatalogError> {
        if let Some(e) = remote_error {
            warn!(error = %e, "remote write failed, switching to local snapshot");
        }

        if let Err(e) = self.local.save_catalog(&games) {
            error!(error = %e, "failed to persist catalog snapshot");
            let failure =
                ErrorInfo::new(ErrorKind::PersistenceWrite, format!("Failed to save games: {e}"));
            self.state.send_modify(|s| {
                if remote_error.is_some() {
                    s.mode = Mode::Local;
                    s.status = Status::Degraded;
                }
                s.last_error = Some(failure);
            });
            return Err(e.into());
        }

        let unsynced = self.state.borrow().unsynced_edits + 1;
        if let Err(e) = self.local.save_unsynced(unsynced) {
            warn!(error = %e, "failed to persist local edit count");
        }

        self.state.send_modify(|s| {
            s.games = games;
            s.unsynced_edits = unsynced;
            if let Some(e) = remote_error {
                s.mode = Mode::Local;
                s.status = Status::Degraded;
                s.last_error = Some(offline_error(e));
            }
        });
        Ok(())
    }
}

fn offline_error(cause: &RemoteError) -> ErrorInfo {
    ErrorInfo::new(
        ErrorKind::RemoteUnavailable,
        format!("Backend not available - using offline mode ({cause})"),
    )
}

/// Puts `game` in place of `replacing` (or of its own id), keeping the
/// position. Any other record already carrying the new id is dropped.
fn upsert(games: &mut Vec<GameRecord>, replacing: Option<&str>, game: GameRecord) {
    let target = replacing.unwrap_or(&game.id).to_string();
    games.retain(|g| g.id == target || g.id != game.id);
    match games.iter().position(|g| g.id == target) {
        Some(index) => games[index] = game,
        None => games.push(game),
    }
}
