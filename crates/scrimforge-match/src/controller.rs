//! Match actor: an isolated Tokio task that drives one match.
//!
//! The actor owns every piece of match state (pick plan, selector,
//! scoreboard, enforcer, watchdog) and talks to the outside world only
//! through its command channel. Room events, start/shutdown requests, the
//! inactivity deadline and the closing grace timer are all handled in one
//! `select!` loop, one at a time, so none of that state needs a lock.

use std::future::Future;
use std::time::Duration;

use rand::rngs::StdRng;
use scrimforge_pool::{BeatmapSelector, PickPlan, Selection, SelectionError};
use scrimforge_protocol::{BeatmapId, MatchId, PlayerId, PlayerResult, RoomEvent};
use scrimforge_roster::{Enforcement, TeamEnforcer};
use scrimforge_watchdog::{InactivityWatchdog, WatchdogExpired};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant};
use tracing::{debug, error, info, warn};

use crate::announce;
use crate::chat::ChatCommand;
use crate::{
    Decision, MatchConfig, MatchError, MatchPhase, MatchRegistry, MatchSettings,
    RoomCommandError, RoomControl, RoundOutcome, Scoreboard,
};

/// Commands sent to a match actor through its channel.
pub(crate) enum MatchCommand {
    /// Set up the room and push the first map.
    Start {
        reply: oneshot::Sender<Result<(), MatchError>>,
    },

    /// Something happened in the room.
    Event(RoomEvent),

    GetInfo {
        reply: oneshot::Sender<MatchInfo>,
    },

    /// Close the room and stop the actor.
    Shutdown { reply: oneshot::Sender<()> },
}

/// A snapshot of match progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchInfo {
    pub match_id: MatchId,
    pub phase: MatchPhase,
    pub points_red: u32,
    pub points_blue: u32,
    /// Picks consumed from the plan so far.
    pub round_index: usize,
    /// Rounds scored so far.
    pub rounds_played: usize,
    /// Whether the current map is a tiebreaker or decider.
    pub tiebreak: bool,
    /// The map currently set in the room.
    pub current: Option<Selection>,
}

/// Handle to a running match actor.
///
/// Cheap to clone. The [`MatchRegistry`] holds one per match.
#[derive(Debug, Clone)]
pub struct MatchHandle {
    match_id: MatchId,
    sender: mpsc::Sender<MatchCommand>,
}

impl MatchHandle {
    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    /// Sets up the room (team mode, slots, first map, password, invites).
    ///
    /// # Errors
    /// - [`MatchError::InvalidState`] if the match was already started
    /// - [`MatchError::RoomCommand`] if the room refused a setup command;
    ///   the room is closed
    /// - [`MatchError::Selection`] if the first map could not be drawn
    pub async fn start(&self) -> Result<(), MatchError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(MatchCommand::Start { reply: reply_tx })
            .await
            .map_err(|_| MatchError::Unavailable(self.match_id))?;
        reply_rx
            .await
            .map_err(|_| MatchError::Unavailable(self.match_id))?
    }

    /// Forwards a room event to the match (fire-and-forget).
    pub async fn notify(&self, event: RoomEvent) -> Result<(), MatchError> {
        self.sender
            .send(MatchCommand::Event(event))
            .await
            .map_err(|_| MatchError::Unavailable(self.match_id))
    }

    /// Requests a progress snapshot.
    pub async fn info(&self) -> Result<MatchInfo, MatchError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(MatchCommand::GetInfo { reply: reply_tx })
            .await
            .map_err(|_| MatchError::Unavailable(self.match_id))?;
        reply_rx
            .await
            .map_err(|_| MatchError::Unavailable(self.match_id))
    }

    /// Closes the room and stops the actor. Waits until the actor is gone.
    ///
    /// Idempotent: shutting down a match that already stopped is a no-op.
    pub async fn shutdown(&self) {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self
            .sender
            .send(MatchCommand::Shutdown { reply: reply_tx })
            .await
            .is_ok()
        {
            let _ = reply_rx.await;
        }
        // The actor unregisters itself before dropping its receiver.
        self.sender.closed().await;
    }

    /// Returns `false` once the actor has stopped.
    pub fn is_running(&self) -> bool {
        !self.sender.is_closed()
    }
}

/// The pick plan and the selector that draws from it.
pub(crate) struct Draft {
    pub(crate) plan: PickPlan,
    pub(crate) selector: BeatmapSelector<StdRng>,
}

/// What a paused match retries on `!resume`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingAction {
    PushMap,
    StartMatch,
}

/// The internal match state. Runs inside a Tokio task.
struct MatchActor<R: RoomControl> {
    match_id: MatchId,
    config: MatchConfig,
    settings: MatchSettings,
    phase: MatchPhase,
    plan: PickPlan,
    selector: BeatmapSelector<StdRng>,
    scoreboard: Scoreboard,
    enforcer: TeamEnforcer,
    watchdog: InactivityWatchdog,
    room: R,
    current: Option<Selection>,
    tiebreak: bool,
    pending: Option<PendingAction>,
    /// When the room closes after the match is decided.
    close_at: Option<Instant>,
    /// Set once `close()` has been sent; the room is never closed twice.
    closed: bool,
    registry: MatchRegistry,
    receiver: mpsc::Receiver<MatchCommand>,
}

impl<R: RoomControl> MatchActor<R> {
    /// Runs the actor loop until the room is closed.
    async fn run(mut self) {
        info!(
            match_id = %self.match_id,
            best_of = self.config.best_of(),
            picks = self.plan.len(),
            "match actor started"
        );

        while !self.phase.is_terminal() {
            let close_at = self.close_at;
            tokio::select! {
                biased;
                cmd = self.receiver.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd).await,
                    None => {
                        debug!(match_id = %self.match_id, "all handles dropped");
                        self.close_room().await;
                    }
                },
                expired = self.watchdog.wait_for_deadline() => {
                    self.on_inactive(expired).await;
                }
                () = sleep_until_some(close_at) => {
                    debug!(match_id = %self.match_id, "grace period over");
                    self.close_room().await;
                }
            }
        }

        self.registry.unregister(self.match_id).await;
        info!(match_id = %self.match_id, "match actor stopped");
    }

    async fn handle_command(&mut self, cmd: MatchCommand) {
        match cmd {
            MatchCommand::Start { reply } => {
                let result = self.start().await;
                let _ = reply.send(result);
            }
            MatchCommand::Event(event) => self.handle_event(event).await,
            MatchCommand::GetInfo { reply } => {
                let _ = reply.send(self.info());
            }
            MatchCommand::Shutdown { reply } => {
                info!(match_id = %self.match_id, phase = %self.phase, "match shutting down");
                self.close_room().await;
                let _ = reply.send(());
            }
        }
    }

    // -----------------------------------------------------------------------
    // Start
    // -----------------------------------------------------------------------

    async fn start(&mut self) -> Result<(), MatchError> {
        if self.phase != MatchPhase::Created {
            return Err(MatchError::InvalidState(format!(
                "cannot start match in phase {}",
                self.phase
            )));
        }
        if let Err(e) = self.set_up_room().await {
            warn!(match_id = %self.match_id, error = %e, "room setup failed, closing room");
            self.close_room().await;
            return Err(e);
        }
        self.watchdog.reset();
        info!(match_id = %self.match_id, phase = %self.phase, "match started");
        Ok(())
    }

    async fn set_up_room(&mut self) -> Result<(), MatchError> {
        let lobby = self.settings.lobby_for(self.config.team_size());
        self.room.set_team_mode(lobby).await?;
        self.room.lock_slots().await?;
        self.next_map(false).await?;
        self.room.set_password(&room_password()).await?;
        for player in self.config.roster().players() {
            if let Err(e) = self.room.invite(player).await {
                warn!(match_id = %self.match_id, %player, error = %e, "invite failed");
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Room events
    // -----------------------------------------------------------------------

    async fn handle_event(&mut self, event: RoomEvent) {
        match event {
            RoomEvent::AllPlayersReady => self.on_all_ready().await,
            RoomEvent::MatchStarted => self.on_match_started(),
            RoomEvent::MatchFinished { results } => self.on_match_finished(&results).await,
            RoomEvent::PlayerJoined { player } => {
                self.watchdog.reset();
                let enforcement = self.enforcer.on_player_joined(player);
                self.enforce(player, enforcement).await;
            }
            RoomEvent::PlayerLeft { player } => {
                self.enforcer.on_player_left(player);
                debug!(match_id = %self.match_id, %player, "player left");
            }
            RoomEvent::PlayerChangedTeam { player, team } => {
                if let Some(enforcement) = self.enforcer.on_team_changed(player, team) {
                    self.enforce(player, enforcement).await;
                }
            }
            RoomEvent::ChatMessage { sender, text } => self.on_chat(sender, &text).await,
        }
    }

    async fn on_all_ready(&mut self) {
        if self.phase != MatchPhase::AwaitingReady {
            debug!(match_id = %self.match_id, phase = %self.phase, "ready check ignored");
            return;
        }
        if !self.enforcer.is_full() {
            debug!(
                match_id = %self.match_id,
                present = self.enforcer.present_count(),
                "starting with rostered players missing"
            );
        }
        if let Err(e) = self.room.start_match(self.settings.start_delay_secs).await {
            self.pause(PendingAction::StartMatch, e).await;
        }
    }

    fn on_match_started(&mut self) {
        // A start command that reported failure may still have gone through.
        if self.phase == MatchPhase::Paused && self.pending == Some(PendingAction::StartMatch) {
            info!(match_id = %self.match_id, "room started despite failed start command");
            self.pending = None;
        } else if self.phase != MatchPhase::AwaitingReady {
            debug!(match_id = %self.match_id, phase = %self.phase, "match start ignored");
            return;
        }
        self.phase = MatchPhase::Playing;
        self.watchdog.suspend();
        let map = self.current.as_ref().map(Selection::label).unwrap_or_default();
        info!(match_id = %self.match_id, %map, "round started");
    }

    async fn on_match_finished(&mut self, results: &[PlayerResult]) {
        if self.phase != MatchPhase::Playing {
            debug!(match_id = %self.match_id, phase = %self.phase, "match result ignored");
            return;
        }
        self.phase = MatchPhase::Scoring;
        self.watchdog.resume();

        let outcome = match self.scoreboard.record_round(results) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(match_id = %self.match_id, error = %e, "round not recorded");
                return;
            }
        };
        info!(
            match_id = %self.match_id,
            score_red = outcome.score_red,
            score_blue = outcome.score_blue,
            points_red = outcome.points_red,
            points_blue = outcome.points_blue,
            decision = ?outcome.decision,
            "round decided"
        );

        self.say(&announce::round_result(&outcome, self.settings.tie_policy))
            .await;
        self.say(&announce::current_score(outcome.points_red, outcome.points_blue))
            .await;

        match outcome.decision {
            Decision::AdvanceRound => self.advance(false).await,
            Decision::EnterTieBreak => {
                self.say(announce::TIEBREAK).await;
                self.advance(true).await;
            }
            _ => self.complete(&outcome).await,
        }
    }

    async fn on_chat(&mut self, sender: PlayerId, text: &str) {
        let Some(command) = ChatCommand::parse(text) else {
            return;
        };
        if !self.enforcer.roster().contains(sender) {
            debug!(match_id = %self.match_id, %sender, "command from unrostered player ignored");
            return;
        }
        match command {
            ChatCommand::Override(beatmap) => self.override_map(sender, beatmap).await,
            ChatCommand::Resume => self.resume(sender).await,
        }
    }

    async fn on_inactive(&mut self, expired: WatchdogExpired) {
        info!(
            match_id = %self.match_id,
            phase = %self.phase,
            idle_s = expired.idle_for.as_secs(),
            "closing idle room"
        );
        self.say(announce::INACTIVITY).await;
        self.close_room().await;
    }

    // -----------------------------------------------------------------------
    // Rounds
    // -----------------------------------------------------------------------

    /// Draws the next map (or a tiebreaker) and pushes it to the room.
    /// A selection failure is fatal to the match.
    async fn advance(&mut self, tiebreak: bool) {
        if let Err(e) = self.next_map(tiebreak).await {
            error!(match_id = %self.match_id, error = %e, "map selection failed, abandoning match");
            self.say(&announce::fatal(&e)).await;
            self.close_room().await;
        }
    }

    /// Draws, announces and pushes a map. Room failures pause the match;
    /// only selection errors are returned.
    async fn next_map(&mut self, tiebreak: bool) -> Result<(), SelectionError> {
        let (selection, pick) = self.draw(tiebreak)?;
        self.tiebreak = pick.is_none();

        self.say(&announce::next_map(&selection, pick)).await;
        if selection.freemod {
            self.say(announce::ALLOWED_MODS).await;
        }
        info!(
            match_id = %self.match_id,
            map = %selection.label(),
            beatmap = %selection.beatmap,
            mods = %selection.mods,
            "next map"
        );

        self.current = Some(selection);
        self.phase = MatchPhase::AwaitingReady;
        if let Err(e) = self.push_current().await {
            self.pause(PendingAction::PushMap, e).await;
        }
        Ok(())
    }

    /// Returns the selection and its 1-based pick number (`None` for a
    /// tiebreaker or decider).
    fn draw(&mut self, tiebreak: bool) -> Result<(Selection, Option<usize>), SelectionError> {
        if tiebreak {
            return Ok((self.selector.draw_tiebreak()?, None));
        }
        match self.plan.next_pick() {
            Some(group) => Ok((self.selector.draw(group)?, Some(self.plan.cursor()))),
            None if self.selector.index().tiebreak_index().is_some() => {
                warn!(match_id = %self.match_id, "pick plan exhausted, playing a decider");
                Ok((self.selector.draw_tiebreak()?, None))
            }
            None => Err(SelectionError::PlanExhausted),
        }
    }

    /// Sets the current map and mods in the room, retrying each once.
    async fn push_current(&self) -> Result<(), RoomCommandError> {
        let Some(selection) = &self.current else {
            return Ok(());
        };
        let ruleset = self.settings.ruleset;
        let backoff = self.settings.retry_backoff;
        with_retry(self.match_id, "set_map", backoff, || {
            self.room.set_map(selection.beatmap, ruleset)
        })
        .await?;
        with_retry(self.match_id, "set_mods", backoff, || {
            self.room.set_mods(selection.mods.clone(), selection.freemod)
        })
        .await
    }

    async fn complete(&mut self, outcome: &RoundOutcome) {
        if let Some(line) = announce::match_result(outcome.decision) {
            self.say(line).await;
        }
        self.say(&announce::final_score(outcome.points_red, outcome.points_blue))
            .await;
        self.say(&announce::closing(self.settings.close_grace)).await;

        self.phase = MatchPhase::Complete;
        self.watchdog.disarm();
        self.close_at = Some(Instant::now() + self.settings.close_grace);
        info!(
            match_id = %self.match_id,
            decision = ?outcome.decision,
            points_red = outcome.points_red,
            points_blue = outcome.points_blue,
            "match complete"
        );
    }

    // -----------------------------------------------------------------------
    // Chat commands
    // -----------------------------------------------------------------------

    async fn override_map(&mut self, sender: PlayerId, beatmap: BeatmapId) {
        if self.phase != MatchPhase::AwaitingReady {
            debug!(match_id = %self.match_id, phase = %self.phase, "override ignored");
            return;
        }
        let ruleset = self.settings.ruleset;
        let result = with_retry(self.match_id, "set_map", self.settings.retry_backoff, || {
            self.room.set_map(beatmap, ruleset)
        })
        .await;
        match result {
            Ok(()) => {
                if let Some(current) = &mut self.current {
                    current.replace_beatmap(beatmap);
                }
                info!(match_id = %self.match_id, %sender, %beatmap, "map overridden");
            }
            Err(e) => self.pause(PendingAction::PushMap, e).await,
        }
    }

    async fn resume(&mut self, sender: PlayerId) {
        if self.phase != MatchPhase::Paused {
            debug!(match_id = %self.match_id, phase = %self.phase, "resume ignored");
            return;
        }
        let Some(action) = self.pending.take() else {
            return;
        };
        info!(match_id = %self.match_id, %sender, ?action, "resuming match");
        self.phase = MatchPhase::AwaitingReady;
        self.watchdog.reset();

        let result = match action {
            PendingAction::PushMap => self.push_current().await,
            PendingAction::StartMatch => {
                self.room.start_match(self.settings.start_delay_secs).await
            }
        };
        if let Err(e) = result {
            self.pause(action, e).await;
        }
    }

    // -----------------------------------------------------------------------
    // Room helpers
    // -----------------------------------------------------------------------

    async fn enforce(&self, player: PlayerId, enforcement: Enforcement) {
        let result = match enforcement {
            Enforcement::Assign(team) => self.room.change_team(player, team).await,
            Enforcement::Remove => self.room.remove(player).await,
        };
        if let Err(e) = result {
            warn!(
                match_id = %self.match_id,
                %player,
                ?enforcement,
                error = %e,
                "team enforcement failed"
            );
        }
    }

    async fn pause(&mut self, action: PendingAction, err: RoomCommandError) {
        warn!(match_id = %self.match_id, ?action, error = %err, "match paused");
        self.phase = MatchPhase::Paused;
        self.pending = Some(action);
        self.say(&announce::paused(&err)).await;
    }

    /// Posts a chat line. Failures are logged, never retried.
    async fn say(&self, text: &str) {
        if let Err(e) = self.room.send_message(text).await {
            warn!(match_id = %self.match_id, error = %e, "room message failed");
        }
    }

    /// Closes the room once. A failed close still counts as closed.
    async fn close_room(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.close_at = None;
        self.pending = None;
        self.watchdog.disarm();
        if let Err(e) = self.room.close().await {
            warn!(match_id = %self.match_id, error = %e, "room close failed, treating as closed");
        }
        self.phase = MatchPhase::Closed;
        info!(
            match_id = %self.match_id,
            points_red = self.scoreboard.points_red(),
            points_blue = self.scoreboard.points_blue(),
            "room closed"
        );
    }

    fn info(&self) -> MatchInfo {
        MatchInfo {
            match_id: self.match_id,
            phase: self.phase,
            points_red: self.scoreboard.points_red(),
            points_blue: self.scoreboard.points_blue(),
            round_index: self.plan.cursor(),
            rounds_played: self.scoreboard.rounds(),
            tiebreak: self.tiebreak,
            current: self.current.clone(),
        }
    }
}

/// Runs `op`, and once more after `backoff` if it fails.
async fn with_retry<F, Fut>(
    match_id: MatchId,
    command: &'static str,
    backoff: Duration,
    mut op: F,
) -> Result<(), RoomCommandError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), RoomCommandError>>,
{
    match op().await {
        Ok(()) => Ok(()),
        Err(first) => {
            warn!(%match_id, command, error = %first, "room command failed, retrying");
            time::sleep(backoff).await;
            op().await.inspect_err(|e| {
                warn!(%match_id, command, error = %e, "room command failed after retry");
            })
        }
    }
}

async fn sleep_until_some(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// 10 random bytes, hex encoded.
fn room_password() -> String {
    let bytes: [u8; 10] = rand::random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Spawns a match actor and returns a handle to it.
///
/// `channel_size` bounds the command queue; senders wait when it is full.
pub(crate) fn spawn_match<R: RoomControl>(
    match_id: MatchId,
    config: MatchConfig,
    settings: MatchSettings,
    draft: Draft,
    room: R,
    registry: MatchRegistry,
    channel_size: usize,
) -> MatchHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = MatchActor {
        match_id,
        scoreboard: Scoreboard::new(config.best_of(), settings.tie_policy),
        enforcer: TeamEnforcer::new(config.roster().clone()),
        watchdog: InactivityWatchdog::new(settings.watchdog_config()),
        config,
        settings,
        phase: MatchPhase::Created,
        plan: draft.plan,
        selector: draft.selector,
        room,
        current: None,
        tiebreak: false,
        pending: None,
        close_at: None,
        closed: false,
        registry,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    MatchHandle {
        match_id,
        sender: tx,
    }
}
