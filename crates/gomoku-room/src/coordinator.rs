//! Room coordinator: the lobby and match state machine for one room.
//!
//! Everything in here is synchronous. The room actor owns one [`Room`],
//! feeds it one command at a time, and hands the returned views to the
//! connection hub once the transition is complete. Nothing in this module
//! touches a connection.
//!
//! ```text
//!  Unready ──all ready──▶ Ready ──start──▶ Started ──win──▶ Finished
//!     ▲                                                       │
//!     └──────────────── disconnect (any phase) ◀──────────────┘
//! ```

use gomoku_board::Game;
use gomoku_protocol::{
    ClientAction, Color, MatchId, ParticipantId, RoomId, RoomStatus, RoomSummary,
    ServerView,
};
use gomoku_session::Identity;
use rand::Rng;

use crate::{Decline, DisconnectPolicy, ResetPolicy, RoomConfig, RoomError, ROOM_CAPACITY};

/// Who receives an outbound view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// Every participant with a registered connection.
    All,
    /// One participant.
    Participant(ParticipantId),
}

/// Views produced by one transition, in delivery order.
pub type Views = Vec<(Recipient, ServerView)>;

/// A participant slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub handle: String,
    pub ready: bool,
    pub owner: bool,
    /// Assigned at match start; `None` in the lobby.
    pub color: Option<Color>,
}

impl Participant {
    fn new(identity: &Identity, owner: bool) -> Self {
        Self {
            id: identity.id.clone(),
            handle: identity.handle.clone(),
            ready: owner,
            owner,
            color: None,
        }
    }
}

/// The result of a gameplay action.
#[derive(Debug, Default)]
pub struct Outcome {
    pub views: Views,
    /// Set when the action was refused. State is unchanged in that case.
    pub declined: Option<Decline>,
}

impl Outcome {
    fn applied(views: Views) -> Self {
        Self {
            views,
            declined: None,
        }
    }

    fn declined(who: &ParticipantId, decline: Decline) -> Self {
        let mut views = Vec::new();
        if !decline.is_silent() {
            views.push((
                Recipient::Participant(who.clone()),
                ServerView::Error {
                    message: decline.to_string(),
                },
            ));
        }
        Self {
            views,
            declined: Some(decline),
        }
    }
}

/// The result of a participant leaving.
#[derive(Debug, Default)]
pub struct Departure {
    pub views: Views,
    /// No participants remain; the room must be destroyed.
    pub room_empty: bool,
}

/// One room: participants, lobby status, and its match.
#[derive(Debug)]
pub struct Room {
    id: RoomId,
    name: String,
    status: RoomStatus,
    participants: Vec<Participant>,
    game: Game,
    config: RoomConfig,
}

impl Room {
    /// Creates a room with `owner` as its only (ready) participant.
    pub fn new(
        id: RoomId,
        name: String,
        owner: &Identity,
        match_id: MatchId,
        config: RoomConfig,
    ) -> Self {
        let room = Self {
            id,
            name,
            status: RoomStatus::Unready,
            participants: vec![Participant::new(owner, true)],
            game: Game::new(match_id),
            config,
        };
        room.check_invariants();
        room
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, who: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == who)
    }

    pub fn is_participant(&self, who: &ParticipantId) -> bool {
        self.participant(who).is_some()
    }

    pub fn owner(&self) -> Option<&ParticipantId> {
        self.participants.iter().find(|p| p.owner).map(|p| &p.id)
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= ROOM_CAPACITY
    }

    /// The match, while one is live (`Started` or `Finished`).
    pub fn live_match(&self) -> Option<&Game> {
        self.status.has_match().then_some(&self.game)
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            id: self.id,
            name: self.name.clone(),
            status: self.status,
            owner: self.owner().cloned(),
            is_full: self.is_full(),
        }
    }

    /// Adds `identity` as a non-ready participant.
    pub fn join(&mut self, identity: &Identity) -> Result<Views, RoomError> {
        if self.is_full() {
            return Err(RoomError::RoomFull(self.id));
        }
        if self.is_participant(&identity.id) {
            return Err(RoomError::AlreadyJoined(identity.id.clone(), self.id));
        }

        self.participants.push(Participant::new(identity, false));
        self.recompute_lobby_status();
        self.check_invariants();

        tracing::info!(
            room_id = %self.id,
            participant = %identity.id,
            participants = self.participants.len(),
            "participant joined"
        );
        Ok(vec![(Recipient::All, self.room_update())])
    }

    /// Applies one gameplay action from `who`.
    pub fn apply<R: Rng>(&mut self, who: &ParticipantId, action: ClientAction, rng: &mut R) -> Outcome {
        let outcome = match action {
            ClientAction::Ready => self.set_ready(who, true),
            ClientAction::CancelReady => self.set_ready(who, false),
            ClientAction::StartGame => self.start(who, rng),
            ClientAction::Move { row, col } => self.make_move(who, row, col),
            ClientAction::Reset => self.reset(who),
            ClientAction::GetState => Outcome::applied(self.state_for(who)),
        };
        if let Some(decline) = &outcome.declined {
            tracing::debug!(
                room_id = %self.id,
                participant = %who,
                action = action.kind(),
                reason = %decline,
                "action declined"
            );
        }
        self.check_invariants();
        outcome
    }

    /// Sets or clears `who`'s ready flag and recomputes lobby status.
    ///
    /// Declined while a match is being played, including one reopened by
    /// a reset after a win. Once the match is decided this returns the
    /// room to the lobby, which is how a rematch begins.
    pub fn set_ready(&mut self, who: &ParticipantId, ready: bool) -> Outcome {
        if self.status.has_match() && !self.game.is_finished() {
            if !self.is_participant(who) {
                return Outcome::declined(who, Decline::NotParticipant);
            }
            return Outcome::declined(who, Decline::MatchInProgress);
        }
        let Some(participant) = self.participants.iter_mut().find(|p| &p.id == who) else {
            return Outcome::declined(who, Decline::NotParticipant);
        };

        participant.ready = ready;
        self.recompute_lobby_status();
        Outcome::applied(vec![(Recipient::All, self.room_update())])
    }

    /// Starts a match. Only the owner may start, and only from `Ready`.
    pub fn start<R: Rng>(&mut self, who: &ParticipantId, rng: &mut R) -> Outcome {
        let Some(participant) = self.participant(who) else {
            return Outcome::declined(who, Decline::NotParticipant);
        };
        if !participant.owner {
            return Outcome::declined(who, Decline::NotOwner);
        }
        if self.status != RoomStatus::Ready {
            return Outcome::declined(who, Decline::NotReady);
        }

        // Ready implies a full room.
        let first = if rng.random_bool(0.5) {
            Color::Black
        } else {
            Color::White
        };
        self.participants[0].color = Some(first);
        self.participants[1].color = Some(first.opponent());

        self.game.reset();
        self.status = RoomStatus::Started;

        tracing::info!(
            room_id = %self.id,
            match_id = %self.game.id(),
            black = %self.participant_with(Color::Black).map_or("-", |p| p.id.as_str()),
            white = %self.participant_with(Color::White).map_or("-", |p| p.id.as_str()),
            "match started"
        );

        let views = self
            .participants
            .iter()
            .filter_map(|p| {
                p.color.map(|assigned| {
                    (
                        Recipient::Participant(p.id.clone()),
                        ServerView::GameStart {
                            match_id: self.game.id(),
                            board: self.game.board().to_codes(),
                            current_turn: self.game.turn(),
                            assigned,
                            status: self.status,
                            owner: self.owner().cloned(),
                            room_name: self.name.clone(),
                        },
                    )
                })
            })
            .collect();
        Outcome::applied(views)
    }

    /// Places a stone for `who` if it is their turn.
    ///
    /// Wrong-turn and illegal moves are dropped without a reply.
    pub fn make_move(&mut self, who: &ParticipantId, row: i64, col: i64) -> Outcome {
        if !self.status.has_match() {
            return Outcome::declined(who, Decline::NoMatch);
        }
        let Some(participant) = self.participant(who) else {
            return Outcome::declined(who, Decline::NotParticipant);
        };
        if participant.color != Some(self.game.turn()) {
            return Outcome::declined(who, Decline::NotYourTurn);
        }

        let placement = match self.game.apply_move(row, col) {
            Ok(placement) => placement,
            Err(rejected) => return Outcome::declined(who, Decline::IllegalMove(rejected)),
        };

        let mut views = Vec::new();
        views.extend(self.match_update().map(|view| (Recipient::All, view)));

        if placement.won {
            self.status = RoomStatus::Finished;
            tracing::info!(
                room_id = %self.id,
                match_id = %self.game.id(),
                winner = %placement.color,
                participant = %who,
                "match won"
            );
            views.push((Recipient::All, self.room_update()));
        }
        Outcome::applied(views)
    }

    /// Clears the live match's board in place. Status is unchanged.
    pub fn reset(&mut self, who: &ParticipantId) -> Outcome {
        let Some(participant) = self.participant(who) else {
            return Outcome::declined(who, Decline::NotParticipant);
        };
        if self.config.reset_policy == ResetPolicy::OwnerOnly && !participant.owner {
            return Outcome::declined(who, Decline::ResetNotAllowed);
        }
        if !self.status.has_match() {
            return Outcome::declined(who, Decline::NoMatch);
        }

        self.game.reset();
        tracing::info!(room_id = %self.id, match_id = %self.game.id(), participant = %who, "match reset");
        Outcome::applied(self.match_update().map(|view| (Recipient::All, view)).into_iter().collect())
    }

    /// The latest match view (if any) followed by the room view, for `who`
    /// only.
    pub fn state_for(&self, who: &ParticipantId) -> Views {
        let to = || Recipient::Participant(who.clone());
        let mut views: Views = self.match_update().map(|view| (to(), view)).into_iter().collect();
        views.push((to(), self.room_update()));
        views
    }

    /// Removes `who`'s slot.
    ///
    /// Ownership passes to the first remaining participant, who is marked
    /// ready. The room always falls back to `Unready`; a match in progress
    /// is settled by the configured [`DisconnectPolicy`] first.
    pub fn leave(&mut self, who: &ParticipantId) -> Departure {
        let Some(index) = self.participants.iter().position(|p| &p.id == who) else {
            return Departure::default();
        };
        let departed = self.participants.remove(index);

        tracing::info!(
            room_id = %self.id,
            participant = %departed.id,
            handle = %departed.handle,
            was_owner = departed.owner,
            remaining = self.participants.len(),
            "participant left"
        );

        if self.participants.is_empty() {
            return Departure {
                views: Vec::new(),
                room_empty: true,
            };
        }

        let mut views = Vec::new();

        if self.status == RoomStatus::Started {
            match self.config.disconnect_policy {
                DisconnectPolicy::Forfeit => {
                    if let Some(winner) = departed.color.map(Color::opponent) {
                        self.game.forfeit(winner);
                        tracing::info!(
                            room_id = %self.id,
                            match_id = %self.game.id(),
                            %winner,
                            "match forfeited"
                        );
                        views.extend(self.match_update().map(|view| (Recipient::All, view)));
                    }
                }
                DisconnectPolicy::Abandon => {
                    tracing::info!(room_id = %self.id, match_id = %self.game.id(), "match abandoned");
                }
            }
        }

        if departed.owner {
            let heir = &mut self.participants[0];
            heir.owner = true;
            heir.ready = true;
            tracing::info!(room_id = %self.id, owner = %heir.id, "ownership transferred");
        }

        self.status = RoomStatus::Unready;
        for p in &mut self.participants {
            p.color = None;
        }
        self.check_invariants();

        views.push((Recipient::All, self.room_update()));
        Departure {
            views,
            room_empty: false,
        }
    }

    /// The `room_update` view of the current state.
    pub fn room_update(&self) -> ServerView {
        ServerView::RoomUpdate {
            status: self.status,
            owner: self.owner().cloned(),
            current_turn: self.live_match().map(Game::turn),
            room_name: self.name.clone(),
        }
    }

    fn match_update(&self) -> Option<ServerView> {
        self.live_match().map(|game| ServerView::Update {
            match_id: game.id(),
            board: game.board().to_codes(),
            current_turn: game.turn(),
            winner: game.winner(),
        })
    }

    fn participant_with(&self, color: Color) -> Option<&Participant> {
        self.participants.iter().find(|p| p.color == Some(color))
    }

    /// Lobby rule: `Ready` exactly when the room is full and everyone is
    /// ready. Leaving a finished match drops the color assignment.
    fn recompute_lobby_status(&mut self) {
        let all_ready = self.participants.iter().all(|p| p.ready);
        self.status = if self.is_full() && all_ready {
            RoomStatus::Ready
        } else {
            RoomStatus::Unready
        };
        for p in &mut self.participants {
            p.color = None;
        }
    }

    /// A broken invariant here is a coordinator bug, not a runtime
    /// condition.
    fn check_invariants(&self) {
        let owners = self.participants.iter().filter(|p| p.owner).count();
        assert!(
            self.participants.is_empty() || owners == 1,
            "room {} has {owners} owners",
            self.id
        );
        assert!(
            self.participants.len() <= ROOM_CAPACITY,
            "room {} over capacity",
            self.id
        );
        if self.status == RoomStatus::Ready {
            assert!(
                self.is_full() && self.participants.iter().all(|p| p.ready),
                "room {} is Ready without a full, ready lobby",
                self.id
            );
        }
        if self.status.has_match() {
            let black = self.participant_with(Color::Black).is_some();
            let white = self.participant_with(Color::White).is_some();
            assert!(black && white, "room {} has a match without both colors", self.id);
        } else {
            assert!(
                self.participants.iter().all(|p| p.color.is_none()),
                "room {} has colors outside a match",
                self.id
            );
        }
    }
}
