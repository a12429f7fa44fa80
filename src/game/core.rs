// The game aggregate is passed around by value: services fetch it from the
// store, mutate it through the methods below and save it back as one unit.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::game::scoring::{self, PlayerSnapshot};
use crate::game::validation::{self, ValidationError};
use crate::shared::{GameId, PlayerId};

pub const ROUND_COUNT: u8 = 12;
pub const FIRST_OPTIONAL_ROUND: u8 = 9;
pub const LAST_OPTIONAL_ROUND: u8 = 11;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;
pub const MAX_ROUND_SCORE: i32 = 999;

/// Cosmetic tag recorded when the first card of a round is revealed.
/// Never read by validation or scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardColor {
    Red,
    Black,
}

/// One entry in a game's fixed, ordered roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    pub player_id: PlayerId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub number: u8,
    /// Dealer at the time the round was dealt.
    pub dealer_index: usize,
    pub is_completed: bool,
    pub is_skipped: bool,
    pub scores: HashMap<PlayerId, i32>,
    pub first_card_color: Option<CardColor>,
}

impl Round {
    pub fn new(number: u8, dealer_index: usize) -> Self {
        Self {
            number,
            dealer_index,
            is_completed: false,
            is_skipped: false,
            scores: HashMap::new(),
            first_card_color: None,
        }
    }

    /// A round that contributes to totals: completed and not skipped.
    pub fn is_scored(&self) -> bool {
        self.is_completed && !self.is_skipped
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Game is already completed")]
    AlreadyCompleted,
    #[error("Round {0} is not correctable")]
    RoundNotCorrectable(u8),
}

/// What a successful submit or skip did to the game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RoundOutcome {
    Advanced { next_round: u8, dealer_index: usize },
    Completed { snapshots: Vec<PlayerSnapshot> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    id: GameId,
    seats: Vec<Seat>,
    dealer_index: usize,
    current_round: u8,
    is_active: bool,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    /// Populated exactly once, at completion. Ordered by final position.
    snapshots: Vec<PlayerSnapshot>,
    /// Fixed 12 slots, index = round number - 1. Slots up to `current_round`
    /// are populated; later slots stay empty until the game reaches them.
    rounds: [Option<Round>; ROUND_COUNT as usize],
    /// Optimistic concurrency token managed by the store.
    version: u64,
}

impl Game {
    /// Creates a game with round 1 pre-materialized and the clock started.
    pub fn new(id: GameId, seats: Vec<Seat>, dealer_index: usize) -> Result<Self, ValidationError> {
        validation::validate_setup(seats.len(), dealer_index)?;

        let mut rounds: [Option<Round>; ROUND_COUNT as usize] = std::array::from_fn(|_| None);
        rounds[0] = Some(Round::new(1, dealer_index));

        Ok(Self {
            id,
            seats,
            dealer_index,
            current_round: 1,
            is_active: true,
            started_at: Utc::now(),
            ended_at: None,
            snapshots: Vec::new(),
            rounds,
            version: 0,
        })
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.seats.iter().map(|s| s.player_id)
    }

    pub fn has_player(&self, player_id: PlayerId) -> bool {
        self.seats.iter().any(|s| s.player_id == player_id)
    }

    pub fn dealer_index(&self) -> usize {
        self.dealer_index
    }

    pub fn current_round(&self) -> u8 {
        self.current_round
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn snapshots(&self) -> &[PlayerSnapshot] {
        &self.snapshots
    }

    pub fn round(&self, number: u8) -> Option<&Round> {
        if number < 1 || number > ROUND_COUNT {
            return None;
        }
        self.rounds[number as usize - 1].as_ref()
    }

    /// All materialized rounds, in number order.
    pub fn rounds(&self) -> impl Iterator<Item = &Round> {
        self.rounds.iter().flatten()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    /// The dealer round 1 was dealt with. Round 1 exists from creation, but a
    /// partially written aggregate might have lost it, so fall back to the
    /// current dealer.
    fn initial_dealer_index(&self) -> usize {
        self.rounds[0]
            .as_ref()
            .map(|r| r.dealer_index)
            .unwrap_or(self.dealer_index)
    }

    /// Returns the round object for `number`, materializing one if a prior
    /// partial write left a gap. Gap-filling is a logged repair, not a normal
    /// path: the dealer is reconstructed from the initial rotation.
    fn materialized_round(&mut self, number: u8) -> Round {
        let idx = number as usize - 1;
        match self.rounds[idx].take() {
            Some(round) => round,
            None => {
                let dealer =
                    (self.initial_dealer_index() + number as usize - 1) % self.seats.len();
                warn!(
                    game_id = %self.id,
                    round = number,
                    dealer_index = dealer,
                    "Materializing missing round object"
                );
                Round::new(number, dealer)
            }
        }
    }

    fn store_round(&mut self, round: Round) {
        let idx = round.number as usize - 1;
        self.rounds[idx] = Some(round);
    }

    /// Submits scores for the current round. On success the round is marked
    /// completed; the game either advances to the next round (rotating the
    /// dealer by one) or, after round 12, completes.
    pub fn submit_scores(
        &mut self,
        scores: HashMap<PlayerId, i32>,
    ) -> Result<RoundOutcome, GameError> {
        if !self.is_active {
            return Err(GameError::AlreadyCompleted);
        }

        let number = self.current_round;
        let mut round = self.materialized_round(number);
        round.scores = scores;
        round.is_skipped = false;

        if let Err(err) = validation::validate_round(&round, self) {
            // Put the untouched-state round back so a rejected submission
            // leaves the aggregate exactly as it was.
            round.scores = HashMap::new();
            self.store_round(round);
            return Err(err.into());
        }

        round.is_completed = true;
        self.store_round(round);

        if number == ROUND_COUNT {
            self.complete();
            return Ok(RoundOutcome::Completed {
                snapshots: self.snapshots.clone(),
            });
        }

        Ok(self.advance(number))
    }

    /// Skips the current round. Only rounds 9-11 are skippable; the validator
    /// rejects everything else. A skipped round carries no scores.
    pub fn skip_round(&mut self) -> Result<RoundOutcome, GameError> {
        if !self.is_active {
            return Err(GameError::AlreadyCompleted);
        }

        let number = self.current_round;
        let mut round = self.materialized_round(number);
        round.is_skipped = true;
        round.scores = HashMap::new();

        if let Err(err) = validation::validate_round(&round, self) {
            round.is_skipped = false;
            self.store_round(round);
            return Err(err.into());
        }

        round.is_completed = true;
        self.store_round(round);

        // Round 12 is never skippable, so a skip always advances.
        Ok(self.advance(number))
    }

    /// Skips optional rounds until the game sits at round 12. Lets a caller
    /// jump from the end of round 8 straight to the final round without one
    /// interaction per optional round.
    pub fn skip_through_optional(&mut self) -> Result<RoundOutcome, GameError> {
        let mut outcome = self.skip_round()?;
        while (FIRST_OPTIONAL_ROUND..=LAST_OPTIONAL_ROUND).contains(&self.current_round) {
            outcome = self.skip_round()?;
        }
        Ok(outcome)
    }

    fn advance(&mut self, completed_number: u8) -> RoundOutcome {
        let next = completed_number + 1;
        self.current_round = next;
        self.dealer_index = (self.dealer_index + 1) % self.seats.len();

        if self.rounds[next as usize - 1].is_none() {
            self.rounds[next as usize - 1] = Some(Round::new(next, self.dealer_index));
        }

        RoundOutcome::Advanced {
            next_round: next,
            dealer_index: self.dealer_index,
        }
    }

    /// Completion predicate straight from the round record, independent of
    /// `is_active`. Usable to repair games whose flag went stale.
    pub fn is_complete(&self) -> bool {
        let final_round_scored = self.round(ROUND_COUNT).is_some_and(|r| r.is_scored());
        let mandatory_done = (1..FIRST_OPTIONAL_ROUND)
            .all(|n| self.round(n).is_some_and(|r| r.is_scored()));
        let optional_resolved = (FIRST_OPTIONAL_ROUND..=LAST_OPTIONAL_ROUND)
            .all(|n| self.round(n).is_some_and(|r| r.is_completed || r.is_skipped));

        final_round_scored && mandatory_done && optional_resolved
    }

    /// Flips `is_active`, stamps `ended_at` and archives the final snapshot.
    /// Safe to call more than once: the snapshot list and end date are only
    /// written the first time.
    fn complete(&mut self) {
        if self.snapshots.is_empty() {
            self.snapshots = scoring::build_snapshots(self);
        }
        if self.ended_at.is_none() {
            self.ended_at = Some(Utc::now());
        }
        self.is_active = false;
        info!(game_id = %self.id, "Game completed");
    }

    /// Repairs a game whose `is_active` flag lags the round record, running
    /// the completion side effects it missed. Returns whether a repair
    /// happened.
    pub fn reconcile_completion(&mut self) -> bool {
        if self.is_active && self.is_complete() {
            warn!(game_id = %self.id, "Reconciling stale is_active flag on completed game");
            self.complete();
            return true;
        }
        false
    }

    /// Replaces the scores of an already-completed round, re-validating the
    /// replacement. Dealer rotation is not re-run; totals are re-derived on
    /// demand. Only legal while the game is active.
    pub fn correct_scores(
        &mut self,
        number: u8,
        scores: HashMap<PlayerId, i32>,
    ) -> Result<(), GameError> {
        if !self.is_active {
            return Err(GameError::AlreadyCompleted);
        }

        let existing = match self.round(number) {
            Some(r) if r.is_scored() => r.clone(),
            _ => return Err(GameError::RoundNotCorrectable(number)),
        };

        let mut corrected = existing;
        corrected.scores = scores;
        validation::validate_round(&corrected, self)?;
        self.store_round(corrected);
        Ok(())
    }

    /// Records the cosmetic first-card tag on the current round.
    pub fn set_first_card_color(&mut self, color: CardColor) -> Result<(), GameError> {
        if !self.is_active {
            return Err(GameError::AlreadyCompleted);
        }
        let number = self.current_round;
        let mut round = self.materialized_round(number);
        round.first_card_color = Some(color);
        self.store_round(round);
        Ok(())
    }

    pub fn total_score(&self, player_id: PlayerId) -> i32 {
        scoring::total_score(self, player_id)
    }
}
