//! Turn flow during play
//!
//! [`GamePlay`] sits between the player-facing controls and the [`Store`].
//! It tracks the phase of the current turn, drives the countdown, plays
//! sound effects and decides when the last turn has been played.

use derive_where::derive_where;
use serde::Serialize;
use thiserror::Error;

use crate::{
    game::{self, GameState, Intent},
    persistence::Storage,
    sound::{SoundBoard, SoundEvent, SoundPlayer},
    store::Store,
    timer::Countdown,
};

/// Phase of the current turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TurnPhase {
    /// Waiting for the acting team to start
    Ready,
    /// The countdown is running
    Playing,
    /// The countdown is suspended
    Paused,
    /// The countdown ran out
    TimeUp,
    /// Every turn has been played; only [`GamePlay::begin`] leaves this phase
    GameOver,
}

/// What follows a finished turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TurnOutcome {
    /// Another team is up
    Continue,
    /// Every team has played every round
    GameOver,
}

/// Reasons a turn action is refused
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The state rejected the underlying intent
    #[error(transparent)]
    Game(#[from] game::Error),
    /// Play needs teams and at least one selected category
    #[error("teams and categories must be chosen before playing")]
    NotReady,
    /// The action does not apply to the current phase
    #[error("not possible while the turn is {0:?}")]
    WrongPhase(TurnPhase),
}

/// Turn-level controller for one game
#[derive_where(Debug)]
pub struct GamePlay<P: SoundPlayer> {
    phase: TurnPhase,
    turns_played: usize,
    show_hint: bool,
    countdown: Countdown,
    board: SoundBoard,
    #[derive_where(skip)]
    player: P,
}

impl<P: SoundPlayer> GamePlay<P> {
    /// Creates a controller playing sounds through `player` at `board`'s volume
    pub fn new(player: P, board: SoundBoard) -> Self {
        Self {
            phase: TurnPhase::Ready,
            turns_played: 0,
            show_hint: false,
            countdown: Countdown::default(),
            board,
            player,
        }
    }

    /// Phase of the current turn
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Turns completed so far
    pub fn turns_played(&self) -> usize {
        self.turns_played
    }

    /// Whether the current card's hint is revealed
    pub fn show_hint(&self) -> bool {
        self.show_hint
    }

    /// The turn countdown
    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// The 1-based round being played
    pub fn round(&self, state: &GameState) -> usize {
        match state.teams().len() {
            0 => 1,
            teams => self.turns_played / teams + 1,
        }
    }

    /// Number of turns in the whole game
    pub fn total_turns(state: &GameState) -> usize {
        usize::from(state.game_settings().rounds) * state.teams().len()
    }

    fn expect_phase(&self, phase: TurnPhase) -> Result<(), Error> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(Error::WrongPhase(self.phase))
        }
    }

    fn play_sound(&self, state: &GameState, event: SoundEvent) {
        self.board.trigger(
            event,
            state.game_settings().sound_enabled,
            &state.admin_settings().sound_effects,
            &self.player,
        );
    }

    /// Starts the game if needed and prepares the first turn
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NotReady`] when no teams or no categories have
    /// been chosen.
    ///
    /// After [`TurnPhase::GameOver`] a fresh deck is dealt; team scores are
    /// only cleared by [`Intent::ResetGame`].
    pub fn begin<S: Storage>(&mut self, store: &mut Store<S>) -> Result<(), Error> {
        let state = store.state();
        if state.teams().is_empty() || state.selected_categories().is_empty() {
            return Err(Error::NotReady);
        }
        if !state.game_started() || self.phase == TurnPhase::GameOver {
            store.dispatch(Intent::StartGame)?;
        }
        self.countdown
            .set_duration(store.state().game_settings().time_limit);
        self.phase = TurnPhase::Ready;
        self.turns_played = 0;
        self.show_hint = false;
        Ok(())
    }

    /// Starts acting: the countdown begins
    ///
    /// # Errors
    ///
    /// Only possible from [`TurnPhase::Ready`].
    pub fn start_turn<S, F>(&mut self, store: &Store<S>, schedule_message: &mut F) -> Result<(), Error>
    where
        S: Storage,
        F: FnMut(crate::AlarmMessage, web_time::Duration),
    {
        self.expect_phase(TurnPhase::Ready)?;
        self.phase = TurnPhase::Playing;
        self.countdown.set_active(true, schedule_message);
        self.play_sound(store.state(), SoundEvent::GameStart);
        Ok(())
    }

    /// Suspends the countdown
    ///
    /// # Errors
    ///
    /// Only possible from [`TurnPhase::Playing`].
    pub fn pause<F>(&mut self, schedule_message: &mut F) -> Result<(), Error>
    where
        F: FnMut(crate::AlarmMessage, web_time::Duration),
    {
        self.expect_phase(TurnPhase::Playing)?;
        self.phase = TurnPhase::Paused;
        self.countdown.set_active(false, schedule_message);
        Ok(())
    }

    /// Resumes the countdown with the time that was left
    ///
    /// # Errors
    ///
    /// Only possible from [`TurnPhase::Paused`].
    pub fn resume<F>(&mut self, schedule_message: &mut F) -> Result<(), Error>
    where
        F: FnMut(crate::AlarmMessage, web_time::Duration),
    {
        self.expect_phase(TurnPhase::Paused)?;
        self.phase = TurnPhase::Playing;
        self.countdown.set_active(true, schedule_message);
        Ok(())
    }

    /// Scores the current card for the acting team and shows another
    ///
    /// # Errors
    ///
    /// Only possible from [`TurnPhase::Playing`].
    pub fn correct_guess<S: Storage>(&mut self, store: &mut Store<S>) -> Result<(), Error> {
        self.expect_phase(TurnPhase::Playing)?;
        store.dispatch(Intent::CorrectGuess)?;
        store.dispatch(Intent::NextCard)?;
        self.show_hint = false;
        self.play_sound(store.state(), SoundEvent::CorrectGuess);
        Ok(())
    }

    /// Passes on the current card without scoring
    ///
    /// # Errors
    ///
    /// Only possible from [`TurnPhase::Playing`].
    pub fn skip<S: Storage>(&mut self, store: &mut Store<S>) -> Result<(), Error> {
        self.expect_phase(TurnPhase::Playing)?;
        store.dispatch(Intent::NextCard)?;
        self.show_hint = false;
        Ok(())
    }

    /// Reveals or hides the hint, returning whether it is now shown
    pub fn toggle_hint(&mut self) -> bool {
        self.show_hint = !self.show_hint;
        self.show_hint
    }

    /// Delivers a scheduled alarm to the countdown
    ///
    /// Returns whether the alarm was current. When it runs the countdown
    /// out, the turn moves to [`TurnPhase::TimeUp`].
    pub fn receive_alarm<S, F>(
        &mut self,
        store: &Store<S>,
        message: &crate::AlarmMessage,
        schedule_message: &mut F,
    ) -> bool
    where
        S: Storage,
        F: FnMut(crate::AlarmMessage, web_time::Duration),
    {
        let crate::AlarmMessage::Countdown(tick) = message;
        let mut time_up = false;
        let current = self
            .countdown
            .receive_alarm(tick, schedule_message, || time_up = true);
        if time_up {
            tracing::debug!(turn = self.turns_played, "turn timed out");
            self.phase = TurnPhase::TimeUp;
            self.play_sound(store.state(), SoundEvent::TimeUp);
        }
        current
    }

    /// Ends the turn and hands over to the next team
    ///
    /// A team may end its turn early while playing or paused; any pending
    /// tick is dropped. After the final turn the game is finished, which
    /// records it in the lifetime statistics exactly once.
    ///
    /// # Errors
    ///
    /// Not possible from [`TurnPhase::Ready`] or [`TurnPhase::GameOver`].
    pub fn next_turn<S: Storage>(&mut self, store: &mut Store<S>) -> Result<TurnOutcome, Error> {
        if !matches!(
            self.phase,
            TurnPhase::Playing | TurnPhase::Paused | TurnPhase::TimeUp
        ) {
            return Err(Error::WrongPhase(self.phase));
        }
        store.dispatch(Intent::NextTurn)?;
        self.turns_played += 1;
        self.show_hint = false;
        self.countdown.reset(|_| ());

        if self.turns_played >= Self::total_turns(store.state()) {
            store.dispatch(Intent::FinishGame)?;
            self.phase = TurnPhase::GameOver;
            Ok(TurnOutcome::GameOver)
        } else {
            self.phase = TurnPhase::Ready;
            Ok(TurnOutcome::Continue)
        }
    }

    /// Plays the button click effect, for controls outside the turn flow
    ///
    /// Returns whether anything was played.
    pub fn click(&self, state: &GameState) -> bool {
        self.board.trigger(
            SoundEvent::ButtonClick,
            state.game_settings().sound_enabled,
            &state.admin_settings().sound_effects,
            &self.player,
        )
    }

    /// Abandons the turn in progress, for leaving the play screen
    ///
    /// The next turn starts with the full time again.
    pub fn stop(&mut self) {
        self.countdown.reset(|_| ());
        if self.phase != TurnPhase::GameOver {
            self.phase = TurnPhase::Ready;
        }
    }
}
