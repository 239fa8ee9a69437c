use std::rc::Rc;
use std::time::Instant;

use crate::config::GameConfig;
use crate::field::{Field, FieldView, ItemKind};
use crate::session::{Countdown, SessionState, TerminationReason};
use crate::sound::{AudioCueProvider, Cue};

pub type GameStopListener = Box<dyn FnMut(TerminationReason)>;

/// Session controller: owns the lifecycle, the score and the countdown, and
/// drives the field and the audio cues.
pub struct Game<F: FieldView = Field> {
    config: GameConfig,
    state: SessionState,
    score: u32,
    remaining_secs: u32,
    countdown: Option<Countdown>,
    last_reason: Option<TerminationReason>,
    field: F,
    audio: Rc<dyn AudioCueProvider>,
    on_game_stop: Option<GameStopListener>,
}

impl<F: FieldView> Game<F> {
    pub fn new(config: GameConfig, field: F, audio: Rc<dyn AudioCueProvider>) -> Self {
        Self {
            config,
            state: SessionState::Idle,
            score: 0,
            remaining_secs: config.duration_secs(),
            countdown: None,
            last_reason: None,
            field,
            audio,
            on_game_stop: None,
        }
    }

    /// Registers the single callback told how each session ended.
    pub fn set_game_stop_listener(&mut self, listener: GameStopListener) {
        self.on_game_stop = Some(listener);
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Begins a fresh session with the countdown anchored at `now`. A running
    /// session is abandoned silently: its timer is dropped and no termination
    /// is reported for it.
    pub fn start_at(&mut self, now: Instant) {
        if self.state == SessionState::Running {
            log::info!("restarting a running session");
        }
        self.stop_timer();

        self.score = 0;
        self.remaining_secs = self.config.duration_secs();
        self.last_reason = None;
        self.state = SessionState::Running;

        self.field
            .place_items(self.config.carrot_count(), self.config.bug_count());
        self.field.animate_bad_items();
        self.countdown = Some(Countdown::every_second(now));
        self.audio.play_ambient_loop();

        log::info!(
            "session started: {}s, {} carrots, {} bugs",
            self.config.duration_secs(),
            self.config.carrot_count(),
            self.config.bug_count()
        );
    }

    /// User pause. Ignored unless a session is running.
    pub fn stop(&mut self) {
        if self.state != SessionState::Running {
            return;
        }
        self.finish(TerminationReason::Paused);
    }

    pub fn on_item_activated(&mut self, kind: ItemKind) {
        if self.state != SessionState::Running {
            log::debug!("ignoring {} while {}", kind, self.state);
            return;
        }
        match kind {
            ItemKind::Carrot => {
                self.score += 1;
                self.audio.play_cue(Cue::Carrot);
                if self.score == self.config.carrot_count() {
                    self.finish(TerminationReason::Win);
                }
            }
            ItemKind::Bug => self.finish(TerminationReason::Lose),
        }
    }

    /// Advances the countdown to `now`, firing one tick per elapsed second.
    pub fn on_tick(&mut self, now: Instant) {
        let fired = match self.countdown.as_mut() {
            Some(countdown) => countdown.due(now),
            None => return,
        };
        for _ in 0..fired {
            if self.state != SessionState::Running {
                break;
            }
            self.tick_second();
        }
    }

    fn tick_second(&mut self) {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            let reason = if self.score == self.config.carrot_count() {
                TerminationReason::Win
            } else {
                TerminationReason::Timeout
            };
            self.finish(reason);
        }
    }

    fn finish(&mut self, reason: TerminationReason) {
        self.state = SessionState::Finished;
        self.stop_timer();
        self.audio.stop_ambient_loop();
        self.audio.play_cue(match reason {
            TerminationReason::Win => Cue::Win,
            TerminationReason::Lose | TerminationReason::Timeout => Cue::Bug,
            TerminationReason::Paused => Cue::Alert,
        });
        self.last_reason = Some(reason);

        log::info!(
            "session finished: {} (score {}/{}, {}s left)",
            reason,
            self.score,
            self.config.carrot_count(),
            self.remaining_secs
        );
        if let Some(listener) = self.on_game_stop.as_mut() {
            listener(reason);
        }
    }

    fn stop_timer(&mut self) {
        self.countdown = None;
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn carrots_left(&self) -> u32 {
        self.config.carrot_count().saturating_sub(self.score)
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn has_timer(&self) -> bool {
        self.countdown.is_some()
    }

    pub fn last_reason(&self) -> Option<TerminationReason> {
        self.last_reason
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut F {
        &mut self.field
    }
}
