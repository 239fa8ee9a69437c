use std::rc::Rc;
use std::sync::mpsc::Sender;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Position, Rect};

use crate::config::GameConfig;
use crate::field::{Field, FieldView};
use crate::game::Game;
use crate::popup::Popup;
use crate::runtime::GameEvent;
use crate::session::{SessionState, TerminationReason};
use crate::sound::AudioCueProvider;
use crate::ui::layout::{
    button_area, button_label, popup_area, retry_button_area, screen_layout, Viewport,
};

pub const TICK_RATE_MS: u64 = 100;

/// Banner text for the end of a session.
pub fn finish_message(reason: TerminationReason) -> &'static str {
    match reason {
        TerminationReason::Win => "YOU WIN ✨",
        TerminationReason::Lose | TerminationReason::Timeout => "YOU LOST 🤡",
        TerminationReason::Paused => "Replay❓",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitType {
    Continue,
    Quit,
}

/// Entry-point wiring: owns the game and the popup and turns events from
/// the runtime channel into calls on them.
pub struct App {
    pub game: Game<Field>,
    pub popup: Popup,
    size: Rect,
}

impl App {
    /// Listeners on the field, the game and the popup all forward into
    /// `events`, so every state change happens on the loop that owns `App`.
    pub fn new(
        config: GameConfig,
        mut field: Field,
        audio: Rc<dyn AudioCueProvider>,
        events: Sender<GameEvent>,
    ) -> Self {
        let tx = events.clone();
        field.set_activation_listener(Box::new(move |kind| {
            forward(&tx, GameEvent::Activated(kind));
        }));

        let mut game = Game::new(config, field, audio);
        let tx = events.clone();
        game.set_game_stop_listener(Box::new(move |reason| {
            forward(&tx, GameEvent::Stopped(reason));
        }));

        let mut popup = Popup::new();
        popup.set_retry_listener(Box::new(move || forward(&events, GameEvent::Retry)));

        Self {
            game,
            popup,
            size: Rect::default(),
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.size = Rect::new(0, 0, width, height);
    }

    pub fn area(&self) -> Rect {
        self.size
    }

    pub fn handle_event(&mut self, event: GameEvent) -> ExitType {
        self.handle_event_at(event, Instant::now())
    }

    /// The countdown catches up with `now` before any event is dispatched, so
    /// input arriving after the deadline sees a finished session and a steady
    /// stream of input cannot hold back the clock.
    pub fn handle_event_at(&mut self, event: GameEvent, now: Instant) -> ExitType {
        self.game.on_tick(now);
        match event {
            GameEvent::Tick => {}
            GameEvent::Resize(w, h) => self.resize(w, h),
            GameEvent::Key(key) => return self.on_key(key, now),
            GameEvent::Click { column, row } => self.on_click(column, row, now),
            GameEvent::Activated(kind) => self.game.on_item_activated(kind),
            GameEvent::Stopped(reason) => self.popup.show_message(finish_message(reason)),
            GameEvent::Retry => self.game.start_at(now),
        }
        ExitType::Continue
    }

    fn on_key(&mut self, key: KeyEvent, now: Instant) -> ExitType {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return ExitType::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return ExitType::Quit
            }
            KeyCode::Char(' ') => self.press_game_button(now),
            KeyCode::Char('r') | KeyCode::Enter => self.popup.retry(),
            _ => {}
        }
        ExitType::Continue
    }

    fn on_click(&mut self, column: u16, row: u16, now: Instant) {
        let at = Position::new(column, row);

        // the popup is modal
        if self.popup.is_visible() {
            let popup = popup_area(self.size, self.popup.text());
            if retry_button_area(popup).contains(at) {
                self.popup.retry();
            }
            return;
        }

        let layout = screen_layout(self.size);
        if let Some(label) = button_label(self.game.state()) {
            if button_area(layout.header, label).contains(at) {
                self.press_game_button(now);
                return;
            }
        }

        let viewport = Viewport::new(layout.field, *self.game.field().geometry());
        if let Some(point) = viewport.to_field(column, row) {
            self.game.field_mut().click(point);
        }
    }

    fn press_game_button(&mut self, now: Instant) {
        match self.game.state() {
            SessionState::Idle => self.game.start_at(now),
            SessionState::Running => self.game.stop(),
            SessionState::Finished => {}
        }
    }
}

fn forward(tx: &Sender<GameEvent>, event: GameEvent) {
    if tx.send(event).is_err() {
        log::warn!("event loop is gone, dropping notification");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameBuilder;
    use crate::field::{FieldGeometry, ItemKind};
    use crate::sound::Muted;
    use assert_matches::assert_matches;
    use std::sync::mpsc::{self, Receiver};
    use std::time::Duration;

    fn app(duration: u32, carrots: u32, bugs: u32) -> (App, Receiver<GameEvent>) {
        let config = GameBuilder::new()
            .with_game_duration(duration)
            .with_carrot_count(carrots)
            .with_bug_count(bugs)
            .build()
            .unwrap();
        let (tx, rx) = mpsc::channel();
        let field = Field::with_seed(FieldGeometry::default(), 3);
        let mut app = App::new(config, field, Rc::new(Muted), tx);
        app.resize(82, 44);
        (app, rx)
    }

    fn key(c: char) -> GameEvent {
        GameEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    /// Feed back whatever the listeners forwarded.
    fn pump(app: &mut App, rx: &Receiver<GameEvent>, now: Instant) {
        while let Ok(ev) = rx.try_recv() {
            app.handle_event_at(ev, now);
        }
    }

    fn click_on_item(app: &App, kind: ItemKind) -> GameEvent {
        let layout = screen_layout(app.area());
        let viewport = Viewport::new(layout.field, *app.game.field().geometry());
        let size = app.game.field().geometry().item_size;
        let item = app
            .game
            .field()
            .items()
            .iter()
            .rev()
            .find(|i| i.kind == kind)
            .expect("item on field");
        let centre = crate::field::Point::new(
            item.position.x + size / 2.0,
            item.position.y + size / 2.0,
        );
        let (column, row) = viewport.to_cell(centre).unwrap();
        GameEvent::Click { column, row }
    }

    #[test]
    fn test_finish_messages() {
        assert_eq!(finish_message(TerminationReason::Win), "YOU WIN ✨");
        assert_eq!(finish_message(TerminationReason::Lose), "YOU LOST 🤡");
        assert_eq!(finish_message(TerminationReason::Timeout), "YOU LOST 🤡");
        assert_eq!(finish_message(TerminationReason::Paused), "Replay❓");
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, _rx) = app(15, 10, 7);
        assert_eq!(
            app.handle_event(GameEvent::Key(KeyEvent::new(
                KeyCode::Esc,
                KeyModifiers::NONE
            ))),
            ExitType::Quit
        );
        assert_eq!(app.handle_event(key('q')), ExitType::Quit);
        assert_eq!(
            app.handle_event(GameEvent::Key(KeyEvent::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL
            ))),
            ExitType::Quit
        );
        assert_eq!(app.handle_event(key('x')), ExitType::Continue);
    }

    #[test]
    fn test_space_toggles_play_and_pause() {
        let (mut app, rx) = app(15, 10, 7);
        let t0 = Instant::now();

        app.handle_event_at(key(' '), t0);
        assert!(app.game.is_running());
        assert_eq!(app.game.field().items().len(), 17);

        app.handle_event_at(key(' '), t0);
        assert_eq!(app.game.state(), SessionState::Finished);
        assert_matches!(
            rx.try_recv(),
            Ok(GameEvent::Stopped(TerminationReason::Paused))
        );
    }

    #[test]
    fn test_stop_shows_replay_popup() {
        let (mut app, rx) = app(15, 10, 7);
        let t0 = Instant::now();
        app.handle_event_at(key(' '), t0);
        app.handle_event_at(key(' '), t0);
        pump(&mut app, &rx, t0);

        assert!(app.popup.is_visible());
        assert_eq!(app.popup.text(), "Replay❓");

        // the button is gone, space does nothing now
        app.handle_event_at(key(' '), t0);
        assert_eq!(app.game.state(), SessionState::Finished);
    }

    #[test]
    fn test_retry_restarts_session() {
        let (mut app, rx) = app(15, 10, 7);
        let t0 = Instant::now();
        app.handle_event_at(key(' '), t0);
        app.handle_event_at(key(' '), t0);
        pump(&mut app, &rx, t0);

        app.handle_event_at(key('r'), t0);
        assert!(!app.popup.is_visible());
        assert_matches!(rx.try_recv(), Ok(GameEvent::Retry));
        app.handle_event_at(GameEvent::Retry, t0);
        assert!(app.game.is_running());
        assert_eq!(app.game.score(), 0);
    }

    #[test]
    fn test_retry_key_without_popup_is_ignored() {
        let (mut app, rx) = app(15, 10, 7);
        app.handle_event(key('r'));
        assert!(rx.try_recv().is_err());
        assert_eq!(app.game.state(), SessionState::Idle);
    }

    #[test]
    fn test_clicking_a_bug_loses() {
        let (mut app, rx) = app(15, 2, 1);
        let t0 = Instant::now();
        app.handle_event_at(key(' '), t0);

        let click = click_on_item(&app, ItemKind::Bug);
        app.handle_event_at(click, t0);
        pump(&mut app, &rx, t0);

        assert_eq!(app.game.last_reason(), Some(TerminationReason::Lose));
        assert_eq!(app.popup.text(), "YOU LOST 🤡");
    }

    #[test]
    fn test_timeout_through_ticks() {
        let (mut app, rx) = app(2, 3, 0);
        let t0 = Instant::now();
        app.handle_event_at(key(' '), t0);
        app.handle_event_at(GameEvent::Tick, t0 + Duration::from_millis(1500));
        assert_eq!(app.game.remaining_secs(), 1);
        app.handle_event_at(GameEvent::Tick, t0 + Duration::from_millis(2000));
        pump(&mut app, &rx, t0);

        assert_eq!(app.game.last_reason(), Some(TerminationReason::Timeout));
        assert_eq!(app.popup.text(), "YOU LOST 🤡");
    }

    #[test]
    fn test_click_after_deadline_times_out() {
        let (mut app, rx) = app(3, 1, 0);
        let t0 = Instant::now();
        app.handle_event_at(key(' '), t0);

        // no Tick in between, the click itself has to run the clock
        let carrot = click_on_item(&app, ItemKind::Carrot);
        let late = t0 + Duration::from_millis(3500);
        app.handle_event_at(carrot, late);
        pump(&mut app, &rx, late);

        assert_eq!(app.game.last_reason(), Some(TerminationReason::Timeout));
        assert_eq!(app.game.score(), 0);
        assert_eq!(app.game.remaining_secs(), 0);
        assert_eq!(app.popup.text(), "YOU LOST 🤡");
    }

    #[test]
    fn test_click_before_deadline_still_counts() {
        let (mut app, rx) = app(3, 1, 0);
        let t0 = Instant::now();
        app.handle_event_at(key(' '), t0);

        let carrot = click_on_item(&app, ItemKind::Carrot);
        let in_time = t0 + Duration::from_millis(2500);
        app.handle_event_at(carrot, in_time);
        pump(&mut app, &rx, in_time);

        assert_eq!(app.game.last_reason(), Some(TerminationReason::Win));
        assert_eq!(app.game.remaining_secs(), 1);
    }

    #[test]
    fn test_clicking_the_header_button() {
        let (mut app, _rx) = app(15, 1, 0);
        let header = screen_layout(app.area()).header;
        app.handle_event(GameEvent::Click {
            column: header.x,
            row: header.y,
        });
        assert!(app.game.is_running());
    }

    #[test]
    fn test_popup_is_modal() {
        let (mut app, rx) = app(15, 1, 1);
        let t0 = Instant::now();
        app.handle_event_at(key(' '), t0);
        let bug = click_on_item(&app, ItemKind::Bug);
        app.handle_event_at(key(' '), t0);
        pump(&mut app, &rx, t0);
        assert!(app.popup.is_visible());

        // clicks outside the retry button are swallowed by the popup
        app.handle_event_at(GameEvent::Click { column: 0, row: 0 }, t0);
        app.handle_event_at(bug, t0);
        assert!(app.popup.is_visible());
        assert!(rx.try_recv().is_err());

        let button = retry_button_area(popup_area(app.area(), app.popup.text()));
        app.handle_event_at(
            GameEvent::Click {
                column: button.x,
                row: button.y,
            },
            t0,
        );
        assert!(!app.popup.is_visible());
        assert_matches!(rx.try_recv(), Ok(GameEvent::Retry));
    }

    #[test]
    fn test_resize_updates_area() {
        let (mut app, _rx) = app(15, 1, 0);
        app.handle_event(GameEvent::Resize(120, 40));
        assert_eq!(app.area(), Rect::new(0, 0, 120, 40));
    }
}
