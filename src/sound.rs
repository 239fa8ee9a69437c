use std::cell::{Cell, RefCell};
use std::io::{self, Write};

/// Short sound effects played on game events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Cue {
    Carrot,
    Bug,
    Win,
    Alert,
}

/// Sink for audio cues. Every call is fire-and-forget: implementations
/// swallow their own failures and never block the caller.
pub trait AudioCueProvider {
    fn play_cue(&self, cue: Cue);
    fn play_ambient_loop(&self);
    fn stop_ambient_loop(&self);
}

/// Rings the terminal bell for event cues. A terminal has no way to loop
/// background music so the ambient loop is only tracked.
pub struct TerminalBell<W: Write> {
    out: RefCell<W>,
    ambient: Cell<bool>,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
            ambient: Cell::new(false),
        }
    }

    pub fn ambient_playing(&self) -> bool {
        self.ambient.get()
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn ring(&self) -> io::Result<()> {
        let mut out = self.out.borrow_mut();
        out.write_all(b"\x07")?;
        out.flush()
    }
}

impl TerminalBell<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> AudioCueProvider for TerminalBell<W> {
    fn play_cue(&self, cue: Cue) {
        log::debug!("cue {}", cue);
        if let Err(e) = self.ring() {
            log::warn!("failed to play {} cue: {}", cue, e);
        }
    }

    fn play_ambient_loop(&self) {
        self.ambient.set(true);
    }

    fn stop_ambient_loop(&self) {
        self.ambient.set(false);
    }
}

/// Used with `--mute`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Muted;

impl AudioCueProvider for Muted {
    fn play_cue(&self, cue: Cue) {
        log::debug!("cue {} (muted)", cue);
    }

    fn play_ambient_loop(&self) {}

    fn stop_ambient_loop(&self) {}
}
