/// SessionState: the complete state of one sitting at the puzzle.
///
/// Everything the renderer draws is a pure function of this struct.
/// There is no persistence: the state is created at launch and dies
/// with the process. The console log is append-only and unbounded;
/// only the `clear` command resets it.

use crate::config::PacingConfig;
use crate::domain::stage::Progress;
use crate::sim::timer::Scheduler;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// Landing screen with the START affordance.
    Title,
    /// The three-stage timeline; the active panel follows `progress`.
    Heist,
}

/// Style tag for a console log line.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LineKind {
    Plain,
    /// The prompt-prefixed echo of what the player typed.
    Echo,
}

#[derive(Clone, Debug)]
pub struct TermLine {
    pub text: String,
    pub kind: LineKind,
}

/// Feedback under the vault entry field.
#[derive(Clone, Copy, Debug)]
pub struct Feedback {
    pub text: &'static str,
    pub success: bool,
}

pub struct SessionState {
    pub phase: Phase,
    pub progress: Progress,

    // ── Stage 1: the vault ──
    /// Raw entry text. Kept after a wrong code so it can be edited.
    pub riddle_entry: String,
    pub feedback: Option<Feedback>,

    // ── Stage 3: the console ──
    pub console_entry: String,
    pub log: Vec<TermLine>,
    /// One-way flag; `hint` sets it, nothing unsets it.
    pub drop_note_revealed: bool,

    // ── Pacing / fixed strings (from config) ──
    pub pacing: PacingConfig,
    pub prompt: String,

    // ── Deferred transitions ──
    pub timers: Scheduler,

    // ── Presentation ──
    pub music_on: bool,
    pub anim_tick: u32,
}

impl SessionState {
    pub fn new() -> Self {
        SessionState {
            phase: Phase::Title,
            progress: Progress::new(),
            riddle_entry: String::new(),
            feedback: None,
            console_entry: String::new(),
            log: Vec::new(),
            drop_note_revealed: false,
            pacing: PacingConfig {
                tick_rate_ms: 50,
                unlock_delay_ms: 700,
            },
            prompt: String::from("professor@lacasadectf:~$"),
            timers: Scheduler::new(),
            music_on: false,
            anim_tick: 0,
        }
    }

    pub fn push_line(&mut self, text: String, kind: LineKind) {
        self.log.push(TermLine { text, kind });
    }
}
