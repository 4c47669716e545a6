/// Session actions and events.
///
/// `Action` is the trigger surface: every discrete thing the player can
/// do, already translated from raw keys by the UI layer.
/// `SessionEvent` flows the other way: emitted while applying an action,
/// consumed by the presentation layer for sound cues.

use crate::domain::stage::StageId;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    /// Title screen START. Always lands on the vault; unlocks persist.
    StartHeist,
    /// Stage indicator navigation (F1-F3). Gated by `can_jump_to`.
    JumpTo(StageId),
    /// Judge the current vault entry.
    SubmitRiddle,
    /// Crew log → console, unconditional.
    OpenConsole,
    /// Feed the current console entry to the interpreter.
    SubmitConsoleLine,
    /// Leave the timeline. Progress is kept for this session.
    ReturnToTitle,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionEvent {
    HeistStarted,
    StageEntered(StageId),
    /// Correct code accepted; the crew log unlock is now queued.
    VaultUnlocked,
    /// Invalid or wrong code; feedback rendered, no transition.
    CodeRejected,
    CommandRun,
    UnknownCommand,
    LogCleared,
    /// First time the final message is exposed.
    DropNoteRevealed,
}
