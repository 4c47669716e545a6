/// The apply function: runs one player action against the session.
///
/// Processing model:
///   - each action is handled fully and synchronously
///   - at most one stage transition or one interpreter response results
///   - every reachable input maps to a defined outcome; there is no
///     error path out of this module
///
/// The one suspension point is the vault unlock: a correct code renders
/// its feedback immediately and queues `advance_to(CrewLog)` on the
/// scheduler. `poll_timers` fires it once the delay has passed.

use std::time::{Duration, Instant};

use crate::domain::command::{self, Effect};
use crate::domain::riddle::{self, RiddleOutcome};
use crate::domain::stage::StageId;
use crate::sim::event::{Action, SessionEvent};
use crate::sim::session::{Feedback, LineKind, Phase, SessionState};
use crate::sim::timer::Deferred;

// ══════════════════════════════════════════════════════════════
// Main entry points
// ══════════════════════════════════════════════════════════════

pub fn apply(session: &mut SessionState, action: Action, now: Instant) -> Vec<SessionEvent> {
    match action {
        Action::StartHeist => start_heist(session),
        Action::JumpTo(stage) => jump_to(session, stage),
        Action::SubmitRiddle => submit_riddle(session, now),
        Action::OpenConsole => open_console(session),
        Action::SubmitConsoleLine => submit_console_line(session),
        Action::ReturnToTitle => {
            session.phase = Phase::Title;
            vec![]
        }
    }
}

/// Fire scheduled transitions whose deadline has passed.
pub fn poll_timers(session: &mut SessionState, now: Instant) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    for deferred in session.timers.fire_due(now) {
        match deferred {
            Deferred::Unlock(stage) => {
                session.progress.advance_to(stage);
                events.push(SessionEvent::StageEntered(stage));
            }
        }
    }
    events
}

// ══════════════════════════════════════════════════════════════
// Stage navigation
// ══════════════════════════════════════════════════════════════

fn start_heist(session: &mut SessionState) -> Vec<SessionEvent> {
    session.phase = Phase::Heist;
    // START always shows the vault; whatever is unlocked stays unlocked.
    session.progress.advance_to(StageId::Vault);
    vec![
        SessionEvent::HeistStarted,
        SessionEvent::StageEntered(StageId::Vault),
    ]
}

fn jump_to(session: &mut SessionState, stage: StageId) -> Vec<SessionEvent> {
    if session.phase != Phase::Heist {
        return vec![];
    }
    if !session.progress.can_jump_to(stage) || stage == session.progress.current() {
        return vec![];
    }
    session.progress.advance_to(stage);
    vec![SessionEvent::StageEntered(stage)]
}

fn open_console(session: &mut SessionState) -> Vec<SessionEvent> {
    if session.phase != Phase::Heist || session.progress.current() != StageId::CrewLog {
        return vec![];
    }
    session.progress.advance_to(StageId::Console);
    vec![SessionEvent::StageEntered(StageId::Console)]
}

// ══════════════════════════════════════════════════════════════
// Stage 1: the vault
// ══════════════════════════════════════════════════════════════

fn submit_riddle(session: &mut SessionState, now: Instant) -> Vec<SessionEvent> {
    if session.phase != Phase::Heist || session.progress.current() != StageId::Vault {
        return vec![];
    }

    let outcome = riddle::evaluate(&session.riddle_entry);
    session.feedback = Some(Feedback {
        text: riddle::feedback_line(outcome),
        success: outcome == RiddleOutcome::Solved,
    });

    match outcome {
        RiddleOutcome::Solved => {
            let delay = Duration::from_millis(session.pacing.unlock_delay_ms);
            session
                .timers
                .schedule(now + delay, Deferred::Unlock(StageId::CrewLog));
            vec![SessionEvent::VaultUnlocked]
        }
        // Entry stays as typed: inspectable, editable, no lockout.
        RiddleOutcome::InvalidInput | RiddleOutcome::WrongAnswer => {
            vec![SessionEvent::CodeRejected]
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Stage 3: the console interpreter
// ══════════════════════════════════════════════════════════════

fn submit_console_line(session: &mut SessionState) -> Vec<SessionEvent> {
    if session.phase != Phase::Heist || session.progress.current() != StageId::Console {
        return vec![];
    }
    let raw = std::mem::take(&mut session.console_entry);
    run_console_line(session, &raw)
}

/// Interpret one console line. Total over all strings.
pub fn run_console_line(session: &mut SessionState, raw: &str) -> Vec<SessionEvent> {
    let cmd = command::normalize(raw);
    if cmd.is_empty() {
        return vec![];
    }

    // Echo first, exactly like a shell. `clear` wipes its own echo too.
    session.push_line(format!("{} {}", session.prompt, cmd), LineKind::Echo);

    match command::lookup(&cmd) {
        Some(spec) => {
            if spec.effect == Effect::ClearLog {
                session.log.clear();
                return vec![SessionEvent::LogCleared];
            }
            for line in spec.output {
                session.push_line((*line).to_string(), LineKind::Plain);
            }
            let mut events = vec![SessionEvent::CommandRun];
            if spec.effect == Effect::RevealDrop && !session.drop_note_revealed {
                session.drop_note_revealed = true;
                events.push(SessionEvent::DropNoteRevealed);
            }
            events
        }
        None => {
            session.push_line(format!("Unknown command: {}", cmd), LineKind::Plain);
            session.push_line("Try: help".to_string(), LineKind::Plain);
            vec![SessionEvent::UnknownCommand]
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn heist_session() -> (SessionState, Instant) {
        let mut s = SessionState::new();
        let t0 = Instant::now();
        apply(&mut s, Action::StartHeist, t0);
        (s, t0)
    }

    fn at_console() -> SessionState {
        let (mut s, t0) = heist_session();
        s.riddle_entry = "27".into();
        apply(&mut s, Action::SubmitRiddle, t0);
        poll_timers(&mut s, t0 + Duration::from_secs(1));
        apply(&mut s, Action::OpenConsole, t0);
        s
    }

    fn log_texts(s: &SessionState) -> Vec<&str> {
        s.log.iter().map(|l| l.text.as_str()).collect()
    }

    // ── Stage flow ──

    #[test]
    fn start_lands_on_the_vault() {
        let (s, _) = heist_session();
        assert_eq!(s.phase, Phase::Heist);
        assert_eq!(s.progress.current(), StageId::Vault);
    }

    #[test]
    fn correct_code_unlocks_after_the_delay_not_before() {
        let (mut s, t0) = heist_session();
        s.riddle_entry = "27".into();

        let events = apply(&mut s, Action::SubmitRiddle, t0);
        assert_eq!(events, vec![SessionEvent::VaultUnlocked]);
        assert!(s.feedback.unwrap().success);
        // Feedback rendered, but still on the vault until the timer fires.
        assert_eq!(s.progress.current(), StageId::Vault);
        assert!(!s.progress.is_unlocked(StageId::CrewLog));

        assert!(poll_timers(&mut s, t0 + Duration::from_millis(500)).is_empty());
        let fired = poll_timers(&mut s, t0 + Duration::from_millis(700));
        assert_eq!(fired, vec![SessionEvent::StageEntered(StageId::CrewLog)]);
        assert_eq!(s.progress.current(), StageId::CrewLog);
    }

    #[test]
    fn wrong_code_changes_nothing_but_feedback() {
        let (mut s, t0) = heist_session();
        s.riddle_entry = "26".into();

        let events = apply(&mut s, Action::SubmitRiddle, t0);
        assert_eq!(events, vec![SessionEvent::CodeRejected]);
        assert!(!s.feedback.unwrap().success);
        assert_eq!(s.progress.current(), StageId::Vault);
        assert!(s.timers.is_empty());
        // Entry kept for retry.
        assert_eq!(s.riddle_entry, "26");
    }

    #[test]
    fn empty_and_zero_codes_are_rejected() {
        for entry in ["", "0"] {
            let (mut s, t0) = heist_session();
            s.riddle_entry = entry.into();
            assert_eq!(
                apply(&mut s, Action::SubmitRiddle, t0),
                vec![SessionEvent::CodeRejected],
            );
            assert!(s.timers.is_empty());
        }
    }

    #[test]
    fn resubmitting_during_the_delay_is_benign() {
        let (mut s, t0) = heist_session();
        s.riddle_entry = "27".into();
        apply(&mut s, Action::SubmitRiddle, t0);
        apply(&mut s, Action::SubmitRiddle, t0 + Duration::from_millis(100));

        poll_timers(&mut s, t0 + Duration::from_secs(2));
        assert_eq!(s.progress.current(), StageId::CrewLog);
        assert_eq!(s.progress.max_unlocked(), StageId::CrewLog);
    }

    #[test]
    fn console_opens_from_the_crew_log_only() {
        let (mut s, t0) = heist_session();
        assert!(apply(&mut s, Action::OpenConsole, t0).is_empty());
        assert_eq!(s.progress.current(), StageId::Vault);

        s.riddle_entry = "27".into();
        apply(&mut s, Action::SubmitRiddle, t0);
        poll_timers(&mut s, t0 + Duration::from_secs(1));
        let events = apply(&mut s, Action::OpenConsole, t0);
        assert_eq!(events, vec![SessionEvent::StageEntered(StageId::Console)]);
    }

    #[test]
    fn jumps_past_max_unlocked_are_ignored() {
        let (mut s, t0) = heist_session();
        assert!(apply(&mut s, Action::JumpTo(StageId::Console), t0).is_empty());
        assert_eq!(s.progress.current(), StageId::Vault);
    }

    #[test]
    fn revisiting_keeps_max_unlocked() {
        let mut s = at_console();
        let t0 = Instant::now();
        apply(&mut s, Action::JumpTo(StageId::Vault), t0);
        assert_eq!(s.progress.current(), StageId::Vault);
        assert_eq!(s.progress.max_unlocked(), StageId::Console);
        apply(&mut s, Action::JumpTo(StageId::Console), t0);
        assert_eq!(s.progress.current(), StageId::Console);
    }

    #[test]
    fn pending_unlock_survives_returning_to_title() {
        let (mut s, t0) = heist_session();
        s.riddle_entry = "27".into();
        apply(&mut s, Action::SubmitRiddle, t0);
        apply(&mut s, Action::ReturnToTitle, t0);

        poll_timers(&mut s, t0 + Duration::from_secs(1));
        assert!(s.progress.is_unlocked(StageId::CrewLog));
    }

    // ── Console interpreter ──

    #[test]
    fn help_echoes_then_lists_commands() {
        let mut s = at_console();
        s.console_entry = "help".into();
        let events = apply(&mut s, Action::SubmitConsoleLine, Instant::now());

        assert_eq!(events, vec![SessionEvent::CommandRun]);
        assert_eq!(
            log_texts(&s),
            vec![
                "professor@lacasadectf:~$ help",
                "Commands: crew, hint, trace, clear",
            ],
        );
        assert_eq!(s.log[0].kind, LineKind::Echo);
        assert_eq!(s.log[1].kind, LineKind::Plain);
        assert!(s.console_entry.is_empty());
    }

    #[test]
    fn mixed_case_hint_normalizes_and_reveals_once() {
        let mut s = at_console();
        let events = run_console_line(&mut s, "  HINT  ");
        assert!(events.contains(&SessionEvent::DropNoteRevealed));
        assert!(s.drop_note_revealed);
        assert_eq!(log_texts(&s)[0], "professor@lacasadectf:~$ hint");

        // Second invocation: same output, no second reveal event.
        let events = run_console_line(&mut s, "hint");
        assert_eq!(events, vec![SessionEvent::CommandRun]);
        assert!(s.drop_note_revealed);
        assert_eq!(s.log.len(), 6); // two echoes + two output lines each
    }

    #[test]
    fn empty_line_is_a_no_op() {
        let mut s = at_console();
        assert!(run_console_line(&mut s, "").is_empty());
        assert!(run_console_line(&mut s, "   ").is_empty());
        assert!(s.log.is_empty());
    }

    #[test]
    fn unknown_command_names_the_offender_and_suggests_help() {
        let mut s = at_console();
        let events = run_console_line(&mut s, "foo");
        assert_eq!(events, vec![SessionEvent::UnknownCommand]);
        assert_eq!(
            log_texts(&s),
            vec![
                "professor@lacasadectf:~$ foo",
                "Unknown command: foo",
                "Try: help",
            ],
        );
    }

    #[test]
    fn clear_empties_the_log_including_its_own_echo() {
        let mut s = at_console();
        run_console_line(&mut s, "crew");
        run_console_line(&mut s, "trace");
        assert_eq!(s.log.len(), 6);

        let events = run_console_line(&mut s, "clear");
        assert_eq!(events, vec![SessionEvent::LogCleared]);
        assert!(s.log.is_empty());
    }

    #[test]
    fn flavor_commands_append_in_fixed_order() {
        let mut s = at_console();
        run_console_line(&mut s, "crew");
        assert_eq!(
            log_texts(&s),
            vec![
                "professor@lacasadectf:~$ crew",
                "Crew status: Tokyo, Berlin, Nairobi, Denver, Rio - in position.",
                "Note: Professor obfuscated the final coordinates in the system.",
            ],
        );
    }

    #[test]
    fn console_lines_ignored_outside_the_console_stage() {
        let (mut s, t0) = heist_session();
        s.console_entry = "help".into();
        assert!(apply(&mut s, Action::SubmitConsoleLine, t0).is_empty());
        assert!(s.log.is_empty());
    }
}
