/// Entry point and event loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::stage::StageId;
use sim::event::{Action, SessionEvent};
use sim::session::{Phase, SessionState};
use sim::step;
use ui::input::{self, InputState};
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();

    let mut session = SessionState::new();
    session.pacing = config.pacing.clone();
    session.prompt = config.prompt.clone();
    session.music_on = config.music_on_start;

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();
    if let Some(sfx) = sound.as_ref() {
        sfx.set_music(session.music_on);
    }

    let result = event_loop(&mut session, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("The heist is over. Whatever you found, keep it quiet.");
}

fn event_loop(
    session: &mut SessionState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = InputState::new();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.pacing.tick_rate_ms);

    loop {
        input.drain_events();
        if input.ctrl_c_pressed() {
            break;
        }

        let mut actions: Vec<Action> = Vec::new();
        let mut quit = false;

        for key in &input.events {
            match map_key(session, key, sound) {
                KeyOutcome::Act(action) => actions.push(action),
                KeyOutcome::Quit => quit = true,
                KeyOutcome::Consumed => {}
            }
        }
        if quit {
            break;
        }

        let now = Instant::now();
        let mut events: Vec<SessionEvent> = Vec::new();
        for action in actions {
            events.extend(step::apply(session, action, now));
        }
        events.extend(step::poll_timers(session, now));

        process_sound_events(sound, &events);

        if last_tick.elapsed() >= tick_rate {
            session.anim_tick = session.anim_tick.wrapping_add(1);
            last_tick = Instant::now();
        }

        renderer.render(session)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

// ── Key mapping ──

enum KeyOutcome {
    /// The key became a semantic action.
    Act(Action),
    /// The key edited a buffer or toggled something local.
    Consumed,
    Quit,
}

/// Translate one key press into an action, honoring the active screen.
fn map_key(
    session: &mut SessionState,
    key: &crossterm::event::KeyEvent,
    sound: Option<&SoundEngine>,
) -> KeyOutcome {
    // Global: music toggle
    if key.code == KeyCode::F(9) {
        session.music_on = !session.music_on;
        if let Some(sfx) = sound {
            sfx.set_music(session.music_on);
        }
        return KeyOutcome::Consumed;
    }

    match session.phase {
        Phase::Title => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => KeyOutcome::Act(Action::StartHeist),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyOutcome::Quit,
            _ => KeyOutcome::Consumed,
        },

        Phase::Heist => {
            // Indicator navigation works on every stage panel.
            match key.code {
                KeyCode::F(1) => return KeyOutcome::Act(Action::JumpTo(StageId::Vault)),
                KeyCode::F(2) => return KeyOutcome::Act(Action::JumpTo(StageId::CrewLog)),
                KeyCode::F(3) => return KeyOutcome::Act(Action::JumpTo(StageId::Console)),
                KeyCode::Esc => return KeyOutcome::Act(Action::ReturnToTitle),
                _ => {}
            }

            match session.progress.current() {
                StageId::Vault => match key.code {
                    KeyCode::Enter => KeyOutcome::Act(Action::SubmitRiddle),
                    _ => {
                        input::edit_line(&mut session.riddle_entry, key);
                        KeyOutcome::Consumed
                    }
                },
                StageId::CrewLog => match key.code {
                    KeyCode::Enter => KeyOutcome::Act(Action::OpenConsole),
                    _ => KeyOutcome::Consumed,
                },
                StageId::Console => match key.code {
                    KeyCode::Enter => KeyOutcome::Act(Action::SubmitConsoleLine),
                    _ => {
                        input::edit_line(&mut session.console_entry, key);
                        KeyOutcome::Consumed
                    }
                },
            }
        }
    }
}

// ── Sound cues ──

fn process_sound_events(sound: Option<&SoundEngine>, events: &[SessionEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            SessionEvent::VaultUnlocked => sfx.play_unlock(),
            SessionEvent::CodeRejected => sfx.play_deny(),
            SessionEvent::DropNoteRevealed => sfx.play_reveal(),
            SessionEvent::HeistStarted | SessionEvent::StageEntered(_) => sfx.play_stage_blip(),
            SessionEvent::UnknownCommand => sfx.play_deny(),
            SessionEvent::CommandRun | SessionEvent::LogCleared => {}
        }
    }
}
