/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
///
/// ```toml
/// [pacing]
/// tick_rate_ms = 50
/// unlock_delay_ms = 700
///
/// [console]
/// prompt = "professor@lacasadectf:~$"
///
/// [audio]
/// music_on_start = false
/// ```

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub pacing: PacingConfig,
    pub prompt: String,
    pub music_on_start: bool,
}

#[derive(Clone, Debug)]
pub struct PacingConfig {
    /// Animation tick (cursor blink, indicator pulse).
    pub tick_rate_ms: u64,
    /// Pause between "Vault unlocked" feedback and the crew log opening.
    pub unlock_delay_ms: u64,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    pacing: TomlPacing,
    #[serde(default)]
    console: TomlConsole,
    #[serde(default)]
    audio: TomlAudio,
}

#[derive(Deserialize, Debug)]
struct TomlPacing {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_unlock_delay")]
    unlock_delay_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlConsole {
    #[serde(default = "default_prompt")]
    prompt: String,
}

#[derive(Deserialize, Debug)]
struct TomlAudio {
    #[serde(default)]
    music_on_start: bool,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 50 }
fn default_unlock_delay() -> u64 { 700 }
fn default_prompt() -> String { "professor@lacasadectf:~$".into() }

impl Default for TomlPacing {
    fn default() -> Self {
        TomlPacing {
            tick_rate_ms: default_tick_rate(),
            unlock_delay_ms: default_unlock_delay(),
        }
    }
}

impl Default for TomlConsole {
    fn default() -> Self {
        TomlConsole { prompt: default_prompt() }
    }
}

impl Default for TomlAudio {
    fn default() -> Self {
        TomlAudio { music_on_start: false }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) `~/.local/share/lacasactf`.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());

        GameConfig {
            pacing: PacingConfig {
                tick_rate_ms: toml_cfg.pacing.tick_rate_ms.max(1),
                unlock_delay_ms: toml_cfg.pacing.unlock_delay_ms,
            },
            prompt: toml_cfg.console.prompt,
            music_on_start: toml_cfg.audio.music_on_start,
        }
    }
}

/// Candidate directories to search: exe dir + CWD + XDG data home.
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable (symlinks resolved)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/lacasactf)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/lacasactf");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
