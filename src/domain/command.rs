/// Console command table: fixed mapping from a normalized command word
/// to its canned output and side effect. Dispatch is table lookup, not
/// string branching scattered through the interpreter.

/// What a matched command does beyond printing its lines.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Effect {
    /// Output only.
    None,
    /// Reveal the final-message panel. Idempotent.
    RevealDrop,
    /// Wipe the console log instead of appending.
    ClearLog,
}

pub struct CommandSpec {
    pub name: &'static str,
    pub output: &'static [&'static str],
    pub effect: Effect,
}

pub const COMMANDS: [CommandSpec; 5] = [
    CommandSpec {
        name: "help",
        output: &["Commands: crew, hint, trace, clear"],
        effect: Effect::None,
    },
    CommandSpec {
        name: "crew",
        output: &[
            "Crew status: Tokyo, Berlin, Nairobi, Denver, Rio - in position.",
            "Note: Professor obfuscated the final coordinates in the system.",
        ],
        effect: Effect::None,
    },
    CommandSpec {
        name: "hint",
        output: &[
            "Hint: Search for something that doesn't run, but still holds a location.",
            "      View Source isn't just for developers.",
        ],
        effect: Effect::RevealDrop,
    },
    CommandSpec {
        name: "trace",
        output: &[
            "Interpol trace detected near the drop location...",
            "Signal scrambled. Last known log hidden inside the client code.",
        ],
        effect: Effect::None,
    },
    CommandSpec {
        name: "clear",
        output: &[],
        effect: Effect::ClearLog,
    },
];

/// Trim and lowercase a raw console line. Empty result means "ignore".
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Look up an already-normalized command word.
pub fn lookup(normalized: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|c| c.name == normalized)
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_the_other_commands() {
        let help = lookup("help").unwrap();
        assert_eq!(help.output, ["Commands: crew, hint, trace, clear"]);
        assert_eq!(help.effect, Effect::None);
    }

    #[test]
    fn every_command_resolves_by_name() {
        for spec in &COMMANDS {
            let found = lookup(spec.name).unwrap();
            assert_eq!(found.name, spec.name);
        }
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize("  HINT  "), "hint");
        assert_eq!(normalize("Crew"), "crew");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn unknown_words_do_not_resolve() {
        assert!(lookup("heist").is_none());
        assert!(lookup("").is_none());
        assert!(lookup("HELP").is_none()); // lookup expects normalized input
    }

    #[test]
    fn hint_reveals_and_clear_clears() {
        assert_eq!(lookup("hint").unwrap().effect, Effect::RevealDrop);
        assert_eq!(lookup("clear").unwrap().effect, Effect::ClearLog);
        assert!(lookup("clear").unwrap().output.is_empty());
    }

    #[test]
    fn flavor_commands_print_two_lines() {
        for name in ["crew", "hint", "trace"] {
            assert_eq!(lookup(name).unwrap().output.len(), 2, "{name}");
        }
    }
}
