/// The vault riddle: sum the letters of the five crew cities.
/// Tokyo(5) + Berlin(6) + Nairobi(7) + Denver(6) + Rio(3) = 27.
///
/// Input handling mirrors a plain numeric text field: the raw entry is
/// trimmed and parsed as a float, so "27", " 27 " and "27.0" all open
/// the vault. An unparseable or zero entry is rejected before the code
/// comparison — an empty plan is not a plan.

const VAULT_CODE: f64 = 27.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RiddleOutcome {
    /// Not a number, or zero/empty.
    InvalidInput,
    /// A number, but not the code. Entry stays editable; no lockout.
    WrongAnswer,
    /// The code. The crew log unlocks after the success feedback.
    Solved,
}

/// Judge a raw answer. Total over all strings; never fails.
pub fn evaluate(raw: &str) -> RiddleOutcome {
    let val: f64 = match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => return RiddleOutcome::InvalidInput,
    };
    if val == 0.0 || val.is_nan() {
        return RiddleOutcome::InvalidInput;
    }
    if val == VAULT_CODE {
        RiddleOutcome::Solved
    } else {
        RiddleOutcome::WrongAnswer
    }
}

/// Feedback line rendered under the entry field.
pub fn feedback_line(outcome: RiddleOutcome) -> &'static str {
    match outcome {
        RiddleOutcome::InvalidInput => "The Professor expects a number, not an empty plan.",
        RiddleOutcome::WrongAnswer => "Wrong code. Recount the city letters carefully.",
        RiddleOutcome::Solved => "Vault unlocked. The crew chat log is now accessible.",
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_code_solves() {
        assert_eq!(evaluate("27"), RiddleOutcome::Solved);
    }

    #[test]
    fn whitespace_and_float_forms_accepted() {
        assert_eq!(evaluate("  27  "), RiddleOutcome::Solved);
        assert_eq!(evaluate("27.0"), RiddleOutcome::Solved);
    }

    #[test]
    fn empty_entry_is_invalid() {
        assert_eq!(evaluate(""), RiddleOutcome::InvalidInput);
        assert_eq!(evaluate("   "), RiddleOutcome::InvalidInput);
    }

    #[test]
    fn zero_is_invalid_not_wrong() {
        assert_eq!(evaluate("0"), RiddleOutcome::InvalidInput);
        assert_eq!(evaluate("0.0"), RiddleOutcome::InvalidInput);
    }

    #[test]
    fn non_numeric_is_invalid() {
        assert_eq!(evaluate("tokyo"), RiddleOutcome::InvalidInput);
        assert_eq!(evaluate("2x"), RiddleOutcome::InvalidInput);
    }

    #[test]
    fn near_misses_are_wrong_answers() {
        assert_eq!(evaluate("26"), RiddleOutcome::WrongAnswer);
        assert_eq!(evaluate("28"), RiddleOutcome::WrongAnswer);
        assert_eq!(evaluate("-27"), RiddleOutcome::WrongAnswer);
    }

    #[test]
    fn every_outcome_has_feedback() {
        for o in [
            RiddleOutcome::InvalidInput,
            RiddleOutcome::WrongAnswer,
            RiddleOutcome::Solved,
        ] {
            assert!(!feedback_line(o).is_empty());
        }
    }
}
