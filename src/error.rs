//! Diagnostics the picker reports instead of failing.
//!
//! Nothing in the picker aborts on bad input. Every degradation is described by
//! a [`Diagnostic`] and reported through `tracing`.

/// Recoverable conditions met while normalizing input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    /// A current date was supplied that is not a date object.
    #[error("current date must be a date object, got {kind}; ignoring it")]
    InvalidCurrentDate { kind: &'static str },

    /// A coerced date failed the validity check and was left out.
    #[error("dropped invalid date at position {index} of the selected value")]
    DroppedEntry { index: usize },

    /// A min or max limit could not be interpreted and is ignored.
    #[error("ignoring unusable {side} date limit")]
    InvalidBound { side: &'static str },

    /// The month window was unusable and replaced by a safe width.
    #[error("number of months {requested} replaced by {applied}")]
    MonthCountFallback { requested: i64, applied: u8 },
}

impl Diagnostic {
    /// Emits the diagnostic at the level matching its class.
    pub fn report(&self) {
        match self {
            Self::InvalidCurrentDate { .. } => tracing::warn!("{self}"),
            Self::DroppedEntry { .. } | Self::InvalidBound { .. } | Self::MonthCountFallback { .. } => {
                tracing::debug!("{self}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_messages() {
        let diag = Diagnostic::InvalidCurrentDate { kind: "text" };
        assert_eq!(
            diag.to_string(),
            "current date must be a date object, got text; ignoring it"
        );

        let diag = Diagnostic::MonthCountFallback {
            requested: -2,
            applied: 1,
        };
        assert_eq!(diag.to_string(), "number of months -2 replaced by 1");

        let diag = Diagnostic::InvalidBound { side: "min" };
        assert_eq!(diag.to_string(), "ignoring unusable min date limit");
    }

    #[traced_test]
    #[test]
    fn test_report_levels() {
        Diagnostic::InvalidCurrentDate { kind: "timestamp" }.report();
        Diagnostic::DroppedEntry { index: 3 }.report();

        assert!(logs_contain("WARN"));
        assert!(logs_contain("got timestamp"));
        assert!(logs_contain("position 3"));
    }
}
