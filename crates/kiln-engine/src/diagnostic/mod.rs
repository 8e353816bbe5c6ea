//! Diagnostic stream
//!
//! Naming and lowering never abort on a user error. Problems are recorded
//! here as numbered messages (severity implied by the code range) or, for
//! engine defects, as internal errors, and compilation continues with a
//! fallback semantics.

pub mod codes;
mod render;

pub use render::{emit, to_codespan};

use crate::typesys::Location;
use serde::Serialize;
use std::fmt;

/// Severity derived from a message code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn for_code(code: u32) -> Self {
        match code {
            7000..=7899 => Severity::Error,
            7900..=7999 => Severity::Warning,
            _ => Severity::Info,
        }
    }
}

/// A numbered user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub code: u32,
    pub location: Location,
    pub args: Vec<String>,
}

impl Message {
    pub fn severity(&self) -> Severity {
        Severity::for_code(self.code)
    }

    /// Message text with its arguments substituted
    pub fn text(&self) -> String {
        codes::format_message(self.code, &self.args)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: K{}: {}", self.location, self.code, self.text())
    }
}

/// An unexpected condition inside the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InternalError {
    pub location: Location,
    pub text: String,
    pub cause: Option<String>,
}

impl fmt::Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: internal error: {}", self.location, self.text)?;
        if let Some(cause) = &self.cause {
            write!(f, " ({})", cause)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Report {
    Message(Message),
    InternalError(InternalError),
}

/// Ordered collection of reports
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    reports: Vec<Report>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(&mut self, code: u32, location: &Location, args: Vec<String>) {
        tracing::debug!(code, %location, ?args, "diagnostic");
        self.reports.push(Report::Message(Message {
            code,
            location: location.clone(),
            args,
        }));
    }

    pub fn internal_error(&mut self, location: &Location, text: impl Into<String>, cause: Option<String>) {
        let text = text.into();
        tracing::warn!(%location, %text, ?cause, "internal error");
        self.reports.push(Report::InternalError(InternalError {
            location: location.clone(),
            text,
            cause,
        }));
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.reports.extend(other.reports);
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.reports.iter().filter_map(|r| match r {
            Report::Message(m) => Some(m),
            _ => None,
        })
    }

    pub fn internal_errors(&self) -> impl Iterator<Item = &InternalError> {
        self.reports.iter().filter_map(|r| match r {
            Report::InternalError(e) => Some(e),
            _ => None,
        })
    }

    /// Codes of all messages, in emission order
    pub fn codes(&self) -> Vec<u32> {
        self.messages().map(|m| m.code).collect()
    }

    pub fn has_errors(&self) -> bool {
        self.reports.iter().any(|r| match r {
            Report::Message(m) => m.severity() == Severity::Error,
            Report::InternalError(_) => true,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_code_range() {
        assert_eq!(Severity::for_code(7001), Severity::Error);
        assert_eq!(Severity::for_code(7501), Severity::Error);
        assert_eq!(Severity::for_code(7950), Severity::Warning);
        assert_eq!(Severity::for_code(42), Severity::Info);
    }

    #[test]
    fn test_internal_errors_are_kept_apart() {
        let mut diags = Diagnostics::new();
        diags.message(7950, &Location::default(), vec![]);
        assert!(!diags.has_errors());
        diags.internal_error(&Location::new("a.cs", 1, 1), "boom", None);
        assert!(diags.has_errors());
        assert_eq!(diags.codes(), vec![7950]);
        assert_eq!(diags.internal_errors().count(), 1);
    }

    #[test]
    fn test_message_display_includes_code_and_text() {
        let msg = Message {
            code: 7001,
            location: Location::new("a.cs", 3, 5),
            args: vec!["Ns.C".to_string()],
        };
        let text = msg.to_string();
        assert!(text.starts_with("a.cs(3,5): K7001:"));
        assert!(text.contains("Ns.C"));
    }
}
