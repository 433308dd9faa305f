use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
    Cosmetic,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Cosmetic => "COSMETIC",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A message produced while resolving one line, before it is attached to a decklist entry.
pub type Message = (Severity, String);

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Warning {
    pub severity: Severity,
    /// index into `Decklist::entries`
    pub entry: Option<usize>,
    pub message: String,
}

impl Warning {
    pub fn new(severity: Severity, entry: Option<usize>, message: impl Into<String>) -> Warning {
        Warning {
            severity,
            entry,
            message: message.into(),
        }
    }

    pub fn attach(entry: usize, messages: Vec<Message>) -> impl Iterator<Item = Warning> {
        messages
            .into_iter()
            .map(move |(severity, message)| Warning::new(severity, Some(entry), message))
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}
