use std::fmt;

use crate::types::{TicketId, TicketPriority, TicketStatus};

pub const TICKETS: &str = "tickets";
pub const TICKET: &str = "ticket";
pub const TICKET_COMMENTS: &str = "ticket-comments";
pub const DASHBOARD_REPORTS: &str = "dashboard-reports";

/// One component of a cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    Str(String),
    Int(u64),
    /// An optional input that is not set (an absent filter)
    Unset,
}

impl From<&str> for KeyPart {
    fn from(s: &str) -> Self {
        KeyPart::Str(s.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(s: String) -> Self {
        KeyPart::Str(s)
    }
}

impl From<u64> for KeyPart {
    fn from(n: u64) -> Self {
        KeyPart::Int(n)
    }
}

impl From<u32> for KeyPart {
    fn from(n: u32) -> Self {
        KeyPart::Int(n as u64)
    }
}

impl From<TicketStatus> for KeyPart {
    fn from(status: TicketStatus) -> Self {
        KeyPart::Str(status.to_string())
    }
}

impl From<TicketPriority> for KeyPart {
    fn from(priority: TicketPriority) -> Self {
        KeyPart::Str(priority.to_string())
    }
}

impl<T: Into<KeyPart>> From<Option<T>> for KeyPart {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(KeyPart::Unset)
    }
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Str(s) => write!(f, "{s:?}"),
            KeyPart::Int(n) => write!(f, "{n}"),
            KeyPart::Unset => write!(f, "null"),
        }
    }
}

/// Semantic identity of a piece of server data
///
/// Two keys are the same cache entry iff all parts are equal. A key `p` is a
/// prefix of `k` when `k` starts with all of `p`'s parts, which is how
/// invalidation addresses whole families (`["tickets"]` covers every page).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<KeyPart>);

impl QueryKey {
    pub fn new(root: &str) -> Self {
        Self(vec![KeyPart::from(root)])
    }

    /// Append a part (builder style)
    pub fn with(mut self, part: impl Into<KeyPart>) -> Self {
        self.0.push(part.into());
        self
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Prefix of every ticket list page
    pub fn tickets() -> Self {
        Self::new(TICKETS)
    }

    pub fn ticket(id: TicketId) -> Self {
        Self::new(TICKET).with(id)
    }

    pub fn ticket_comments(id: TicketId) -> Self {
        Self::new(TICKET_COMMENTS).with(id)
    }

    pub fn dashboard_reports() -> Self {
        Self::new(DASHBOARD_REPORTS)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{part}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matching() {
        let page = QueryKey::tickets()
            .with(0u32)
            .with(10u32)
            .with(None::<String>);
        assert!(page.starts_with(&QueryKey::tickets()));
        assert!(page.starts_with(&page));
        assert!(!QueryKey::tickets().starts_with(&page));
        assert!(!QueryKey::ticket(1).starts_with(&QueryKey::tickets()));
    }

    #[test]
    fn test_ticket_key_does_not_match_other_ids() {
        assert!(!QueryKey::ticket(12).starts_with(&QueryKey::ticket(1)));
        assert!(!QueryKey::ticket_comments(1).starts_with(&QueryKey::ticket(1)));
    }

    #[test]
    fn test_unset_differs_from_empty_string() {
        let a = QueryKey::tickets().with(None::<String>);
        let b = QueryKey::tickets().with(Some(String::new()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        let key = QueryKey::tickets().with(2u32).with(None::<String>);
        assert_eq!(key.to_string(), r#"["tickets", 2, null]"#);
    }
}
