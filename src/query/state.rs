//! Stale-while-revalidate state of one cache entry.

/// What the client knows about one key
///
/// Data, once fetched successfully, is never dropped by a later failure: a
/// failed refetch keeps it as `last_good`.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// Never fetched
    Empty,
    /// First fetch in flight, no data yet
    Loading,
    Ready(T),
    /// Refetch in flight; the previous data stays visible
    Refreshing(T),
    Failed {
        error: String,
        last_good: Option<T>,
    },
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        QueryState::Empty
    }
}

impl<T> QueryState<T> {
    /// Transition for a fetch being issued
    pub fn begin(self) -> Self {
        match self {
            QueryState::Empty | QueryState::Loading => QueryState::Loading,
            QueryState::Ready(data) | QueryState::Refreshing(data) => QueryState::Refreshing(data),
            QueryState::Failed {
                last_good: Some(data),
                ..
            } => QueryState::Refreshing(data),
            QueryState::Failed {
                last_good: None, ..
            } => QueryState::Loading,
        }
    }

    /// Transition for a successful response
    pub fn succeed(self, data: T) -> Self {
        QueryState::Ready(data)
    }

    /// Transition for a failed response
    pub fn fail(self, error: impl Into<String>) -> Self {
        let last_good = match self {
            QueryState::Ready(data) | QueryState::Refreshing(data) => Some(data),
            QueryState::Failed { last_good, .. } => last_good,
            QueryState::Empty | QueryState::Loading => None,
        };
        QueryState::Failed {
            error: error.into(),
            last_good,
        }
    }

    /// No data yet and a fetch is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    /// A fetch is in flight, with or without data
    pub fn is_fetching(&self) -> bool {
        matches!(self, QueryState::Loading | QueryState::Refreshing(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, QueryState::Empty)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Most recent successful data, if any
    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Ready(data) | QueryState::Refreshing(data) => Some(data),
            QueryState::Failed { last_good, .. } => last_good.as_ref(),
            QueryState::Empty | QueryState::Loading => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            QueryState::Ready(data) | QueryState::Refreshing(data) => Some(data),
            QueryState::Failed { last_good, .. } => last_good,
            QueryState::Empty | QueryState::Loading => None,
        }
    }

    /// Convert the payload, keeping the state tag
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryState<U> {
        match self {
            QueryState::Empty => QueryState::Empty,
            QueryState::Loading => QueryState::Loading,
            QueryState::Ready(data) => QueryState::Ready(f(data)),
            QueryState::Refreshing(data) => QueryState::Refreshing(f(data)),
            QueryState::Failed { error, last_good } => QueryState::Failed {
                error,
                last_good: last_good.map(f),
            },
        }
    }

    /// Convert the payload with a fallible projection; a payload that does
    /// not project is treated as absent.
    pub fn filter_map<U>(self, f: impl Fn(T) -> Option<U>) -> QueryState<U> {
        match self {
            QueryState::Empty => QueryState::Empty,
            QueryState::Loading => QueryState::Loading,
            QueryState::Ready(data) => f(data).map_or(QueryState::Empty, QueryState::Ready),
            QueryState::Refreshing(data) => {
                f(data).map_or(QueryState::Loading, QueryState::Refreshing)
            }
            QueryState::Failed { error, last_good } => QueryState::Failed {
                error,
                last_good: last_good.and_then(f),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_transitions() {
        assert_eq!(QueryState::<u8>::Empty.begin(), QueryState::Loading);
        assert_eq!(QueryState::<u8>::Loading.begin(), QueryState::Loading);
        assert_eq!(QueryState::Ready(1).begin(), QueryState::Refreshing(1));
        assert_eq!(QueryState::Refreshing(1).begin(), QueryState::Refreshing(1));
        assert_eq!(
            QueryState::Failed {
                error: "x".to_string(),
                last_good: Some(1)
            }
            .begin(),
            QueryState::Refreshing(1)
        );
        assert_eq!(
            QueryState::<u8>::Failed {
                error: "x".to_string(),
                last_good: None
            }
            .begin(),
            QueryState::Loading
        );
    }

    #[test]
    fn test_failure_keeps_last_good() {
        let state = QueryState::Ready(5).begin().fail("boom");
        assert_eq!(state.error(), Some("boom"));
        assert_eq!(state.data(), Some(&5));

        // A second failure keeps the same data
        let state = state.begin().fail("again");
        assert_eq!(state.data(), Some(&5));
        assert_eq!(state.error(), Some("again"));
    }

    #[test]
    fn test_first_failure_has_no_data() {
        let state = QueryState::<u8>::Empty.begin().fail("down");
        assert_eq!(state.data(), None);
        assert!(!state.is_fetching());
    }

    #[test]
    fn test_success_replaces_everything() {
        let state = QueryState::Failed {
            error: "x".to_string(),
            last_good: Some(1),
        }
        .begin()
        .succeed(2);
        assert_eq!(state, QueryState::Ready(2));
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_signals() {
        assert!(QueryState::<u8>::Loading.is_loading());
        assert!(QueryState::<u8>::Loading.is_fetching());
        assert!(!QueryState::Refreshing(1).is_loading());
        assert!(QueryState::Refreshing(1).is_fetching());
        assert!(!QueryState::Ready(1).is_fetching());
    }

    #[test]
    fn test_map_keeps_tag() {
        assert_eq!(QueryState::Refreshing(2).map(|n| n * 10), QueryState::Refreshing(20));
    }
}
