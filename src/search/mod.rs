//! Product search: filter state, URL canonicalization, and the remote and
//! local execution strategies.

mod engine;
mod filters;
mod projection;
mod session;
mod url_sync;

pub use engine::{LocalSearch, RemoteSearch, SearchOutcome, SearchStrategy, filter_and_sort};
pub use filters::{Gender, SearchFilterState, SortBy};
pub use projection::{ProductSummary, project};
pub use session::{SearchSession, SearchStatus};
pub use url_sync::{NavigationSink, UrlSync};

use std::str::FromStr;

/// Which strategy answers searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Remote,
    Local,
}

impl FromStr for SearchMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(SearchMode::Remote),
            "local" => Ok(SearchMode::Local),
            _ => Err(()),
        }
    }
}
