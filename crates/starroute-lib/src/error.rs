use thiserror::Error;

use crate::catalog::SystemId;

/// Convenient result alias for the starroute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when constructing a solver over a catalog with no systems.
    #[error("catalog contains no systems")]
    EmptyCatalog,

    /// Raised when a solver endpoint does not resolve to a catalog system.
    #[error("system {id} is not part of the catalog")]
    SystemNotInCatalog { id: SystemId },

    /// Raised when a system name could not be found in the catalog.
    #[error("unknown system name: {name}{}", format_suggestions(.suggestions))]
    UnknownSystem {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a faction name could not be found in the catalog.
    #[error("unknown faction name: {name}")]
    UnknownFaction { name: String },

    /// Raised when a route segment has no traversable path between its endpoints.
    #[error("no route from {from} to {to} available")]
    RouteSegmentFailed { from: String, to: String },

    /// Wrapper for JSON errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
