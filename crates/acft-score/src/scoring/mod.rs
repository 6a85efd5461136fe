//! Standards-table scoring engine.
//!
//! [`ScoreResolver`] turns one raw result into points; [`CompositeScorer`] runs all six
//! events and sums them. Tables come from a [`TableLoader`], normally a
//! [`CachedTableLoader`] over the embedded CSV resources.

pub mod age;
pub mod composite;
pub mod error;
pub mod event;
pub mod loader;
pub mod resolver;
pub mod table;
pub mod time;

pub use age::AgeBracket;
pub use composite::{CompositeError, CompositeScore, CompositeScorer, EventInputs};
pub use error::ScoringError;
pub use event::{Direction, Event, EventKind, Sex};
pub use loader::{
    CachedTableLoader, DirectoryTables, EmbeddedTables, StandardsSource, TableKey, TableLoader,
    TableSource,
};
pub use resolver::{EventScore, RawInput, Resolution, ScoreResolver};
pub use table::{StandardsColumn, StandardsTable, Threshold};
pub use time::{format_seconds, parse_seconds};

use std::sync::Arc;

/// Composite scorer over cached tables from the given source.
pub fn scorer_for(source: StandardsSource) -> CompositeScorer<CachedTableLoader<StandardsSource>> {
    let loader = Arc::new(CachedTableLoader::new(source));
    CompositeScorer::new(ScoreResolver::new(loader))
}
