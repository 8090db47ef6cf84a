//! Tree flattening - turn nested document items into flat table rows.
//!
//! One [`ExtractionUnit`] describes a pull from a document item: which child
//! elements or attributes to read, the parent path they sit under, and the
//! output table the rows belong to. The [`Flattener`] resolves parent
//! contexts, aligns the collected child values, and appends rows to a
//! caller-owned [`TableAccumulator`], which finalizes into [`Table`]s once
//! the whole batch has been processed.

pub mod accumulator;
pub mod flattener;
pub mod spec;
pub mod types;

pub use accumulator::TableAccumulator;
pub use flattener::Flattener;
pub use spec::{ChildSelector, ExtractionUnit, PathSpec};
pub use types::{FlattenConfig, ProductPolicy, Table};
