//! # Espalier - nested trees into flat tables
//!
//! A library for flattening hierarchically nested tree documents (XML-like)
//! into flat tabular rows, expanding one-to-many relationships so that
//! sibling values line up as columns.
//!
//! ## Modules
//!
//! - **flatten**: extraction specs, the row flattener, and the table
//!   accumulator
//! - **xml**: quick-xml backed tree adapter
//! - **export**: CSV serialization of finalized tables
//!
//! ## Quick Start
//!
//! ```rust
//! use espalier::flatten::{ExtractionUnit, Flattener, PathSpec, ChildSelector, TableAccumulator};
//! use espalier::xml::Document;
//! use std::collections::{BTreeMap, HashSet};
//!
//! # fn main() -> Result<(), espalier::EspalierError> {
//! let doc = Document::parse(
//!     "<item><parent><child1>a</child1><child2>b</child2></parent></item>",
//! )?;
//!
//! let units = [ExtractionUnit::new(
//!     vec![
//!         ChildSelector::Element("child1".into()),
//!         ChildSelector::Element("child2".into()),
//!     ],
//!     PathSpec::Parent("parent".into()),
//!     "T",
//! )];
//!
//! let mut accumulator = TableAccumulator::new();
//! Flattener::default().flatten(doc.root(), &units, &[], &HashSet::new(), &mut accumulator)?;
//!
//! let mut headers = BTreeMap::new();
//! headers.insert("T".to_string(), vec!["first".to_string(), "second".to_string()]);
//! let tables = accumulator.finalize(&headers, "");
//!
//! assert_eq!(tables["T"].rows, vec![vec!["a".to_string(), "b".to_string()]]);
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;

pub mod error;
pub mod export;
pub mod flatten;
pub mod tree;
pub mod xml;

// Re-export commonly used types for convenience
pub use error::EspalierError;
pub use flatten::{
    ChildSelector, ExtractionUnit, FlattenConfig, Flattener, PathSpec, ProductPolicy, Table,
    TableAccumulator,
};
pub use tree::TreeNode;

/// Main entry point for a batch run: flatten every `item_tag` element of a
/// parsed document into the shared accumulator.
///
/// Items are processed in document order, so row order per table follows
/// item order. Returns the number of items processed.
pub fn flatten_items(
    document: &xml::Document,
    item_tag: &str,
    units: &[ExtractionUnit],
    prefix: &[String],
    skip_targets: &HashSet<String>,
    config: FlattenConfig,
    accumulator: &mut TableAccumulator,
) -> Result<usize, EspalierError> {
    let flattener = Flattener::new(config);
    let items = document.items(item_tag);

    log::debug!("flattening {} '{}' items", items.len(), item_tag);
    for item in &items {
        flattener.flatten(*item, units, prefix, skip_targets, accumulator)?;
    }
    Ok(items.len())
}
