//! Declarative extraction specs.
//!
//! A batch of [`ExtractionUnit`]s describes everything to pull from one
//! document item: which children to read, where their shared parent sits in
//! the hierarchy, and which output table receives the rows. Units are plain
//! data and deserialize from job files, so the shapes mirror the JSON forms:
//!
//! ```json
//! {
//!   "children": ["title", ["price", "currency"]],
//!   "parents": ["listing", "offer"],
//!   "target": "offers"
//! }
//! ```

use serde::Deserialize;

use crate::error::EspalierError;

/// What to read from a resolved parent context.
///
/// The selector shape is fixed at spec construction time, so the flattener
/// never inspects value types during traversal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ChildSelector {
    /// Extract the text of every matching child element.
    Element(String),
    /// Extract one attribute value: `(element tag, attribute name)`.
    /// Attributes are single-valued and never fan out.
    Attribute(String, String),
}

/// Where the parent context sits relative to the item root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PathSpec {
    /// The item root itself is the parent context. JSON form: `null`.
    Root,
    /// One shared parent element under the root.
    Parent(String),
    /// A single-valued grandparent chain followed by a final, repeatable
    /// parent tag. Must name at least two tags; the single-parent case uses
    /// `Parent`, not a one-element chain.
    Chain(Vec<String>),
}

/// One extraction: children to read, the parent path to resolve them under,
/// and the accumulator table the rows land in.
///
/// All three fields are required and no others are accepted, so a malformed
/// job entry fails at deserialization rather than mid-run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractionUnit {
    pub children: Vec<ChildSelector>,
    pub parents: PathSpec,
    pub target: String,
}

impl ExtractionUnit {
    pub fn new(
        children: Vec<ChildSelector>,
        parents: PathSpec,
        target: impl Into<String>,
    ) -> Self {
        ExtractionUnit {
            children,
            parents,
            target: target.into(),
        }
    }

    /// Structural checks that must pass before any row is emitted.
    pub fn validate(&self) -> Result<(), EspalierError> {
        if let PathSpec::Chain(tags) = &self.parents {
            if tags.len() < 2 {
                return Err(EspalierError::ShortChain {
                    target: self.target.clone(),
                    len: tags.len(),
                });
            }
        }
        Ok(())
    }
}
