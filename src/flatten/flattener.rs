//! The row flattener: resolves parent contexts, collects child values, and
//! emits aligned rows into the accumulator.

use std::collections::HashSet;

use crate::error::EspalierError;
use crate::flatten::accumulator::TableAccumulator;
use crate::flatten::spec::{ChildSelector, ExtractionUnit, PathSpec};
use crate::flatten::types::{FlattenConfig, ProductPolicy};
use crate::tree::TreeNode;

/// Flattens one document item at a time against a caller-owned accumulator.
pub struct Flattener {
    config: FlattenConfig,
}

impl Flattener {
    pub fn new(config: FlattenConfig) -> Self {
        Flattener { config }
    }

    /// Run every extraction unit of a batch against one item root.
    ///
    /// `prefix` is prepended to every emitted row (e.g. a per-document
    /// identifier). Units whose target is in `skip_targets` are ignored.
    ///
    /// The whole batch is validated before any row is emitted; a structural
    /// defect in any unit aborts with no partial accumulation. Missing data
    /// never errors: an unresolvable parent path or an empty child match is
    /// logged and contributes zero rows.
    pub fn flatten<N: TreeNode>(
        &self,
        item: N,
        units: &[ExtractionUnit],
        prefix: &[String],
        skip_targets: &HashSet<String>,
        accumulator: &mut TableAccumulator,
    ) -> Result<(), EspalierError> {
        if units.is_empty() {
            return Err(EspalierError::EmptySpec);
        }
        for unit in units {
            unit.validate()?;
        }

        for unit in units {
            if skip_targets.contains(&unit.target) {
                log::debug!("target '{}' is in the skip set, ignoring unit", unit.target);
                continue;
            }
            self.flatten_unit(item.clone(), unit, prefix, accumulator);
        }
        Ok(())
    }

    fn flatten_unit<N: TreeNode>(
        &self,
        item: N,
        unit: &ExtractionUnit,
        prefix: &[String],
        accumulator: &mut TableAccumulator,
    ) {
        let at_root = matches!(unit.parents, PathSpec::Root);

        // Resolve the parent path down to the set of parent contexts. Only
        // the final chain tag fans out; everything above it is single-valued.
        let parents: Vec<N> = match &unit.parents {
            PathSpec::Root => vec![item.clone()],
            PathSpec::Parent(tag) => match item.find_one(tag) {
                Some(parent) => vec![parent],
                None => {
                    log::info!(
                        "parent '{}' not found, no rows for table '{}'",
                        tag,
                        unit.target
                    );
                    return;
                }
            },
            PathSpec::Chain(tags) => {
                let Some((parent_tag, ancestors)) = tags.split_last() else {
                    return;
                };
                let mut node = item.clone();
                for tag in ancestors {
                    match node.find_one(tag) {
                        Some(next) => node = next,
                        None => {
                            log::info!(
                                "ancestor '{}' not found, no rows for table '{}'",
                                tag,
                                unit.target
                            );
                            return;
                        }
                    }
                }
                node.find_all(parent_tag)
            }
        };

        for parent in parents {
            let mut value_lists: Vec<Vec<String>> = Vec::new();

            for selector in &unit.children {
                match selector {
                    ChildSelector::Attribute(tag, name) => {
                        // At the root there is no inner element to descend
                        // into; the attribute lives on the item itself.
                        let value = if at_root {
                            item.attr(name)
                        } else {
                            parent.find_one(tag).and_then(|child| child.attr(name))
                        };
                        match value {
                            Some(value) => value_lists.push(vec![value]),
                            None => log::info!(
                                "attribute '{}' on '{}' not found, skipping selector for table '{}'",
                                name,
                                tag,
                                unit.target
                            ),
                        }
                    }
                    ChildSelector::Element(tag) => {
                        let matches = parent.find_all(tag);
                        if matches.is_empty() {
                            log::info!(
                                "no '{}' elements under parent, skipping selector for table '{}'",
                                tag,
                                unit.target
                            );
                            continue;
                        }
                        value_lists.push(
                            matches
                                .iter()
                                .map(|node| node.text().unwrap_or_default())
                                .collect(),
                        );
                    }
                }
            }

            if value_lists.is_empty() {
                log::info!(
                    "no values collected for table '{}', skipping parent context",
                    unit.target
                );
                continue;
            }

            match self.config.product {
                ProductPolicy::FirstOnly => {
                    let mut row = prefix.to_vec();
                    row.extend(value_lists.iter().filter_map(|list| list.first().cloned()));
                    accumulator.append(&unit.target, row);
                }
                ProductPolicy::AllCombinations => {
                    for combination in cartesian_product(&value_lists) {
                        let mut row = prefix.to_vec();
                        row.extend(combination);
                        accumulator.append(&unit.target, row);
                    }
                }
            }
        }
    }
}

impl Default for Flattener {
    fn default() -> Self {
        Flattener::new(FlattenConfig::default())
    }
}

/// All combinations of one value from each list, in selector order.
fn cartesian_product(lists: &[Vec<String>]) -> Vec<Vec<String>> {
    let mut combinations: Vec<Vec<String>> = vec![Vec::new()];
    for list in lists {
        let mut next = Vec::with_capacity(combinations.len() * list.len());
        for partial in &combinations {
            for value in list {
                let mut extended = partial.clone();
                extended.push(value.clone());
                next.push(extended);
            }
        }
        combinations = next;
    }
    combinations
}
