use serde::{Deserialize, Serialize};

/// How the cartesian product of child value lists becomes rows.
///
/// `FirstOnly` aligns the collected lists and emits a single row per parent
/// context built from the first value of each list. `AllCombinations` emits
/// every pairing as its own row, which is what one-to-many expansion wants
/// when every combination should be materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductPolicy {
    FirstOnly,
    AllCombinations,
}

/// Configuration for a flattening run.
#[derive(Debug, Clone)]
pub struct FlattenConfig {
    /// Row-emission policy per parent context.
    pub product: ProductPolicy,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        FlattenConfig {
            product: ProductPolicy::FirstOnly,
        }
    }
}

/// A finalized table: declared (or inferred) column names plus the rows
/// accumulated for it, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
