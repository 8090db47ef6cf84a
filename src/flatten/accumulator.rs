//! Shared row accumulator and table materialization.

use std::collections::BTreeMap;

use crate::flatten::types::Table;

/// Append-only rows keyed by output table name, shared across every
/// extraction call of a batch run.
///
/// Owned explicitly by the caller and passed by mutable reference, so two
/// unrelated runs never observe each other's rows. Tables are created lazily
/// on first append; row order within a table is emission order.
#[derive(Debug, Default)]
pub struct TableAccumulator {
    tables: BTreeMap<String, Vec<Vec<String>>>,
}

impl TableAccumulator {
    pub fn new() -> Self {
        TableAccumulator::default()
    }

    /// Append one row to the end of the named table, creating it if needed.
    pub fn append(&mut self, target: &str, row: Vec<String>) {
        self.tables.entry(target.to_string()).or_default().push(row);
    }

    /// Rows accumulated so far for one table, if any have been appended.
    pub fn rows(&self, target: &str) -> Option<&[Vec<String>]> {
        self.tables.get(target).map(|rows| rows.as_slice())
    }

    pub fn row_count(&self, target: &str) -> usize {
        self.tables.get(target).map_or(0, |rows| rows.len())
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|name| name.as_str())
    }

    /// Convert every accumulated table into a [`Table`], consuming the
    /// accumulator.
    ///
    /// Every name in `headers` appears in the output even with zero rows (an
    /// empty table with exactly the declared columns). Rows shorter than the
    /// declared header width are padded with `sentinel`; header width is the
    /// canonical width. An accumulated table with no declared headers gets
    /// positional `col_N` names sized to its widest row.
    pub fn finalize(
        self,
        headers: &BTreeMap<String, Vec<String>>,
        sentinel: &str,
    ) -> BTreeMap<String, Table> {
        let mut finalized = BTreeMap::new();

        for (name, rows) in self.tables {
            let columns = match headers.get(&name) {
                Some(declared) => declared.clone(),
                None => {
                    let width = rows.iter().map(|row| row.len()).max().unwrap_or(0);
                    log::debug!(
                        "no declared headers for table '{}', inferring {} positional columns",
                        name,
                        width
                    );
                    (1..=width).map(|i| format!("col_{i}")).collect()
                }
            };

            let rows = rows
                .into_iter()
                .map(|mut row| {
                    while row.len() < columns.len() {
                        row.push(sentinel.to_string());
                    }
                    row
                })
                .collect();

            finalized.insert(name, Table { columns, rows });
        }

        // Declared tables that never saw a row still materialize, empty.
        for (name, declared) in headers {
            finalized.entry(name.clone()).or_insert_with(|| Table {
                columns: declared.clone(),
                rows: Vec::new(),
            });
        }

        finalized
    }
}
