use crate::database::models::ModelError;
use crate::database::store::{quote_identifier, SqlValue};

/// Maps a resource's logical field onto its storage column.
///
/// Implemented by per-resource field enums so the mapping is checked at
/// compile time instead of looked up in an alias table.
pub trait Column: Copy {
    fn column(self) -> &'static str;
}

/// Output of [`sql_for_partial_update`]
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate {
    /// `"col_a" = $1, "col_b" = $2`
    pub set_cols: String,
    /// Values in placeholder order
    pub values: Vec<SqlValue>,
}

impl PartialUpdate {
    /// First unused placeholder index, for the caller's trailing `id`
    pub fn next_param(&self) -> usize {
        self.values.len() + 1
    }
}

/// Builds the SET fragment of a partial update.
///
/// Placeholders are numbered from `$1` in the order `fields` is given, and
/// `values` follows that same order with no gaps. An empty `fields` is
/// rejected with `InvalidUpdate`.
pub fn sql_for_partial_update<C: Column>(
    fields: Vec<(C, SqlValue)>,
) -> Result<PartialUpdate, ModelError> {
    if fields.is_empty() {
        return Err(ModelError::InvalidUpdate("No data".to_string()));
    }

    let (set_clauses, values): (Vec<String>, Vec<SqlValue>) = fields
        .into_iter()
        .enumerate()
        .map(|(i, (field, value))| {
            (format!("{} = ${}", quote_identifier(field.column()), i + 1), value)
        })
        .unzip();

    Ok(PartialUpdate {
        set_cols: set_clauses.join(", "),
        values,
    })
}

/// `"a", "b", "c"`
pub fn column_list(columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| quote_identifier(c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `$start, $start+1, ...` for `count` parameters
pub fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("${}", i))
        .collect::<Vec<_>>()
        .join(", ")
}
