use crate::{Error, Result, Row, RowLabeled, TableSchema};

/// An application type mapped to a table row. Its fields double as data
/// payload and, when used as a query template, as filter values: a set field
/// filters, an unset field contributes nothing.
pub trait Entity: Send + Sized + 'static {
    /// Statically declare the schema of this type. Called once; the result
    /// is cached by the [`SchemaRegistry`](crate::SchemaRegistry).
    fn declare() -> Result<TableSchema>;

    /// Snapshot the current field values, aligned with the declaration order
    /// of the mapped (non-transient) fields. Unset fields yield a null
    /// [`Value`](crate::Value).
    fn row(&self) -> Row;

    /// Decode one labeled result row, looking values up by field name.
    fn from_row(row: &RowLabeled) -> Result<Self>;

    /// Write a database-generated primary key back onto the entity after an
    /// insert. Only integer and long keys can be rewritten; the default
    /// implementation rejects the attempt.
    fn set_generated_key(&mut self, _key: i64) -> Result<()> {
        Err(Error::Configuration(format!(
            "cannot rewrite generated key for {}",
            std::any::type_name::<Self>()
        )))
    }
}
