use crate::{Error, Result, Row, TableSchema, Value, separated_by, write_identifier};
use std::fmt::{self, Display, Write};

/// A parameter-bound statement: SQL text with `?` placeholders and the
/// values to bind, in placeholder order. Values the caller left unset are
/// never bound; generated-key and explicit-NULL columns render as the SQL
/// literals `0` and `NULL`.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Synthesizes SQL for one entity type from its schema facts and a row
/// snapshot of a template instance.
pub struct StatementBuilder<'a> {
    schema: &'a TableSchema,
}

impl<'a> StatementBuilder<'a> {
    pub fn new(schema: &'a TableSchema) -> Self {
        Self { schema }
    }

    /// ANDed equality over every set field. Appends nothing when no field is
    /// set.
    fn write_where(&self, out: &mut String, params: &mut Vec<Value>, row: &Row) {
        let mut conditions = String::new();
        separated_by(
            &mut conditions,
            self.schema
                .columns()
                .iter()
                .zip(row.iter())
                .filter(|(_, value)| !value.is_null()),
            |out, (column, value)| {
                write_identifier(out, &column.column);
                out.push_str(" = ?");
                params.push(value.clone());
            },
            " AND ",
        );
        if !conditions.is_empty() {
            out.push_str(" WHERE ");
            out.push_str(&conditions);
        }
    }

    fn present_primary_key(&self, row: &Row, operation: &str) -> Result<(usize, Value)> {
        let forbidden = || {
            Error::Validation(format!(
                "{} without primary key value is forbidden",
                operation
            ))
        };
        let index = self.schema.primary_key_index().ok_or_else(forbidden)?;
        let value = row.get(index).cloned().unwrap_or_default();
        if value.is_null() {
            return Err(forbidden());
        }
        Ok((index, value))
    }

    pub fn select(&self, row: &Row) -> Statement {
        let mut sql = self.schema.select_list().to_string();
        let mut params = Vec::new();
        self.write_where(&mut sql, &mut params, row);
        Statement { sql, params }
    }

    pub fn select_count(&self, row: &Row) -> Statement {
        let mut sql = String::from("SELECT COUNT(*) AS \"count\" FROM ");
        write_identifier(&mut sql, self.schema.table());
        let mut params = Vec::new();
        self.write_where(&mut sql, &mut params, row);
        Statement { sql, params }
    }

    /// Select fragment + WHERE + optional ORDER BY + `LIMIT start, size`.
    /// The order clause is caller-supplied text and is emitted verbatim.
    pub fn page(&self, row: &Row, start_row: u64, size: u64, order_by: Option<&str>) -> Statement {
        let mut statement = self.select(row);
        if let Some(order_by) = order_by {
            let _ = write!(statement.sql, " ORDER BY {}", order_by);
        }
        statement.sql.push_str(" LIMIT ?, ?");
        statement.params.push(Value::Int64(Some(start_row as i64)));
        statement.params.push(Value::Int64(Some(size as i64)));
        statement
    }

    /// Set fields are bound; unset generated columns get the `0` placeholder
    /// the backend replaces with a generated key; other unset columns are
    /// written as explicit NULL only when `include_null` asks for it.
    pub fn insert(&self, row: &Row, include_null: bool) -> Result<Statement> {
        let mut columns = String::new();
        let mut values = String::new();
        let mut params = Vec::new();
        for (column, value) in self.schema.columns().iter().zip(row.iter()) {
            let marker = if !value.is_null() {
                params.push(value.clone());
                "?"
            } else if column.generated {
                "0"
            } else if include_null {
                "NULL"
            } else {
                continue;
            };
            if !columns.is_empty() {
                columns.push_str(", ");
                values.push_str(", ");
            }
            write_identifier(&mut columns, &column.column);
            values.push_str(marker);
        }
        if columns.is_empty() {
            return Err(Error::Validation(format!(
                "nothing to insert into {}",
                self.schema.table()
            )));
        }
        let mut sql = String::from("INSERT INTO ");
        write_identifier(&mut sql, self.schema.table());
        let _ = write!(sql, " ({}) VALUES ({})", columns, values);
        Ok(Statement { sql, params })
    }

    /// SET list follows the insert presence policy; the WHERE clause is
    /// always exactly the primary key equality.
    pub fn update(&self, row: &Row, include_null: bool) -> Result<Statement> {
        let (pk_index, pk_value) = self.present_primary_key(row, "update")?;
        let mut assignments = String::new();
        let mut params = Vec::new();
        separated_by(
            &mut assignments,
            self.schema
                .columns()
                .iter()
                .zip(row.iter())
                .enumerate()
                .filter(|(i, (_, value))| *i != pk_index && (include_null || !value.is_null())),
            |out, (_, (column, value))| {
                write_identifier(out, &column.column);
                if value.is_null() {
                    out.push_str(" = NULL");
                } else {
                    out.push_str(" = ?");
                    params.push(value.clone());
                }
            },
            ", ",
        );
        if assignments.is_empty() {
            return Err(Error::Validation("nothing to update".into()));
        }
        let pk = self.schema.columns()[pk_index].column.as_str();
        let mut sql = String::from("UPDATE ");
        write_identifier(&mut sql, self.schema.table());
        sql.push_str(" SET ");
        sql.push_str(&assignments);
        sql.push_str(" WHERE ");
        write_identifier(&mut sql, pk);
        sql.push_str(" = ?");
        params.push(pk_value);
        Ok(Statement { sql, params })
    }

    /// ANDed equality over every set field. The primary key must be set, so
    /// the filter always carries at least the key equality.
    pub fn delete(&self, row: &Row) -> Result<Statement> {
        self.present_primary_key(row, "delete")?;
        let mut sql = String::from("DELETE FROM ");
        write_identifier(&mut sql, self.schema.table());
        let mut params = Vec::new();
        self.write_where(&mut sql, &mut params, row);
        Ok(Statement { sql, params })
    }
}
