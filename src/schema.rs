use crate::{Error, Result, camel_to_snake, separated_by, write_identifier};
use log::info;

/// Declaration of a single entity field, consumed by [`TableSchema::declare`].
///
/// The column name defaults to the snake case form of the logical name;
/// `column` overrides it. `transient` fields are declared for completeness
/// but excluded from the column mapping altogether.
#[derive(Debug, Clone)]
pub struct FieldDef {
    name: &'static str,
    column: Option<&'static str>,
    primary_key: bool,
    generated: bool,
    transient: bool,
}

impl FieldDef {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            column: None,
            primary_key: false,
            generated: false,
            transient: false,
        }
    }

    pub fn column(mut self, name: &'static str) -> Self {
        self.column = Some(name);
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Mark the column as assigned by the database on insert.
    pub fn generated(mut self) -> Self {
        self.generated = true;
        self
    }

    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }
}

/// A mapped column: resolved schema facts for one non-transient field.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    /// Logical field name, used as the result set label.
    pub name: &'static str,
    /// Resolved column name.
    pub column: String,
    pub primary_key: bool,
    pub generated: bool,
}

/// Immutable schema facts for one entity type: table name, ordered column
/// mapping, at most one primary key, and the precomputed select-list
/// fragment shared by every select-family statement.
#[derive(Debug)]
pub struct TableSchema {
    type_name: &'static str,
    table: String,
    columns: Vec<ColumnDef>,
    primary_key: Option<usize>,
    select_list: String,
}

impl TableSchema {
    pub fn declare(type_name: &'static str) -> TableSchemaBuilder {
        TableSchemaBuilder {
            type_name,
            table: None,
            fields: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Mapped columns in declaration order.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn primary_key(&self) -> Option<&ColumnDef> {
        self.primary_key.map(|i| &self.columns[i])
    }

    pub fn primary_key_index(&self) -> Option<usize> {
        self.primary_key
    }

    /// The `SELECT "col" AS "field", … FROM "table"` fragment.
    pub fn select_list(&self) -> &str {
        &self.select_list
    }
}

pub struct TableSchemaBuilder {
    type_name: &'static str,
    table: Option<&'static str>,
    fields: Vec<FieldDef>,
}

impl TableSchemaBuilder {
    /// Override the table name instead of deriving it from the type name.
    pub fn table(mut self, name: &'static str) -> Self {
        self.table = Some(name);
        self
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> Result<TableSchema> {
        let table = match self.table {
            Some(name) => name.to_string(),
            None => camel_to_snake(self.type_name),
        };
        let columns = self
            .fields
            .into_iter()
            .filter(|field| !field.transient)
            .map(|field| ColumnDef {
                name: field.name,
                column: match field.column {
                    Some(name) => name.to_string(),
                    None => camel_to_snake(field.name),
                },
                primary_key: field.primary_key,
                generated: field.generated,
            })
            .collect::<Vec<_>>();
        if columns.is_empty() {
            return Err(Error::Configuration(format!(
                "no mappable fields in {}",
                self.type_name
            )));
        }
        let mut primary_key = None;
        for (i, column) in columns.iter().enumerate() {
            if column.primary_key {
                if primary_key.is_some() {
                    return Err(Error::Configuration(format!(
                        "{} declares more than one primary key field",
                        self.type_name
                    )));
                }
                primary_key = Some(i);
            }
        }
        let mut select_list = String::from("SELECT ");
        separated_by(
            &mut select_list,
            &columns,
            |out, column| {
                write_identifier(out, &column.column);
                out.push_str(" AS ");
                write_identifier(out, column.name);
            },
            ", ",
        );
        select_list.push_str(" FROM ");
        write_identifier(&mut select_list, &table);
        info!("schema built for {} -> table {}", self.type_name, table);
        Ok(TableSchema {
            type_name: self.type_name,
            table,
            columns,
            primary_key,
            select_list,
        })
    }
}
