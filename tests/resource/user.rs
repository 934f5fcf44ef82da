#![allow(dead_code)]

use barrel::{Entity, FieldDef, Result, Row, RowLabeled, TableSchema, Value};
use time::PrimitiveDateTime;

/// Fixture entity mirroring a typical account table. `secret` is transient
/// and never reaches the database.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct User {
    pub id: Option<i64>,
    pub open_id: Option<String>,
    pub status: Option<i32>,
    pub created_at: Option<PrimitiveDateTime>,
    pub secret: Option<String>,
}

impl Entity for User {
    fn declare() -> Result<TableSchema> {
        TableSchema::declare("User")
            .field(FieldDef::new("id").primary_key().generated())
            .field(FieldDef::new("openId"))
            .field(FieldDef::new("status"))
            .field(FieldDef::new("createdAt"))
            .field(FieldDef::new("secret").transient())
            .build()
    }

    fn row(&self) -> Row {
        Box::new([
            self.id.into(),
            self.open_id.clone().into(),
            self.status.into(),
            self.created_at.into(),
        ])
    }

    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            id: row.get_column("id").and_then(Value::as_i64),
            open_id: row
                .get_column("openId")
                .and_then(Value::as_str)
                .map(str::to_owned),
            status: row.get_column("status").and_then(Value::as_i32),
            created_at: row.get_column("createdAt").and_then(Value::as_timestamp),
            secret: None,
        })
    }

    fn set_generated_key(&mut self, key: i64) -> Result<()> {
        self.id = Some(key);
        Ok(())
    }
}

/// Fixture with table and column overrides and no generated key.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AuditEntry {
    pub entry_id: Option<i64>,
    pub action: Option<String>,
}

impl Entity for AuditEntry {
    fn declare() -> Result<TableSchema> {
        TableSchema::declare("AuditEntry")
            .table("audit_log")
            .field(FieldDef::new("entryId").column("pk_entry").primary_key())
            .field(FieldDef::new("action"))
            .build()
    }

    fn row(&self) -> Row {
        Box::new([self.entry_id.into(), self.action.clone().into()])
    }

    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            entry_id: row.get_column("entryId").and_then(Value::as_i64),
            action: row
                .get_column("action")
                .and_then(Value::as_str)
                .map(str::to_owned),
        })
    }
}

/// Fixture with a string primary key marked generated; key rewrite must be
/// rejected for it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Voucher {
    pub code: Option<String>,
}

impl Entity for Voucher {
    fn declare() -> Result<TableSchema> {
        TableSchema::declare("Voucher")
            .field(FieldDef::new("code").primary_key().generated())
            .build()
    }

    fn row(&self) -> Row {
        Box::new([self.code.clone().into()])
    }

    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            code: row
                .get_column("code")
                .and_then(Value::as_str)
                .map(str::to_owned),
        })
    }
}

/// Every field transient: building the schema must fail.
#[derive(Debug, Default)]
pub struct Phantom {
    pub note: Option<String>,
}

impl Entity for Phantom {
    fn declare() -> Result<TableSchema> {
        TableSchema::declare("Phantom")
            .field(FieldDef::new("note").transient())
            .build()
    }

    fn row(&self) -> Row {
        Box::new([])
    }

    fn from_row(_row: &RowLabeled) -> Result<Self> {
        Ok(Self::default())
    }
}
