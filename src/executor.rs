use crate::{
    Connection, Entity, Error, PageRequest, PageResult, Result, RowLabeled, RowsAffected,
    SchemaRegistry, Statement, StatementBuilder, Value,
    stream::{StreamExt, TryStreamExt},
};
use log::{debug, info, warn};

/// Run a row-returning statement and decode every row into `E`.
pub(crate) async fn fetch_all<E: Entity, C: Connection>(
    connection: &mut C,
    statement: Statement,
) -> Result<Vec<E>> {
    info!("query: {}", statement);
    connection
        .query(statement)
        .map(|row| row.and_then(|row| E::from_row(&row)))
        .try_collect()
        .await
}

/// Run a count statement and decode the single `count` column.
pub(crate) async fn fetch_count<C: Connection>(
    connection: &mut C,
    statement: Statement,
) -> Result<i64> {
    info!("query: {}", statement);
    let rows: Vec<RowLabeled> = connection.query(statement).try_collect().await?;
    rows.first()
        .and_then(|row| row.get_column("count"))
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::Decode("count query returned no count column".into()))
}

pub(crate) async fn run_update<C: Connection>(
    connection: &mut C,
    statement: Statement,
) -> Result<RowsAffected> {
    info!("execute: {}", statement);
    connection.execute(statement).await
}

/// Release a connection after a stateless call. Failures are logged, never
/// raised, so they cannot mask the operation's own outcome.
pub(crate) async fn release<C: Connection>(connection: &mut C) {
    match connection.close().await {
        Ok(()) => debug!("connection released"),
        Err(error) => warn!("failed to release connection: {error}"),
    }
}

pub(crate) async fn select_op<E: Entity, C: Connection>(
    registry: &SchemaRegistry,
    connection: &mut C,
    template: &E,
) -> Result<Vec<E>> {
    let schema = registry.resolve::<E>()?;
    let statement = StatementBuilder::new(&schema).select(&template.row());
    fetch_all(connection, statement).await
}

pub(crate) async fn select_one_op<E: Entity, C: Connection>(
    registry: &SchemaRegistry,
    connection: &mut C,
    template: &E,
) -> Result<Option<E>> {
    let mut rows = select_op(registry, connection, template).await?;
    if rows.len() > 1 {
        return Err(Error::Consistency(format!(
            "expected one row, but found {}",
            rows.len()
        )));
    }
    Ok(rows.pop())
}

pub(crate) async fn select_count_op<E: Entity, C: Connection>(
    registry: &SchemaRegistry,
    connection: &mut C,
    template: &E,
) -> Result<i64> {
    let schema = registry.resolve::<E>()?;
    let statement = StatementBuilder::new(&schema).select_count(&template.row());
    fetch_count(connection, statement).await
}

pub(crate) async fn insert_op<E: Entity, C: Connection>(
    registry: &SchemaRegistry,
    connection: &mut C,
    entity: &mut E,
    include_null: bool,
) -> Result<u64> {
    let schema = registry.resolve::<E>()?;
    let statement = StatementBuilder::new(&schema).insert(&entity.row(), include_null)?;
    let affected = run_update(connection, statement).await?;
    if schema.primary_key().is_some_and(|pk| pk.generated) {
        if let Some(key) = affected.last_insert_id {
            entity.set_generated_key(key)?;
        }
    }
    Ok(affected.rows_affected)
}

pub(crate) async fn update_op<E: Entity, C: Connection>(
    registry: &SchemaRegistry,
    connection: &mut C,
    entity: &E,
    include_null: bool,
) -> Result<u64> {
    let schema = registry.resolve::<E>()?;
    let statement = StatementBuilder::new(&schema).update(&entity.row(), include_null)?;
    Ok(run_update(connection, statement).await?.rows_affected)
}

pub(crate) async fn delete_op<E: Entity, C: Connection>(
    registry: &SchemaRegistry,
    connection: &mut C,
    entity: &E,
) -> Result<u64> {
    let schema = registry.resolve::<E>()?;
    let statement = StatementBuilder::new(&schema).delete(&entity.row())?;
    Ok(run_update(connection, statement).await?.rows_affected)
}

/// Count first; when the requested slice starts at or past the end the page
/// query is never issued and an empty page comes back.
pub(crate) async fn select_page_op<E: Entity, C: Connection>(
    registry: &SchemaRegistry,
    connection: &mut C,
    template: &E,
    request: &PageRequest,
) -> Result<PageResult<E>> {
    let schema = registry.resolve::<E>()?;
    let builder = StatementBuilder::new(&schema);
    let row = template.row();
    let total = fetch_count(connection, builder.select_count(&row)).await?;
    if total == 0 || total <= request.start_row() as i64 {
        return Ok(PageResult::empty(request, total));
    }
    let statement = builder.page(&row, request.start_row(), request.size(), request.order_clause());
    let elements = fetch_all(connection, statement).await?;
    Ok(PageResult::filled(request, total, elements))
}
