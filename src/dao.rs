use crate::{
    ConnectionProvider, Entity, PageRequest, PageResult, Result, SchemaRegistry,
    TransactionSession, executor,
};
use std::sync::Arc;

/// Stateless CRUD facade: every call acquires one connection from the
/// provider and releases it when the call completes, on success and on
/// failure alike. Errors surface directly, there is no transaction to
/// unwind.
pub struct Dao<P: ConnectionProvider> {
    provider: P,
    registry: Arc<SchemaRegistry>,
}

impl<P: ConnectionProvider> Dao<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            registry: Arc::new(SchemaRegistry::new()),
        }
    }

    async fn acquire(&self) -> Result<P::Conn> {
        self.provider.acquire().await
    }

    /// All rows matching the set fields of `template`.
    pub async fn select<E: Entity>(&self, template: &E) -> Result<Vec<E>> {
        let mut connection = self.acquire().await?;
        let result = executor::select_op(&self.registry, &mut connection, template).await;
        executor::release(&mut connection).await;
        result
    }

    /// At most one row; more than one match is a consistency error, zero is
    /// `Ok(None)`.
    pub async fn select_one<E: Entity>(&self, template: &E) -> Result<Option<E>> {
        let mut connection = self.acquire().await?;
        let result = executor::select_one_op(&self.registry, &mut connection, template).await;
        executor::release(&mut connection).await;
        result
    }

    pub async fn select_count<E: Entity>(&self, template: &E) -> Result<i64> {
        let mut connection = self.acquire().await?;
        let result = executor::select_count_op(&self.registry, &mut connection, template).await;
        executor::release(&mut connection).await;
        result
    }

    /// Insert writing unset columns as explicit NULL. A generated primary
    /// key is written back onto `entity`.
    pub async fn insert<E: Entity>(&self, entity: &mut E) -> Result<u64> {
        let mut connection = self.acquire().await?;
        let result = executor::insert_op(&self.registry, &mut connection, entity, true).await;
        executor::release(&mut connection).await;
        result
    }

    /// Insert omitting unset columns.
    pub async fn insert_selective<E: Entity>(&self, entity: &mut E) -> Result<u64> {
        let mut connection = self.acquire().await?;
        let result = executor::insert_op(&self.registry, &mut connection, entity, false).await;
        executor::release(&mut connection).await;
        result
    }

    pub async fn update<E: Entity>(&self, entity: &E) -> Result<u64> {
        let mut connection = self.acquire().await?;
        let result = executor::update_op(&self.registry, &mut connection, entity, true).await;
        executor::release(&mut connection).await;
        result
    }

    /// Update omitting unset columns from the SET list.
    pub async fn update_selective<E: Entity>(&self, entity: &E) -> Result<u64> {
        let mut connection = self.acquire().await?;
        let result = executor::update_op(&self.registry, &mut connection, entity, false).await;
        executor::release(&mut connection).await;
        result
    }

    pub async fn delete<E: Entity>(&self, entity: &E) -> Result<u64> {
        let mut connection = self.acquire().await?;
        let result = executor::delete_op(&self.registry, &mut connection, entity).await;
        executor::release(&mut connection).await;
        result
    }

    pub async fn select_page<E: Entity>(
        &self,
        template: &E,
        request: &PageRequest,
    ) -> Result<PageResult<E>> {
        let mut connection = self.acquire().await?;
        let result =
            executor::select_page_op(&self.registry, &mut connection, template, request).await;
        executor::release(&mut connection).await;
        result
    }

    /// Open a transactional session over one held connection. The caller
    /// must eventually commit or roll back and close it, or the connection
    /// leaks.
    pub async fn begin(&self) -> Result<TransactionSession<P::Conn>> {
        TransactionSession::begin(self.acquire().await?, self.registry.clone()).await
    }
}
