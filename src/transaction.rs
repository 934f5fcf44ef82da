use crate::{
    Connection, Entity, Error, PageRequest, PageResult, Result, SchemaRegistry, executor,
};
use log::{info, warn};
use std::sync::Arc;

/// Lifecycle of a transactional session. Terminal states accept no further
/// CRUD operations; `Closed` is reachable from every state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Init,
    Active,
    Committed,
    RolledBack,
    Closed,
}

/// A session holding one connection across multiple operations under an
/// explicit commit/rollback/close discipline.
///
/// Any CRUD failure while `Active` triggers an automatic rollback and close;
/// the caller receives the original error and secondary cleanup failures are
/// only logged. The session must eventually be committed or rolled back and
/// closed by its caller, or its connection leaks.
pub struct TransactionSession<C: Connection> {
    connection: Option<C>,
    state: TxState,
    registry: Arc<SchemaRegistry>,
}

impl<C: Connection> TransactionSession<C> {
    /// Disable auto-commit on the freshly acquired connection and enter
    /// `Active`. On failure the connection is closed (log-only) before the
    /// error is raised.
    pub(crate) async fn begin(mut connection: C, registry: Arc<SchemaRegistry>) -> Result<Self> {
        if let Err(error) = connection.set_auto_commit(false).await {
            if let Err(close_error) = connection.close().await {
                warn!("failed to close connection after begin failure: {close_error}");
            }
            return Err(error);
        }
        let mut session = Self {
            connection: Some(connection),
            state: TxState::Init,
            registry,
        };
        session.transition(TxState::Active)?;
        info!("transaction started");
        Ok(session)
    }

    pub fn state(&self) -> TxState {
        self.state
    }

    fn transition(&mut self, to: TxState) -> Result<()> {
        let valid = matches!(
            (self.state, to),
            (TxState::Init, TxState::Active)
                | (TxState::Active, TxState::Committed)
                | (TxState::Active, TxState::RolledBack)
                | (_, TxState::Closed)
        );
        if !valid {
            return Err(Error::Validation(format!(
                "invalid transaction transition {:?} -> {:?}",
                self.state, to
            )));
        }
        self.state = to;
        Ok(())
    }

    fn active(&mut self) -> Result<&mut C> {
        if self.state != TxState::Active {
            return Err(Error::Validation(format!(
                "session is {:?}, no further operations accepted",
                self.state
            )));
        }
        self.connection
            .as_mut()
            .ok_or_else(|| Error::Validation("session holds no connection".into()))
    }

    /// Take the connection and close it, logging instead of raising so the
    /// caller's original error is never masked.
    async fn release(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            if let Err(error) = connection.close().await {
                warn!("failed to close connection: {error}");
            }
        }
        self.state = TxState::Closed;
    }

    /// Automatic failure policy: roll back, close, return the original error.
    async fn fail(&mut self, error: Error) -> Error {
        if let Some(connection) = self.connection.as_mut() {
            if let Err(rollback_error) = connection.rollback().await {
                warn!("rollback after failure also failed: {rollback_error}");
            }
        }
        self.release().await;
        warn!("transaction rolled back and closed, cause: {error}");
        error
    }

    pub async fn select<E: Entity>(&mut self, template: &E) -> Result<Vec<E>> {
        let registry = self.registry.clone();
        let connection = self.active()?;
        match executor::select_op(&registry, connection, template).await {
            Ok(rows) => Ok(rows),
            Err(error) => Err(self.fail(error).await),
        }
    }

    pub async fn select_one<E: Entity>(&mut self, template: &E) -> Result<Option<E>> {
        let registry = self.registry.clone();
        let connection = self.active()?;
        match executor::select_one_op(&registry, connection, template).await {
            Ok(row) => Ok(row),
            Err(error) => Err(self.fail(error).await),
        }
    }

    pub async fn select_count<E: Entity>(&mut self, template: &E) -> Result<i64> {
        let registry = self.registry.clone();
        let connection = self.active()?;
        match executor::select_count_op(&registry, connection, template).await {
            Ok(count) => Ok(count),
            Err(error) => Err(self.fail(error).await),
        }
    }

    pub async fn insert<E: Entity>(&mut self, entity: &mut E) -> Result<u64> {
        let registry = self.registry.clone();
        let connection = self.active()?;
        match executor::insert_op(&registry, connection, entity, true).await {
            Ok(affected) => Ok(affected),
            Err(error) => Err(self.fail(error).await),
        }
    }

    pub async fn insert_selective<E: Entity>(&mut self, entity: &mut E) -> Result<u64> {
        let registry = self.registry.clone();
        let connection = self.active()?;
        match executor::insert_op(&registry, connection, entity, false).await {
            Ok(affected) => Ok(affected),
            Err(error) => Err(self.fail(error).await),
        }
    }

    pub async fn update<E: Entity>(&mut self, entity: &E) -> Result<u64> {
        let registry = self.registry.clone();
        let connection = self.active()?;
        match executor::update_op(&registry, connection, entity, true).await {
            Ok(affected) => Ok(affected),
            Err(error) => Err(self.fail(error).await),
        }
    }

    pub async fn update_selective<E: Entity>(&mut self, entity: &E) -> Result<u64> {
        let registry = self.registry.clone();
        let connection = self.active()?;
        match executor::update_op(&registry, connection, entity, false).await {
            Ok(affected) => Ok(affected),
            Err(error) => Err(self.fail(error).await),
        }
    }

    pub async fn delete<E: Entity>(&mut self, entity: &E) -> Result<u64> {
        let registry = self.registry.clone();
        let connection = self.active()?;
        match executor::delete_op(&registry, connection, entity).await {
            Ok(affected) => Ok(affected),
            Err(error) => Err(self.fail(error).await),
        }
    }

    pub async fn select_page<E: Entity>(
        &mut self,
        template: &E,
        request: &PageRequest,
    ) -> Result<PageResult<E>> {
        let registry = self.registry.clone();
        let connection = self.active()?;
        match executor::select_page_op(&registry, connection, template, request).await {
            Ok(page) => Ok(page),
            Err(error) => Err(self.fail(error).await),
        }
    }

    /// Commit the transaction. Valid only while `Active`; a commit failure
    /// is fatal, the session is closed (log-only) and the failure raised.
    pub async fn commit(&mut self) -> Result<()> {
        let connection = self.active()?;
        match connection.commit().await {
            Ok(()) => {
                self.transition(TxState::Committed)?;
                info!("transaction committed");
                Ok(())
            }
            Err(error) => {
                warn!("commit failed, closing session");
                self.release().await;
                Err(error)
            }
        }
    }

    /// Roll back the transaction. Valid only while `Active`.
    pub async fn rollback(&mut self) -> Result<()> {
        let connection = self.active()?;
        match connection.rollback().await {
            Ok(()) => {
                self.transition(TxState::RolledBack)?;
                info!("transaction rolled back");
                Ok(())
            }
            Err(error) => {
                warn!("rollback failed, closing session");
                self.release().await;
                Err(error)
            }
        }
    }

    /// Release the connection. Valid from any state and idempotent at the
    /// resource level: the connection is closed at most once.
    pub async fn close(&mut self) -> Result<()> {
        if let Some(mut connection) = self.connection.take() {
            let result = connection.close().await;
            self.transition(TxState::Closed)?;
            result?;
            info!("transaction session closed");
        } else {
            self.transition(TxState::Closed)?;
        }
        Ok(())
    }
}

impl<C: Connection> Drop for TransactionSession<C> {
    fn drop(&mut self) {
        // Cannot close asynchronously from here; the provider's connection
        // is gone for good.
        if self.connection.is_some() {
            warn!(
                "transaction session dropped in state {:?} while still holding a connection",
                self.state
            );
        }
    }
}
