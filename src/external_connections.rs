use sqlx::PgConnection;

/// A handle to an active database connection, either pooled or part of a transaction
pub trait ConnectionHandle {
    fn borrow_connection(&mut self) -> &mut PgConnection;
}

/// The persistence context handed to domain services. Driven adapters ask it for a
/// database connection, so services never see the concrete pool or transaction.
pub trait ExternalConnectivity {
    type DbHandle<'cxn_borrow>: ConnectionHandle + Send
    where
        Self: 'cxn_borrow;

    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error>;
}

/// A persistence context which can start a transaction. The returned handle is itself
/// a persistence context, so the same driven ports work inside and outside of a transaction.
pub trait Transactable {
    type Handle: ExternalConnectivity + TransactionHandle + Send;

    async fn start_transaction(&self) -> Result<Self::Handle, anyhow::Error>;
}

/// A persistence context with an open transaction. Dropping the handle without
/// committing rolls the transaction back.
pub trait TransactionHandle {
    async fn commit(self) -> Result<(), anyhow::Error>;
}

/// Shorthand for a persistence context that can both hand out connections and start transactions
pub trait TransactableExternalConnectivity: ExternalConnectivity + Transactable {}

impl<T> TransactableExternalConnectivity for T where T: ExternalConnectivity + Transactable {}
