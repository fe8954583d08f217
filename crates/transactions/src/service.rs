use crate::models::{CreateTransactionRequest, Transaction, TransactionKind};
use crate::repository::TransactionRepository;
use database::{Database, RepositoryError};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Database error: {0}")]
    Infrastructure(String),
    #[error("Transaction not found")]
    NotFound,
}

impl From<RepositoryError> for TransactionError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => TransactionError::NotFound,
            RepositoryError::Infrastructure(e) => TransactionError::Infrastructure(e.to_string()),
            _ => TransactionError::Infrastructure(err.to_string()),
        }
    }
}

pub struct TransactionService;

impl TransactionService {
    #[instrument(skip(db))]
    pub async fn create_transaction(
        db: &Database,
        amount_dollars: f64,
        description: String,
        date: String,
        kind: TransactionKind,
        category_id: Option<i64>,
    ) -> Result<i64, TransactionError> {
        let req = CreateTransactionRequest::new(amount_dollars, description, date, kind, category_id)
            .map_err(TransactionError::InvalidInput)?;

        let mut uow = db.begin().await.map_err(RepositoryError::from)?;
        let mut repo = TransactionRepository::new(uow.connection());

        let id = repo.create(&req).await?;

        uow.commit().await.map_err(RepositoryError::from)?;

        Ok(id)
    }

    #[instrument(skip(db))]
    pub async fn update_transaction(
        db: &Database,
        id: i64,
        amount_dollars: f64,
        description: String,
        date: String,
        kind: TransactionKind,
        category_id: Option<i64>,
    ) -> Result<Transaction, TransactionError> {
        let req = CreateTransactionRequest::new(amount_dollars, description, date, kind, category_id)
            .map_err(TransactionError::InvalidInput)?;

        let mut uow = db.begin().await.map_err(RepositoryError::from)?;
        let mut repo = TransactionRepository::new(uow.connection());

        repo.update(id, &req).await?;

        let transaction = repo
            .find_by_id(id)
            .await?
            .ok_or(TransactionError::NotFound)?;

        uow.commit().await.map_err(RepositoryError::from)?;

        Ok(transaction)
    }

    #[instrument(skip(db))]
    pub async fn get_transaction(db: &Database, id: i64) -> Result<Transaction, TransactionError> {
        let mut uow = db.begin().await.map_err(RepositoryError::from)?;
        let mut repo = TransactionRepository::new(uow.connection());

        let transaction = repo
            .find_by_id(id)
            .await?
            .ok_or(TransactionError::NotFound)?;

        Ok(transaction)
    }

    /// The full ledger, newest first, each entry carrying its category
    /// snapshot. This is the input the reporting layer consumes.
    #[instrument(skip(db))]
    pub async fn list_transactions(db: &Database) -> Result<Vec<Transaction>, TransactionError> {
        let mut uow = db.begin().await.map_err(RepositoryError::from)?;
        let mut repo = TransactionRepository::new(uow.connection());

        let transactions = repo.list_all().await?;

        Ok(transactions)
    }

    #[instrument(skip(db))]
    pub async fn delete_transaction(db: &Database, id: i64) -> Result<(), TransactionError> {
        let mut uow = db.begin().await.map_err(RepositoryError::from)?;
        let mut repo = TransactionRepository::new(uow.connection());

        repo.delete(id).await?;

        uow.commit().await.map_err(RepositoryError::from)?;
        Ok(())
    }
}
