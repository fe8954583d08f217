use crate::models::{CreateTransactionRequest, Transaction, TransactionKind};
use categories::models::{Category, CategoryKind, DEFAULT_COLOR};
use chrono::NaiveDate;
use database::{self, RepositoryError};
use sqlx::FromRow;

#[derive(FromRow)]
struct TransactionRecord {
    id: i64,
    amount: i64,
    description: String,
    date: NaiveDate,
    kind: TransactionKind,
    category_id: Option<i64>,
    category_name: Option<String>,
    category_color: Option<String>,
    category_icon: Option<String>,
    category_kind: Option<CategoryKind>,
}

impl From<TransactionRecord> for Transaction {
    fn from(record: TransactionRecord) -> Self {
        let category = match (record.category_id, record.category_name) {
            (Some(id), Some(name)) => Some(Category {
                id,
                name,
                color: record
                    .category_color
                    .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
                icon: record.category_icon,
                kind: record.category_kind.unwrap_or(CategoryKind::Expense),
            }),
            _ => None,
        };

        Transaction {
            id: record.id,
            amount: record.amount,
            description: record.description,
            date: record.date,
            kind: record.kind,
            category_id: record.category_id,
            category,
        }
    }
}

const TRANSACTION_SELECT: &str = "\
    SELECT t.id, t.amount, t.description, t.date, t.kind, t.category_id, \
           c.name AS category_name, c.color AS category_color, \
           c.icon AS category_icon, c.kind AS category_kind \
    FROM transactions t \
    LEFT JOIN categories c ON c.id = t.category_id";

pub(crate) struct TransactionRepository<'a> {
    conn: &'a mut database::Connection,
}

impl<'a> TransactionRepository<'a> {
    pub fn new(conn: &'a mut database::Connection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, req: &CreateTransactionRequest) -> Result<i64, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO transactions (amount, description, date, kind, category_id) VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(req.amount())
        .bind(req.description())
        .bind(req.date())
        .bind(req.kind())
        .bind(req.category_id())
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(id)
    }

    pub async fn update(
        &mut self,
        id: i64,
        req: &CreateTransactionRequest,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE transactions SET amount = $1, description = $2, date = $3, kind = $4, category_id = $5 WHERE id = $6",
        )
        .bind(req.amount())
        .bind(req.description())
        .bind(req.date())
        .bind(req.kind())
        .bind(req.category_id())
        .bind(id)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    pub async fn find_by_id(&mut self, id: i64) -> Result<Option<Transaction>, RepositoryError> {
        let record =
            sqlx::query_as::<_, TransactionRecord>(&format!("{TRANSACTION_SELECT} WHERE t.id = $1"))
                .bind(id)
                .fetch_optional(&mut *self.conn)
                .await?;

        Ok(record.map(|r| r.into()))
    }

    /// Newest date first; ties broken by insertion order.
    pub async fn list_all(&mut self) -> Result<Vec<Transaction>, RepositoryError> {
        let records = sqlx::query_as::<_, TransactionRecord>(&format!(
            "{TRANSACTION_SELECT} ORDER BY t.date DESC, t.id DESC"
        ))
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
