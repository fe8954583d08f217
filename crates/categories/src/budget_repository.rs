use crate::models::{Budget, Category, CategoryKind, SetBudgetRequest};
use database::{self, RepositoryError};
use sqlx::FromRow;

#[derive(FromRow)]
struct BudgetRecord {
    id: i64,
    category_id: i64,
    amount: i64,
    month: u32,
    year: i32,
    category_name: Option<String>,
    category_color: Option<String>,
    category_icon: Option<String>,
    category_kind: Option<CategoryKind>,
}

impl From<BudgetRecord> for Budget {
    fn from(record: BudgetRecord) -> Self {
        let category = record.category_name.map(|name| Category {
            id: record.category_id,
            name,
            color: record
                .category_color
                .unwrap_or_else(|| crate::models::DEFAULT_COLOR.to_string()),
            icon: record.category_icon,
            kind: record.category_kind.unwrap_or(CategoryKind::Expense),
        });

        Budget {
            id: record.id,
            category_id: record.category_id,
            amount: record.amount,
            month: record.month,
            year: record.year,
            category,
        }
    }
}

const BUDGET_SELECT: &str = "\
    SELECT b.id, b.category_id, b.amount, b.month, b.year, \
           c.name AS category_name, c.color AS category_color, \
           c.icon AS category_icon, c.kind AS category_kind \
    FROM budgets b \
    LEFT JOIN categories c ON c.id = b.category_id";

pub(crate) struct BudgetRepository<'a> {
    conn: &'a mut database::Connection,
}

impl<'a> BudgetRepository<'a> {
    pub fn new(conn: &'a mut database::Connection) -> Self {
        Self { conn }
    }

    /// Upsert keyed on (category_id, month, year): a second call with
    /// the same key replaces the amount rather than creating a row.
    pub async fn upsert(&mut self, req: &SetBudgetRequest) -> Result<i64, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO budgets (category_id, amount, month, year)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(category_id, month, year) DO UPDATE SET
            amount = excluded.amount
            RETURNING id
            "#,
        )
        .bind(req.category_id)
        .bind(req.amount)
        .bind(req.month)
        .bind(req.year)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(id)
    }

    pub async fn find_by_id(&mut self, id: i64) -> Result<Option<Budget>, RepositoryError> {
        let record =
            sqlx::query_as::<_, BudgetRecord>(&format!("{BUDGET_SELECT} WHERE b.id = $1"))
                .bind(id)
                .fetch_optional(&mut *self.conn)
                .await?;

        Ok(record.map(|r| r.into()))
    }

    pub async fn list_all(&mut self) -> Result<Vec<Budget>, RepositoryError> {
        let records =
            sqlx::query_as::<_, BudgetRecord>(&format!("{BUDGET_SELECT} ORDER BY b.month"))
                .fetch_all(&mut *self.conn)
                .await?;

        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    pub async fn list_for_period(
        &mut self,
        month: u32,
        year: i32,
    ) -> Result<Vec<Budget>, RepositoryError> {
        let records = sqlx::query_as::<_, BudgetRecord>(&format!(
            "{BUDGET_SELECT} WHERE b.month = $1 AND b.year = $2"
        ))
        .bind(month)
        .bind(year)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(records.into_iter().map(|r| r.into()).collect())
    }
}
