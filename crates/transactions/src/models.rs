use categories::models::Category;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn is_income(self) -> bool {
        matches!(self, TransactionKind::Income)
    }
}

/// A single dated income or expense event.
///
/// `amount` is a non-negative magnitude in cents; the cash-flow sign
/// comes from `kind`, never from the number itself. The effective
/// contribution to net balance is `+amount` for income and `-amount`
/// for expenses.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Transaction {
    pub id: i64,
    pub amount: i64, // Cents
    pub description: String,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    /// None means uncategorized.
    pub category_id: Option<i64>,
    /// Category snapshot joined in by the store at read time. Read-only;
    /// not guaranteed to track later category edits.
    pub category: Option<Category>,
}

#[derive(Debug, Serialize)]
pub struct CreateTransactionRequest {
    amount: i64,
    description: String,
    date: NaiveDate,
    kind: TransactionKind,
    category_id: Option<i64>,
}

impl CreateTransactionRequest {
    pub fn new(
        amount_dollars: f64,
        description: String,
        date: String,
        kind: TransactionKind,
        category_id: Option<i64>,
    ) -> Result<Self, String> {
        if !amount_dollars.is_finite() || amount_dollars <= 0.0 {
            return Err("Amount must be greater than 0".to_string());
        }

        let description = description.trim().to_string();
        if description.is_empty() {
            return Err("Description cannot be empty".to_string());
        }

        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|_| "Invalid date format, expected YYYY-MM-DD".to_string())?;

        Ok(Self {
            amount: (amount_dollars * 100.0).round() as i64,
            description,
            date,
            kind,
            category_id,
        })
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn category_id(&self) -> Option<i64> {
        self.category_id
    }
}
