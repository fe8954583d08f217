use serde::{Deserialize, Serialize};

/// Neutral fallback color used wherever category metadata is missing.
pub const DEFAULT_COLOR: &str = "#6B7280";

/// Whether a category groups income or expense transactions.
///
/// Stored as an explicit attribute; older data inferred it from the
/// category being literally named "Income", which survives only as
/// [`CategoryKind::infer_from_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    /// Legacy compatibility shim: categories named "Income" were income
    /// categories, everything else was an expense category. Only used
    /// when a create request does not state the kind explicitly.
    pub fn infer_from_name(name: &str) -> Self {
        if name == "Income" {
            CategoryKind::Income
        } else {
            CategoryKind::Expense
        }
    }

    pub fn is_income(self) -> bool {
        matches!(self, CategoryKind::Income)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub icon: Option<String>,
    pub kind: CategoryKind,
}

#[derive(Debug, Serialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub color: String,
    pub icon: Option<String>,
    pub kind: CategoryKind,
}

impl CreateCategoryRequest {
    pub fn new(
        name: String,
        color: String,
        icon: Option<String>,
        kind: Option<CategoryKind>,
    ) -> Result<Self, String> {
        if name.trim().is_empty() {
            return Err("Category name cannot be empty".to_string());
        }

        let name = name.trim().to_string();
        let kind = kind.unwrap_or_else(|| CategoryKind::infer_from_name(&name));

        Ok(Self {
            name,
            color,
            icon,
            kind,
        })
    }
}

/// A target spend for one category in one calendar month. Uniquely
/// identified by (category_id, month, year); amounts are cents.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Budget {
    pub id: i64,
    pub category_id: i64,
    pub amount: i64,
    pub month: u32,
    pub year: i32,
    /// Category snapshot joined in by the store at read time.
    pub category: Option<Category>,
}

#[derive(Debug, Serialize)]
pub struct SetBudgetRequest {
    pub category_id: i64,
    pub amount: i64,
    pub month: u32,
    pub year: i32,
}

impl SetBudgetRequest {
    pub fn new(
        category_id: i64,
        amount_dollars: f64,
        month: u32,
        year: i32,
    ) -> Result<Self, String> {
        if !amount_dollars.is_finite() || amount_dollars < 0.0 {
            return Err("Budget amount cannot be negative".to_string());
        }
        if !(1..=12).contains(&month) {
            return Err("Month must be between 1 and 12".to_string());
        }

        Ok(Self {
            category_id,
            amount: (amount_dollars * 100.0).round() as i64,
            month,
            year,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_category_request_valid() {
        let req = CreateCategoryRequest::new(
            "Groceries".to_string(),
            "#ffffff".to_string(),
            None,
            Some(CategoryKind::Expense),
        )
        .unwrap();
        assert_eq!(req.name, "Groceries");
        assert_eq!(req.kind, CategoryKind::Expense);
    }

    #[test]
    fn test_create_category_request_empty() {
        assert!(
            CreateCategoryRequest::new("   ".to_string(), "#ffffff".to_string(), None, None)
                .is_err()
        );
    }

    #[test]
    fn test_kind_falls_back_to_legacy_name_rule() {
        let income =
            CreateCategoryRequest::new("Income".to_string(), "#10B981".to_string(), None, None)
                .unwrap();
        assert_eq!(income.kind, CategoryKind::Income);

        let expense =
            CreateCategoryRequest::new("Rent".to_string(), "#3B82F6".to_string(), None, None)
                .unwrap();
        assert_eq!(expense.kind, CategoryKind::Expense);
    }

    #[test]
    fn test_set_budget_request_converts_to_cents() {
        let req = SetBudgetRequest::new(1, 300.0, 1, 2024).unwrap();
        assert_eq!(req.amount, 30000);
    }

    #[test]
    fn test_set_budget_request_rejects_bad_month() {
        assert!(SetBudgetRequest::new(1, 100.0, 0, 2024).is_err());
        assert!(SetBudgetRequest::new(1, 100.0, 13, 2024).is_err());
    }

    #[test]
    fn test_set_budget_request_rejects_negative_amount() {
        assert!(SetBudgetRequest::new(1, -5.0, 1, 2024).is_err());
    }
}
