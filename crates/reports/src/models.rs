use serde::Serialize;

/// Income and expense totals over a transaction list, in cents.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub total_income: i64,
    pub total_expenses: i64,
}

impl Totals {
    /// Net balance for display. Derived on demand; not stored.
    pub fn net(&self) -> i64 {
        self.total_income - self.total_expenses
    }
}

/// Income and expense totals for one calendar month that had at least
/// one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyData {
    /// Short label built from the grouping key, e.g. "Jan 2024".
    pub month: String,
    pub income: i64,
    pub expenses: i64,
}

/// Aggregated expense spend for one category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryData {
    pub name: String,
    pub value: i64,
    pub color: String,
    pub icon: Option<String>,
}

/// Budgeted vs. actual spend for one budget row in the reference month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetComparison {
    pub category: String,
    pub budgeted: i64,
    pub actual: i64,
    pub color: String,
}

impl BudgetComparison {
    /// budgeted − actual; non-negative means under budget.
    pub fn difference(&self) -> i64 {
        self.budgeted - self.actual
    }

    pub fn is_under_budget(&self) -> bool {
        self.difference() >= 0
    }
}
