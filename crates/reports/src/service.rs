use crate::models::{BudgetComparison, CategoryData, MonthlyData, Totals};
use categories::models::{Budget, DEFAULT_COLOR};
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap};
use transactions::models::{Transaction, TransactionKind};

/// How many months of history the monthly overview keeps.
const MONTHLY_SERIES_WINDOW: usize = 6;

/// Name reported for expense transactions without a category snapshot.
const FALLBACK_CATEGORY_NAME: &str = "Other";

/// Name reported for budgets whose category snapshot is missing.
const UNKNOWN_CATEGORY_NAME: &str = "Unknown";

pub struct ReportService;

impl ReportService {
    /// Single pass over the ledger: expenses accumulate as magnitudes,
    /// income as-is. Input is not validated here; that happens at
    /// transaction creation.
    pub fn calculate_totals(transactions: &[Transaction]) -> Totals {
        transactions.iter().fold(Totals::default(), |mut acc, t| {
            match t.kind {
                TransactionKind::Expense => acc.total_expenses += t.amount.abs(),
                TransactionKind::Income => acc.total_income += t.amount,
            }
            acc
        })
    }

    /// Per-month income/expense totals, chronologically ascending,
    /// truncated to the most recent six months that actually contain
    /// transactions. Months with no transactions are not synthesized.
    pub fn monthly_series(transactions: &[Transaction]) -> Vec<MonthlyData> {
        let mut groups: BTreeMap<(i32, u32), (i64, i64)> = BTreeMap::new();

        for t in transactions {
            let key = (t.date.year(), t.date.month());
            let entry = groups.entry(key).or_insert((0, 0));
            match t.kind {
                TransactionKind::Income => entry.0 += t.amount,
                TransactionKind::Expense => entry.1 += t.amount.abs(),
            }
        }

        let skip = groups.len().saturating_sub(MONTHLY_SERIES_WINDOW);
        groups
            .into_iter()
            .skip(skip)
            .map(|((year, month), (income, expenses))| MonthlyData {
                month: month_label(year, month),
                income,
                expenses,
            })
            .collect()
    }

    /// Expense spend grouped by category name. Uncategorized expenses
    /// fall back to "Other"; metadata is first-seen wins. Income
    /// transactions are excluded entirely. Output order is first
    /// appearance in the input.
    pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryData> {
        let mut breakdown: Vec<CategoryData> = Vec::new();

        for t in transactions {
            if t.kind != TransactionKind::Expense {
                continue;
            }

            let (name, color, icon) = match &t.category {
                Some(c) => (c.name.as_str(), c.color.as_str(), c.icon.clone()),
                None => (FALLBACK_CATEGORY_NAME, DEFAULT_COLOR, None),
            };

            match breakdown.iter_mut().find(|entry| entry.name == name) {
                Some(entry) => entry.value += t.amount.abs(),
                None => breakdown.push(CategoryData {
                    name: name.to_string(),
                    value: t.amount.abs(),
                    color: color.to_string(),
                    icon,
                }),
            }
        }

        breakdown
    }

    /// Share of `value` in `total` as a percentage rounded to one
    /// decimal. A zero total yields 0.0 rather than a non-finite value.
    pub fn expense_percentage(value: i64, total: i64) -> f64 {
        if total == 0 {
            return 0.0;
        }
        (value as f64 / total as f64 * 1000.0).round() / 10.0
    }

    /// One row per budget targeting the reference (month, year):
    /// budgeted amount against actual expense spend in that month.
    ///
    /// The reference month is an explicit parameter; callers default it
    /// to the wall clock at the outermost call site. A budget with no
    /// matching expenses yields actual = 0; spend in categories without
    /// a budget row produces no output row.
    pub fn budget_comparison(
        transactions: &[Transaction],
        budgets: &[Budget],
        month: u32,
        year: i32,
    ) -> Vec<BudgetComparison> {
        // Uncategorized spend groups under None and can never match a
        // budget row, which always has a concrete category id.
        let mut actual_spending: HashMap<Option<i64>, i64> = HashMap::new();
        for t in transactions {
            if t.kind != TransactionKind::Expense {
                continue;
            }
            if t.date.month() != month || t.date.year() != year {
                continue;
            }
            *actual_spending.entry(t.category_id).or_insert(0) += t.amount.abs();
        }

        budgets
            .iter()
            .filter(|b| b.month == month && b.year == year)
            .map(|b| {
                let (category, color) = match &b.category {
                    Some(c) => (c.name.clone(), c.color.clone()),
                    None => (UNKNOWN_CATEGORY_NAME.to_string(), DEFAULT_COLOR.to_string()),
                };

                BudgetComparison {
                    category,
                    budgeted: b.amount,
                    actual: actual_spending
                        .get(&Some(b.category_id))
                        .copied()
                        .unwrap_or(0),
                    color,
                }
            })
            .collect()
    }
}

fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("{year}-{month:02}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use categories::models::{Category, CategoryKind};

    fn category(id: i64, name: &str, color: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            color: color.to_string(),
            icon: None,
            kind: CategoryKind::Expense,
        }
    }

    fn transaction(
        amount: i64,
        date: &str,
        kind: TransactionKind,
        category: Option<Category>,
    ) -> Transaction {
        Transaction {
            id: 0,
            amount,
            description: "test".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            kind,
            category_id: category.as_ref().map(|c| c.id),
            category,
        }
    }

    fn income(amount: i64, date: &str) -> Transaction {
        transaction(amount, date, TransactionKind::Income, None)
    }

    fn expense(amount: i64, date: &str, category: Option<Category>) -> Transaction {
        transaction(amount, date, TransactionKind::Expense, category)
    }

    fn budget(id: i64, category: Category, amount: i64, month: u32, year: i32) -> Budget {
        Budget {
            id,
            category_id: category.id,
            amount,
            month,
            year,
            category: Some(category),
        }
    }

    #[test]
    fn totals_split_income_and_expenses() {
        let food = category(1, "Food", "#EF4444");
        let transactions = vec![
            income(100_000, "2024-01-15"),
            expense(20_000, "2024-01-20", Some(food)),
        ];

        let totals = ReportService::calculate_totals(&transactions);
        assert_eq!(totals.total_income, 100_000);
        assert_eq!(totals.total_expenses, 20_000);
        assert_eq!(totals.net(), 80_000);
    }

    #[test]
    fn totals_of_empty_ledger_are_zero() {
        let totals = ReportService::calculate_totals(&[]);
        assert_eq!(totals, Totals::default());
        assert_eq!(totals.net(), 0);
    }

    #[test]
    fn totals_are_non_negative_for_well_formed_input() {
        let transactions = vec![
            income(5_000, "2024-03-01"),
            expense(2_500, "2024-03-02", None),
            expense(1_000, "2024-03-03", None),
        ];

        let totals = ReportService::calculate_totals(&transactions);
        assert!(totals.total_income >= 0);
        assert!(totals.total_expenses >= 0);
    }

    #[test]
    fn monthly_series_groups_one_month_with_label_from_key() {
        let transactions = vec![
            income(100_000, "2024-01-15"),
            expense(20_000, "2024-01-20", None),
        ];

        let series = ReportService::monthly_series(&transactions);
        assert_eq!(
            series,
            vec![MonthlyData {
                month: "Jan 2024".to_string(),
                income: 100_000,
                expenses: 20_000,
            }]
        );
    }

    #[test]
    fn monthly_series_is_empty_for_empty_input() {
        assert!(ReportService::monthly_series(&[]).is_empty());
    }

    #[test]
    fn monthly_series_returns_all_months_when_fewer_than_six() {
        let transactions = vec![
            expense(100, "2024-01-10", None),
            expense(200, "2024-02-10", None),
            expense(300, "2024-03-10", None),
        ];

        let labels: Vec<String> = ReportService::monthly_series(&transactions)
            .into_iter()
            .map(|m| m.month)
            .collect();
        assert_eq!(labels, vec!["Jan 2024", "Feb 2024", "Mar 2024"]);
    }

    #[test]
    fn monthly_series_keeps_only_six_most_recent_months() {
        let transactions: Vec<Transaction> = (1..=9)
            .map(|m| expense(100, &format!("2023-{m:02}-10"), None))
            .collect();

        let series = ReportService::monthly_series(&transactions);
        assert_eq!(series.len(), 6);
        assert_eq!(series[0].month, "Apr 2023");
        assert_eq!(series[5].month, "Sep 2023");
    }

    #[test]
    fn monthly_series_spans_year_boundaries_in_order() {
        let transactions = vec![
            expense(100, "2024-01-05", None),
            expense(200, "2023-12-28", None),
            income(300, "2023-11-01"),
        ];

        let labels: Vec<String> = ReportService::monthly_series(&transactions)
            .into_iter()
            .map(|m| m.month)
            .collect();
        assert_eq!(labels, vec!["Nov 2023", "Dec 2023", "Jan 2024"]);
    }

    #[test]
    fn monthly_series_ignores_input_order() {
        let a = expense(100, "2024-02-10", None);
        let b = income(500, "2024-01-01");
        let c = expense(250, "2024-01-30", None);
        let d = income(75, "2024-02-28");

        let forward = ReportService::monthly_series(&[a.clone(), b.clone(), c.clone(), d.clone()]);
        let shuffled = ReportService::monthly_series(&[d, c, a, b]);
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn category_breakdown_merges_entries_with_same_category() {
        let food = category(1, "Food", "#EF4444");
        let transactions = vec![
            expense(5_000, "2024-01-10", Some(food.clone())),
            expense(7_500, "2024-01-12", Some(food)),
        ];

        let breakdown = ReportService::category_breakdown(&transactions);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].name, "Food");
        assert_eq!(breakdown[0].value, 12_500);
        assert_eq!(breakdown[0].color, "#EF4444");
    }

    #[test]
    fn category_breakdown_excludes_income_and_buckets_uncategorized() {
        let transactions = vec![
            income(100_000, "2024-01-15"),
            expense(3_000, "2024-01-16", None),
        ];

        let breakdown = ReportService::category_breakdown(&transactions);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].name, "Other");
        assert_eq!(breakdown[0].color, DEFAULT_COLOR);
        assert_eq!(breakdown[0].value, 3_000);
    }

    #[test]
    fn category_breakdown_conserves_total_expense_magnitude() {
        let food = category(1, "Food", "#EF4444");
        let fun = category(2, "Entertainment", "#EC4899");
        let transactions = vec![
            expense(1_234, "2024-01-01", Some(food.clone())),
            expense(5_678, "2024-02-01", Some(fun)),
            expense(910, "2024-03-01", Some(food)),
            expense(42, "2024-03-02", None),
            income(99_999, "2024-03-03"),
        ];

        let expense_total: i64 = transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Expense)
            .map(|t| t.amount.abs())
            .sum();
        let breakdown_total: i64 = ReportService::category_breakdown(&transactions)
            .iter()
            .map(|c| c.value)
            .sum();
        assert_eq!(breakdown_total, expense_total);
    }

    #[test]
    fn expense_percentage_guards_zero_total() {
        assert_eq!(ReportService::expense_percentage(0, 0), 0.0);
        assert_eq!(ReportService::expense_percentage(500, 0), 0.0);
    }

    #[test]
    fn expense_percentage_rounds_to_one_decimal() {
        assert_eq!(ReportService::expense_percentage(12_500, 50_000), 25.0);
        assert_eq!(ReportService::expense_percentage(1, 3), 33.3);
        assert_eq!(ReportService::expense_percentage(2, 3), 66.7);
    }

    #[test]
    fn budget_with_no_spend_reports_zero_actual() {
        let food = category(1, "Food", "#EF4444");
        let budgets = vec![budget(1, food, 30_000, 1, 2024)];

        let comparison = ReportService::budget_comparison(&[], &budgets, 1, 2024);
        assert_eq!(comparison.len(), 1);
        assert_eq!(comparison[0].actual, 0);
        assert!(comparison[0].is_under_budget());
        assert_eq!(comparison[0].difference(), 30_000);
    }

    #[test]
    fn budget_comparison_reports_current_month_spend() {
        let food = category(1, "Food", "#EF4444");
        let transactions = vec![
            expense(5_000, "2024-01-10", Some(food.clone())),
            expense(7_500, "2024-01-12", Some(food.clone())),
        ];
        let budgets = vec![budget(1, food, 30_000, 1, 2024)];

        let comparison = ReportService::budget_comparison(&transactions, &budgets, 1, 2024);
        assert_eq!(comparison.len(), 1);
        assert_eq!(comparison[0].category, "Food");
        assert_eq!(comparison[0].budgeted, 30_000);
        assert_eq!(comparison[0].actual, 12_500);
        assert_eq!(comparison[0].difference(), 17_500);
        assert!(comparison[0].is_under_budget());
    }

    #[test]
    fn spending_exactly_the_budget_counts_as_under() {
        let food = category(1, "Food", "#EF4444");
        let transactions = vec![expense(30_000, "2024-01-10", Some(food.clone()))];
        let budgets = vec![budget(1, food, 30_000, 1, 2024)];

        let comparison = ReportService::budget_comparison(&transactions, &budgets, 1, 2024);
        assert_eq!(comparison[0].difference(), 0);
        assert!(comparison[0].is_under_budget());
    }

    #[test]
    fn overspending_classifies_as_over_budget() {
        let food = category(1, "Food", "#EF4444");
        let transactions = vec![expense(45_000, "2024-01-10", Some(food.clone()))];
        let budgets = vec![budget(1, food, 30_000, 1, 2024)];

        let comparison = ReportService::budget_comparison(&transactions, &budgets, 1, 2024);
        assert_eq!(comparison[0].difference(), -15_000);
        assert!(!comparison[0].is_under_budget());
    }

    #[test]
    fn budget_comparison_scopes_to_the_reference_month() {
        let food = category(1, "Food", "#EF4444");
        let transactions = vec![
            expense(5_000, "2024-01-10", Some(food.clone())),
            // Different month and different year never count.
            expense(9_000, "2024-02-10", Some(food.clone())),
            expense(9_000, "2023-01-10", Some(food.clone())),
            // Income in the same category never counts.
            transaction(8_000, "2024-01-11", TransactionKind::Income, Some(food.clone())),
        ];
        let budgets = vec![
            budget(1, food.clone(), 30_000, 1, 2024),
            // Budget rows for other periods are filtered out.
            budget(2, food, 30_000, 2, 2024),
        ];

        let comparison = ReportService::budget_comparison(&transactions, &budgets, 1, 2024);
        assert_eq!(comparison.len(), 1);
        assert_eq!(comparison[0].actual, 5_000);
    }

    #[test]
    fn unbudgeted_spend_produces_no_row() {
        let food = category(1, "Food", "#EF4444");
        let fun = category(2, "Entertainment", "#EC4899");
        let transactions = vec![expense(5_000, "2024-01-10", Some(fun))];
        let budgets = vec![budget(1, food, 30_000, 1, 2024)];

        let comparison = ReportService::budget_comparison(&transactions, &budgets, 1, 2024);
        assert_eq!(comparison.len(), 1);
        assert_eq!(comparison[0].category, "Food");
        assert_eq!(comparison[0].actual, 0);
    }

    #[test]
    fn budget_without_category_snapshot_falls_back_to_unknown() {
        let budgets = vec![Budget {
            id: 1,
            category_id: 42,
            amount: 10_000,
            month: 6,
            year: 2024,
            category: None,
        }];

        let comparison = ReportService::budget_comparison(&[], &budgets, 6, 2024);
        assert_eq!(comparison[0].category, "Unknown");
        assert_eq!(comparison[0].color, DEFAULT_COLOR);
    }

    #[test]
    fn uncategorized_spend_never_matches_a_budget() {
        let food = category(1, "Food", "#EF4444");
        let transactions = vec![expense(5_000, "2024-01-10", None)];
        let budgets = vec![budget(1, food, 30_000, 1, 2024)];

        let comparison = ReportService::budget_comparison(&transactions, &budgets, 1, 2024);
        assert_eq!(comparison[0].actual, 0);
    }
}
