use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse},
};
use categories::models::Category;
use categories::service::CategoryService;
use chrono::Datelike;
use common::AppState;
use reports::ReportService;
use std::sync::Arc;
use transactions::handler::TransactionRowView;
use transactions::service::{TransactionError, TransactionService};

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub overview: OverviewView,
    pub monthly: Vec<MonthlyBarView>,
    pub breakdown: Vec<CategorySliceView>,
    pub budget_rows: Vec<BudgetRowView>,
    pub has_budgets: bool,
    pub current_month_display: String,
    pub current_month: u32,
    pub current_year: i32,
    pub months: Vec<MonthOptionView>,
    pub categories: Vec<CategoryOptionView>,
    pub expense_categories: Vec<CategoryOptionView>,
    pub transactions: Vec<TransactionRowView>,
    pub today: String,
}

pub struct OverviewView {
    pub total_income: String,
    pub total_expenses: String,
    pub net_balance: String,
    pub net_is_positive: bool,
    pub transaction_count: usize,
}

pub struct MonthlyBarView {
    pub label: String,
    pub income_dollars: String,
    pub expenses_dollars: String,
    pub income_pct: String,
    pub expenses_pct: String,
}

pub struct CategorySliceView {
    pub name: String,
    pub icon: String,
    pub color: String,
    pub value_dollars: String,
    pub percent: String,
}

pub struct BudgetRowView {
    pub category: String,
    pub color: String,
    pub budgeted_dollars: String,
    pub actual_dollars: String,
    pub difference_dollars: String,
    pub is_under: bool,
    pub spent_pct: String,
}

pub struct MonthOptionView {
    pub number: u32,
    pub name: String,
}

pub struct CategoryOptionView {
    pub id: i64,
    pub name: String,
    pub icon: String,
    pub kind: String,
}

impl From<&Category> for CategoryOptionView {
    fn from(c: &Category) -> Self {
        CategoryOptionView {
            id: c.id,
            name: c.name.clone(),
            icon: c.icon.clone().unwrap_or_default(),
            kind: if c.kind.is_income() { "income" } else { "expense" }.to_string(),
        }
    }
}

fn dollars(cents: i64) -> String {
    format!("{:.2}", cents as f64 / 100.0)
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, TransactionError> {
    let transactions = TransactionService::list_transactions(&state.db).await?;
    let budgets = CategoryService::list_budgets(&state.db)
        .await
        .map_err(|e| TransactionError::Infrastructure(e.to_string()))?;
    let all_categories = CategoryService::list_categories(&state.db)
        .await
        .map_err(|e| TransactionError::Infrastructure(e.to_string()))?;

    // The reporting layer takes the reference month explicitly; the
    // wall clock is consulted only here.
    let today = chrono::Local::now().date_naive();
    let (current_month, current_year) = (today.month(), today.year());

    let totals = ReportService::calculate_totals(&transactions);
    let net = totals.net();
    let overview = OverviewView {
        total_income: dollars(totals.total_income),
        total_expenses: dollars(totals.total_expenses),
        net_balance: dollars(net.abs()),
        net_is_positive: net >= 0,
        transaction_count: transactions.len(),
    };

    let series = ReportService::monthly_series(&transactions);
    let scale = series
        .iter()
        .map(|m| m.income.max(m.expenses))
        .max()
        .unwrap_or(0);
    let monthly = series
        .iter()
        .map(|m| MonthlyBarView {
            label: m.month.clone(),
            income_dollars: dollars(m.income),
            expenses_dollars: dollars(m.expenses),
            income_pct: bar_height(m.income, scale),
            expenses_pct: bar_height(m.expenses, scale),
        })
        .collect();

    let slices = ReportService::category_breakdown(&transactions);
    let expense_total: i64 = slices.iter().map(|s| s.value).sum();
    let breakdown = slices
        .iter()
        .map(|s| CategorySliceView {
            name: s.name.clone(),
            icon: s.icon.clone().unwrap_or_default(),
            color: s.color.clone(),
            value_dollars: dollars(s.value),
            percent: format!(
                "{:.1}",
                ReportService::expense_percentage(s.value, expense_total)
            ),
        })
        .collect();

    let comparison =
        ReportService::budget_comparison(&transactions, &budgets, current_month, current_year);
    let budget_rows: Vec<BudgetRowView> = comparison
        .iter()
        .map(|row| BudgetRowView {
            category: row.category.clone(),
            color: row.color.clone(),
            budgeted_dollars: dollars(row.budgeted),
            actual_dollars: dollars(row.actual),
            difference_dollars: dollars(row.difference().abs()),
            is_under: row.is_under_budget(),
            spent_pct: bar_height(row.actual.min(row.budgeted), row.budgeted),
        })
        .collect();
    let has_budgets = !budget_rows.is_empty();

    let categories: Vec<CategoryOptionView> =
        all_categories.iter().map(CategoryOptionView::from).collect();
    let expense_categories: Vec<CategoryOptionView> = all_categories
        .iter()
        .filter(|c| !c.kind.is_income())
        .map(CategoryOptionView::from)
        .collect();

    let transaction_rows: Vec<TransactionRowView> =
        transactions.iter().map(TransactionRowView::from).collect();

    let months = (1..=12u32)
        .filter_map(|number| {
            chrono::NaiveDate::from_ymd_opt(2000, number, 1).map(|d| MonthOptionView {
                number,
                name: d.format("%B").to_string(),
            })
        })
        .collect();

    let template = DashboardTemplate {
        overview,
        monthly,
        breakdown,
        budget_rows,
        has_budgets,
        current_month_display: today.format("%B %Y").to_string(),
        current_month,
        current_year,
        months,
        categories,
        expense_categories,
        transactions: transaction_rows,
        today: today.format("%Y-%m-%d").to_string(),
    };

    Ok(Html(template.render().map_err(|e| {
        TransactionError::Infrastructure(e.to_string())
    })?))
}

/// Bar height as an integer percentage of the chart scale.
fn bar_height(value: i64, scale: i64) -> String {
    if scale == 0 {
        return "0".to_string();
    }
    format!("{:.0}", value as f64 / scale as f64 * 100.0)
}
