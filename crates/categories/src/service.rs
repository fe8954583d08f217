use crate::budget_repository::BudgetRepository;
use crate::models::{Budget, Category, CategoryKind, CreateCategoryRequest, SetBudgetRequest};
use crate::repository::CategoryRepository;
use database::{Database, RepositoryError};
use rand::seq::SliceRandom;
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Database error: {0}")]
    Infrastructure(String),
    #[error("Category already exists: {0}")]
    Conflict(String),
    #[error("Category not found")]
    NotFound,
}

impl From<RepositoryError> for CategoryError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => CategoryError::NotFound,
            RepositoryError::UniqueViolation(msg) => CategoryError::Conflict(msg),
            RepositoryError::Infrastructure(e) => CategoryError::Infrastructure(e.to_string()),
            _ => CategoryError::Infrastructure(err.to_string()),
        }
    }
}

pub struct CategoryService;

impl CategoryService {
    fn get_random_pastel_color() -> String {
        let colors = vec![
            "#FFB3BA", "#FFDFBA", "#FFFFBA", "#BAFFC9", "#BAE1FF", "#E2F0CB", "#FDFD96",
            "#FFC3A0", "#FFD1DC", "#D4F0F0", "#CCE2CB", "#B6CFB6", "#97C1A9", "#FCB7AF",
            "#FFDAC1", "#E7FFAC", "#FFABAB", "#D5AAFF", "#85E3FF", "#B9F6CA",
        ];
        let mut rng = rand::thread_rng();
        colors.choose(&mut rng).unwrap_or(&"#FFFFFF").to_string()
    }

    #[instrument(skip(db))]
    pub async fn create_category(
        db: &Database,
        name: String,
        icon: Option<String>,
        kind: Option<CategoryKind>,
    ) -> Result<i64, CategoryError> {
        let color = Self::get_random_pastel_color();
        let req = CreateCategoryRequest::new(name, color, icon, kind)
            .map_err(CategoryError::InvalidInput)?;

        let mut uow = db.begin().await.map_err(RepositoryError::from)?;
        let mut repo = CategoryRepository::new(uow.connection());

        let id = repo.create(&req).await?;

        uow.commit().await.map_err(RepositoryError::from)?;

        Ok(id)
    }

    #[instrument(skip(db))]
    pub async fn delete_category(db: &Database, id: i64) -> Result<(), CategoryError> {
        let mut uow = db.begin().await.map_err(RepositoryError::from)?;
        let mut repo = CategoryRepository::new(uow.connection());

        repo.delete(id).await?;

        uow.commit().await.map_err(RepositoryError::from)?;
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn list_categories(db: &Database) -> Result<Vec<Category>, CategoryError> {
        let mut uow = db.begin().await.map_err(RepositoryError::from)?;
        let mut repo = CategoryRepository::new(uow.connection());

        let categories = repo.list().await?;

        Ok(categories)
    }

    #[instrument(skip(db))]
    pub async fn get_category(db: &Database, id: i64) -> Result<Category, CategoryError> {
        let mut uow = db.begin().await.map_err(RepositoryError::from)?;
        let mut repo = CategoryRepository::new(uow.connection());

        let category = repo.find_by_id(id).await?.ok_or(CategoryError::NotFound)?;

        Ok(category)
    }

    /// Upsert the budget for one (category, month, year) and return the
    /// stored row with its category snapshot.
    #[instrument(skip(db))]
    pub async fn set_budget(
        db: &Database,
        category_id: i64,
        amount_dollars: f64,
        month: u32,
        year: i32,
    ) -> Result<Budget, CategoryError> {
        let req = SetBudgetRequest::new(category_id, amount_dollars, month, year)
            .map_err(CategoryError::InvalidInput)?;

        let mut uow = db.begin().await.map_err(RepositoryError::from)?;
        let mut repo = BudgetRepository::new(uow.connection());

        let id = repo.upsert(&req).await?;
        let budget = repo.find_by_id(id).await?.ok_or(CategoryError::NotFound)?;

        uow.commit().await.map_err(RepositoryError::from)?;
        Ok(budget)
    }

    #[instrument(skip(db))]
    pub async fn list_budgets(db: &Database) -> Result<Vec<Budget>, CategoryError> {
        let mut uow = db.begin().await.map_err(RepositoryError::from)?;
        let mut repo = BudgetRepository::new(uow.connection());

        let budgets = repo.list_all().await?;

        Ok(budgets)
    }

    #[instrument(skip(db))]
    pub async fn budgets_for_period(
        db: &Database,
        month: u32,
        year: i32,
    ) -> Result<Vec<Budget>, CategoryError> {
        let mut uow = db.begin().await.map_err(RepositoryError::from)?;
        let mut repo = BudgetRepository::new(uow.connection());

        let budgets = repo.list_for_period(month, year).await?;

        Ok(budgets)
    }
}
