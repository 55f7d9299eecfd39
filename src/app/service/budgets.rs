//! Budget use cases.

use tracing::{info, instrument};

use crate::domain::types::ensure_positive;
use crate::domain::{
    AppError, Budget, BudgetStatusRow, CreateBudgetRequest, DatabaseError, NewBudget,
    PeriodQuery, UpdateBudgetRequest, new_id,
};

use super::AppService;

impl AppService {
    #[instrument(skip(self))]
    pub async fn list_budgets(
        &self,
        user_id: &str,
        period: &PeriodQuery,
    ) -> Result<Vec<Budget>, AppError> {
        let (month, year) = period.resolve()?;
        self.db.list_budgets(user_id, month, year).await
    }

    /// Spend against each budget of the month. No budgets yields an empty list.
    #[instrument(skip(self))]
    pub async fn budget_status(
        &self,
        user_id: &str,
        period: &PeriodQuery,
    ) -> Result<Vec<BudgetStatusRow>, AppError> {
        let (month, year) = period.resolve()?;
        self.db.budget_status(user_id, month, year).await
    }

    #[instrument(skip(self, request), fields(category_id = %request.category_id))]
    pub async fn create_budget(
        &self,
        user_id: &str,
        request: &CreateBudgetRequest,
    ) -> Result<Budget, AppError> {
        let amount = ensure_positive("amount", request.amount)?;
        let (month, year) = PeriodQuery::new(request.month, request.year).resolve()?;
        self.ensure_category_visible(user_id, &request.category_id)
            .await?;

        let data = NewBudget {
            id: new_id("bud"),
            user_id: user_id.to_string(),
            category_id: request.category_id.clone(),
            amount,
            month,
            year,
        };
        let budget = self.db.create_budget(&data).await.map_err(|e| match e {
            AppError::Database(DatabaseError::Duplicate(_)) => AppError::Database(
                DatabaseError::Duplicate(
                    "A budget already exists for this category and month".to_string(),
                ),
            ),
            other => other,
        })?;
        info!(budget_id = %budget.id, "Budget created");
        Ok(budget)
    }

    #[instrument(skip(self, request))]
    pub async fn update_budget(
        &self,
        user_id: &str,
        id: &str,
        request: &UpdateBudgetRequest,
    ) -> Result<Budget, AppError> {
        let amount = ensure_positive("amount", request.amount)?;
        self.db
            .update_budget(user_id, id, amount)
            .await?
            .ok_or_else(|| AppError::not_found("Budget not found"))
    }

    #[instrument(skip(self))]
    pub async fn delete_budget(&self, user_id: &str, id: &str) -> Result<(), AppError> {
        if self.db.delete_budget(user_id, id).await? {
            info!(budget_id = %id, "Budget deleted");
            Ok(())
        } else {
            Err(AppError::not_found("Budget not found"))
        }
    }
}
