//! Savings goal use cases.

use rust_decimal::Decimal;
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::types::{ensure_non_negative, ensure_positive};
use crate::domain::{
    AppError, ContributionRequest, CreateSavingsGoalRequest, NewSavingsGoal, SavingsGoal,
    SavingsGoalChanges, UpdateSavingsGoalRequest, is_goal_achieved, new_id,
};

use super::AppService;

impl AppService {
    #[instrument(skip(self))]
    pub async fn list_savings_goals(&self, user_id: &str) -> Result<Vec<SavingsGoal>, AppError> {
        self.db.list_savings_goals(user_id).await
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_savings_goal(
        &self,
        user_id: &str,
        request: &CreateSavingsGoalRequest,
    ) -> Result<SavingsGoal, AppError> {
        request.validate()?;
        let target_amount = ensure_positive("target_amount", request.target_amount)?;
        let current_amount = ensure_non_negative(
            "current_amount",
            request.current_amount.unwrap_or(Decimal::ZERO),
        )?;

        let data = NewSavingsGoal {
            id: new_id("sav"),
            user_id: user_id.to_string(),
            name: request.name.trim().to_string(),
            target_amount,
            current_amount,
            target_date: request.target_date,
            is_achieved: is_goal_achieved(current_amount, target_amount),
        };
        let goal = self.db.create_savings_goal(&data).await?;
        info!(goal_id = %goal.id, "Savings goal created");
        Ok(goal)
    }

    #[instrument(skip(self, request))]
    pub async fn update_savings_goal(
        &self,
        user_id: &str,
        id: &str,
        request: &UpdateSavingsGoalRequest,
    ) -> Result<SavingsGoal, AppError> {
        request.validate()?;
        let changes = SavingsGoalChanges {
            name: request.name.as_ref().map(|name| name.trim().to_string()),
            target_amount: request
                .target_amount
                .map(|amount| ensure_positive("target_amount", amount))
                .transpose()?,
            current_amount: request
                .current_amount
                .map(|amount| ensure_non_negative("current_amount", amount))
                .transpose()?,
            target_date: request.target_date,
        };
        self.db
            .update_savings_goal(user_id, id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found("Savings goal not found"))
    }

    /// Adds money to a goal.
    #[instrument(skip(self, request))]
    pub async fn add_contribution(
        &self,
        user_id: &str,
        id: &str,
        request: &ContributionRequest,
    ) -> Result<SavingsGoal, AppError> {
        let amount = ensure_positive("amount", request.amount)?;
        let goal = self
            .db
            .add_contribution(user_id, id, amount)
            .await?
            .ok_or_else(|| AppError::not_found("Savings goal not found"))?;
        if goal.is_achieved {
            info!(goal_id = %goal.id, "Savings goal achieved");
        }
        Ok(goal)
    }

    #[instrument(skip(self))]
    pub async fn delete_savings_goal(&self, user_id: &str, id: &str) -> Result<(), AppError> {
        if self.db.delete_savings_goal(user_id, id).await? {
            info!(goal_id = %id, "Savings goal deleted");
            Ok(())
        } else {
            Err(AppError::not_found("Savings goal not found"))
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::{
        AppError, ContributionRequest, CreateSavingsGoalRequest, DatabaseError,
        UpdateSavingsGoalRequest,
    };
    use crate::test_utils::TestContext;

    fn goal(target: i64, current: Option<i64>) -> CreateSavingsGoalRequest {
        CreateSavingsGoalRequest {
            name: "Bike".to_string(),
            target_amount: Decimal::new(target, 0),
            current_amount: current.map(|c| Decimal::new(c, 0)),
            target_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_goal_defaults_current_amount() {
        let ctx = TestContext::new();
        let ada = ctx.signup("ada@example.com").await;

        let created = ctx.service.create_savings_goal(&ada.id, &goal(500, None)).await.unwrap();
        assert_eq!(created.current_amount, Decimal::ZERO);
        assert!(!created.is_achieved);
        assert!(created.id.starts_with("sav_"));
    }

    #[tokio::test]
    async fn test_create_goal_already_achieved() {
        let ctx = TestContext::new();
        let ada = ctx.signup("ada@example.com").await;

        let created = ctx
            .service
            .create_savings_goal(&ada.id, &goal(500, Some(500)))
            .await
            .unwrap();
        assert!(created.is_achieved);
    }

    #[tokio::test]
    async fn test_create_goal_rejects_bad_amounts() {
        let ctx = TestContext::new();
        let ada = ctx.signup("ada@example.com").await;

        let result = ctx.service.create_savings_goal(&ada.id, &goal(0, None)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = ctx.service.create_savings_goal(&ada.id, &goal(10, Some(-1))).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_recomputes_achievement() {
        let ctx = TestContext::new();
        let ada = ctx.signup("ada@example.com").await;
        let created = ctx
            .service
            .create_savings_goal(&ada.id, &goal(500, Some(400)))
            .await
            .unwrap();

        let lower_target = UpdateSavingsGoalRequest {
            target_amount: Some(Decimal::new(400, 0)),
            ..Default::default()
        };
        let updated = ctx
            .service
            .update_savings_goal(&ada.id, &created.id, &lower_target)
            .await
            .unwrap();
        assert!(updated.is_achieved);

        let raise_target = UpdateSavingsGoalRequest {
            target_amount: Some(Decimal::new(1000, 0)),
            ..Default::default()
        };
        let updated = ctx
            .service
            .update_savings_goal(&ada.id, &created.id, &raise_target)
            .await
            .unwrap();
        assert!(!updated.is_achieved);
    }

    #[tokio::test]
    async fn test_contributions_reach_target() {
        let ctx = TestContext::new();
        let ada = ctx.signup("ada@example.com").await;
        let created = ctx.service.create_savings_goal(&ada.id, &goal(100, None)).await.unwrap();

        let half = ContributionRequest {
            amount: Decimal::new(50, 0),
        };
        let after_one = ctx
            .service
            .add_contribution(&ada.id, &created.id, &half)
            .await
            .unwrap();
        assert!(!after_one.is_achieved);

        let after_two = ctx
            .service
            .add_contribution(&ada.id, &created.id, &half)
            .await
            .unwrap();
        assert!(after_two.is_achieved);
        assert_eq!(after_two.current_amount.to_string(), "100.00");

        let negative = ContributionRequest {
            amount: Decimal::new(-5, 0),
        };
        let result = ctx.service.add_contribution(&ada.id, &created.id, &negative).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_contribution_past_column_limit_is_rejected() {
        let ctx = TestContext::new();
        let ada = ctx.signup("ada@example.com").await;
        let created = ctx
            .service
            .create_savings_goal(&ada.id, &goal(100, Some(9_999_999_999)))
            .await
            .unwrap();

        let contribution = ContributionRequest {
            amount: Decimal::ONE,
        };
        let result = ctx
            .service
            .add_contribution(&ada.id, &created.id, &contribution)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let stored = ctx.service.list_savings_goals(&ada.id).await.unwrap();
        assert_eq!(stored[0].current_amount.to_string(), "9999999999.00");
    }

    #[tokio::test]
    async fn test_goals_are_owner_scoped() {
        let ctx = TestContext::new();
        let ada = ctx.signup("ada@example.com").await;
        let bob = ctx.signup("bob@example.com").await;
        let created = ctx.service.create_savings_goal(&ada.id, &goal(100, None)).await.unwrap();

        assert!(ctx.service.list_savings_goals(&bob.id).await.unwrap().is_empty());
        let contribution = ContributionRequest {
            amount: Decimal::ONE,
        };
        assert!(matches!(
            ctx.service
                .add_contribution(&bob.id, &created.id, &contribution)
                .await,
            Err(AppError::Database(DatabaseError::NotFound(_)))
        ));
        assert!(matches!(
            ctx.service.delete_savings_goal(&bob.id, &created.id).await,
            Err(AppError::Database(DatabaseError::NotFound(_)))
        ));

        ctx.service.delete_savings_goal(&ada.id, &created.id).await.unwrap();
        assert!(ctx.service.list_savings_goals(&ada.id).await.unwrap().is_empty());
    }
}
