//! Category use cases.

use tracing::{info, instrument};
use validator::Validate;

use crate::domain::category::parse_color;
use crate::domain::{
    AppError, Category, CategoryChanges, CategoryQuery, CreateCategoryRequest, DatabaseError,
    DEFAULT_CATEGORY_COLOR, NewCategory, UpdateCategoryRequest, new_id,
};

use super::{AppService, invalid};

impl AppService {
    /// Defaults plus the caller's own categories.
    #[instrument(skip(self))]
    pub async fn list_categories(
        &self,
        user_id: &str,
        query: &CategoryQuery,
    ) -> Result<Vec<Category>, AppError> {
        self.db.list_categories(user_id, query.kind).await
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_category(
        &self,
        user_id: &str,
        request: &CreateCategoryRequest,
    ) -> Result<Category, AppError> {
        request.validate()?;
        let color = match &request.color {
            Some(color) => parse_color(color)?,
            None => DEFAULT_CATEGORY_COLOR.to_string(),
        };

        let data = NewCategory {
            id: new_id("cat"),
            user_id: user_id.to_string(),
            name: request.name.trim().to_string(),
            kind: request.kind,
            color,
        };
        let category = self.db.create_category(&data).await?;
        info!(category_id = %category.id, "Category created");
        Ok(category)
    }

    /// Default categories are shared and never match here.
    #[instrument(skip(self, request))]
    pub async fn update_category(
        &self,
        user_id: &str,
        id: &str,
        request: &UpdateCategoryRequest,
    ) -> Result<Category, AppError> {
        request.validate()?;
        let changes = CategoryChanges {
            name: request.name.as_ref().map(|name| name.trim().to_string()),
            color: request.color.as_deref().map(parse_color).transpose()?,
        };
        self.db
            .update_category(user_id, id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found("Category not found"))
    }

    #[instrument(skip(self))]
    pub async fn delete_category(&self, user_id: &str, id: &str) -> Result<(), AppError> {
        match self.db.delete_category(user_id, id).await {
            Ok(true) => {
                info!(category_id = %id, "Category deleted");
                Ok(())
            }
            Ok(false) => Err(AppError::not_found("Category not found")),
            Err(AppError::Database(DatabaseError::ForeignKey(_))) => Err(invalid(
                "id",
                "category is still used by transactions",
            )),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::{
        AppError, CategoryQuery, CreateCategoryRequest, CreateTransactionRequest, DatabaseError,
        TransactionType, UpdateCategoryRequest,
    };
    use crate::test_utils::{GROCERIES_CATEGORY_ID, TestContext};

    fn request(name: &str) -> CreateCategoryRequest {
        CreateCategoryRequest {
            name: name.to_string(),
            kind: TransactionType::Expense,
            color: None,
        }
    }

    #[tokio::test]
    async fn test_create_category_defaults_color() {
        let ctx = TestContext::new();
        let ada = ctx.signup("ada@example.com").await;

        let category = ctx.service.create_category(&ada.id, &request("Books")).await.unwrap();
        assert_eq!(category.color, "#6366f1");
        assert!(!category.is_default);
        assert_eq!(category.user_id.as_deref(), Some(ada.id.as_str()));
    }

    #[tokio::test]
    async fn test_create_category_rejects_bad_color() {
        let ctx = TestContext::new();
        let ada = ctx.signup("ada@example.com").await;

        let mut bad = request("Books");
        bad.color = Some("blue".to_string());
        let result = ctx.service.create_category(&ada.id, &bad).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_puts_defaults_first_and_hides_other_users() {
        let ctx = TestContext::new();
        let ada = ctx.signup("ada@example.com").await;
        let bob = ctx.signup("bob@example.com").await;
        ctx.service.create_category(&ada.id, &request("Aardvarks")).await.unwrap();
        ctx.service.create_category(&bob.id, &request("Bob only")).await.unwrap();

        let categories = ctx
            .service
            .list_categories(&ada.id, &CategoryQuery::default())
            .await
            .unwrap();
        assert!(categories[0].is_default);
        assert_eq!(categories.last().unwrap().name, "Aardvarks");
        assert!(categories.iter().all(|c| c.name != "Bob only"));

        let income_only = ctx
            .service
            .list_categories(
                &ada.id,
                &CategoryQuery {
                    kind: Some(TransactionType::Income),
                },
            )
            .await
            .unwrap();
        assert!(income_only.iter().all(|c| c.kind == TransactionType::Income));
    }

    #[tokio::test]
    async fn test_default_categories_are_immutable() {
        let ctx = TestContext::new();
        let ada = ctx.signup("ada@example.com").await;

        let update = UpdateCategoryRequest {
            name: Some("Mine now".to_string()),
            color: None,
        };
        let result = ctx
            .service
            .update_category(&ada.id, GROCERIES_CATEGORY_ID, &update)
            .await;
        assert!(matches!(
            result,
            Err(AppError::Database(DatabaseError::NotFound(_)))
        ));

        let result = ctx.service.delete_category(&ada.id, GROCERIES_CATEGORY_ID).await;
        assert!(matches!(
            result,
            Err(AppError::Database(DatabaseError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_delete_category_in_use_is_rejected() {
        let ctx = TestContext::new();
        let ada = ctx.signup("ada@example.com").await;
        let category = ctx.service.create_category(&ada.id, &request("Books")).await.unwrap();
        let txn = CreateTransactionRequest::new(TransactionType::Expense, Decimal::TEN)
            .with_category(category.id.clone());
        ctx.service.create_transaction(&ada.id, &txn).await.unwrap();

        let result = ctx.service.delete_category(&ada.id, &category.id).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_then_delete_own_category() {
        let ctx = TestContext::new();
        let ada = ctx.signup("ada@example.com").await;
        let category = ctx.service.create_category(&ada.id, &request("Books")).await.unwrap();

        let update = UpdateCategoryRequest {
            name: None,
            color: Some("#FF0000".to_string()),
        };
        let updated = ctx
            .service
            .update_category(&ada.id, &category.id, &update)
            .await
            .unwrap();
        assert_eq!(updated.color, "#ff0000");
        assert_eq!(updated.name, "Books");

        ctx.service.delete_category(&ada.id, &category.id).await.unwrap();
        let again = ctx.service.delete_category(&ada.id, &category.id).await;
        assert!(matches!(
            again,
            Err(AppError::Database(DatabaseError::NotFound(_)))
        ));
    }
}
