//! Transaction use cases.

use chrono::Utc;
use tracing::{info, instrument};

use crate::domain::types::ensure_positive;
use crate::domain::{
    AppError, CreateTransactionRequest, NewTransaction, PeriodQuery, Transaction,
    TransactionChanges, TransactionFilter, TransactionQuery, TransactionType,
    UpdateTransactionRequest, new_id,
};

use super::{AppService, invalid};

impl AppService {
    #[instrument(skip(self, query))]
    pub async fn list_transactions(
        &self,
        user_id: &str,
        query: TransactionQuery,
    ) -> Result<Vec<Transaction>, AppError> {
        let filter = TransactionFilter::try_from(query)?;
        self.db.list_transactions(user_id, &filter).await
    }

    /// Every transaction the user owns, newest first and without a page limit.
    #[instrument(skip(self))]
    pub async fn list_all_transactions(
        &self,
        user_id: &str,
    ) -> Result<Vec<Transaction>, AppError> {
        self.db
            .list_transactions(user_id, &TransactionFilter::default())
            .await
    }

    /// Every transaction of one kind, newest first.
    #[instrument(skip(self))]
    pub async fn list_transactions_of_kind(
        &self,
        user_id: &str,
        kind: TransactionType,
    ) -> Result<Vec<Transaction>, AppError> {
        self.db
            .list_transactions(user_id, &TransactionFilter::of_kind(kind))
            .await
    }

    #[instrument(skip(self, request), fields(kind = %request.kind))]
    pub async fn create_transaction(
        &self,
        user_id: &str,
        request: &CreateTransactionRequest,
    ) -> Result<Transaction, AppError> {
        let amount = ensure_positive("amount", request.amount)?;
        if let Some(category_id) = &request.category_id {
            self.ensure_category_visible(user_id, category_id).await?;
        }

        let data = NewTransaction {
            id: new_id("txn"),
            user_id: user_id.to_string(),
            kind: request.kind,
            category_id: request.category_id.clone(),
            amount,
            description: request.description.clone(),
            date: request.date.unwrap_or_else(|| Utc::now().date_naive()),
            is_recurring: request.is_recurring,
        };
        let transaction = self.db.create_transaction(&data).await?;
        info!(transaction_id = %transaction.id, "Transaction created");
        Ok(transaction)
    }

    #[instrument(skip(self, request))]
    pub async fn update_transaction(
        &self,
        user_id: &str,
        id: &str,
        request: &UpdateTransactionRequest,
    ) -> Result<Transaction, AppError> {
        let amount = request
            .amount
            .map(|amount| ensure_positive("amount", amount))
            .transpose()?;
        if let Some(category_id) = &request.category_id {
            self.ensure_category_visible(user_id, category_id).await?;
        }

        let changes = TransactionChanges {
            category_id: request.category_id.clone(),
            amount,
            description: request.description.clone(),
            date: request.date,
            is_recurring: request.is_recurring,
        };
        self.db
            .update_transaction(user_id, id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found("Transaction not found"))
    }

    #[instrument(skip(self))]
    pub async fn delete_transaction(&self, user_id: &str, id: &str) -> Result<(), AppError> {
        if self.db.delete_transaction(user_id, id).await? {
            info!(transaction_id = %id, "Transaction deleted");
            Ok(())
        } else {
            Err(AppError::not_found("Transaction not found"))
        }
    }

    /// Income and expense totals for one month, as computed by the store.
    #[instrument(skip(self))]
    pub async fn monthly_summary(
        &self,
        user_id: &str,
        period: &PeriodQuery,
    ) -> Result<Vec<serde_json::Value>, AppError> {
        let (month, year) = period.resolve()?;
        self.db.monthly_summary(user_id, month, year).await
    }

    pub(crate) async fn ensure_category_visible(
        &self,
        user_id: &str,
        category_id: &str,
    ) -> Result<(), AppError> {
        match self.db.find_category(user_id, category_id).await? {
            Some(_) => Ok(()),
            None => Err(invalid(
                "category_id",
                format!("category '{}' does not exist", category_id),
            )),
        }
    }
}
