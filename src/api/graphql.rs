//! GraphQL surface over the same `AppService` as the REST routes.
//!
//! The caller identity comes from the same bearer token as REST and is
//! placed in the request data; transaction resolvers take no user id.

use std::sync::Arc;

use async_graphql::{
    Context, EmptySubscription, ErrorExtensions, Object, Schema, SimpleObject,
    http::GraphiQLSource,
};
use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse},
};
use chrono::NaiveDate;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use tracing::{debug, error};

use crate::app::{AppService, AppState};
use crate::domain::{
    AppError, AuthResponse, Caller, CreateTransactionRequest, DatabaseError, LoginRequest,
    PublicUser, SignupRequest, Transaction, TransactionType, ValidationError,
};

use super::error::public_error;
use super::extract::ApiJson;
use super::middleware::bearer_token;

pub type FinanceSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the schema with the service as shared context data.
#[must_use]
pub fn build_schema(service: Arc<AppService>) -> FinanceSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(service)
        .finish()
}

fn error_code(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "BAD_REQUEST",
        StatusCode::UNAUTHORIZED => "UNAUTHENTICATED",
        StatusCode::FORBIDDEN => "FORBIDDEN",
        StatusCode::NOT_FOUND => "NOT_FOUND",
        StatusCode::CONFLICT => "CONFLICT",
        _ => "INTERNAL_SERVER_ERROR",
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        let (status, _, message) = public_error(self);
        if status.is_server_error() {
            error!(error = %self, "GraphQL resolver failed");
        }
        let code = error_code(status);
        async_graphql::Error::new(message).extend_with(|_, ext| ext.set("code", code))
    }
}

fn service<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Arc<AppService>> {
    ctx.data::<Arc<AppService>>()
}

fn caller<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Caller> {
    ctx.data_opt::<Caller>()
        .ok_or_else(|| AppError::Authentication("Authentication required".to_string()).extend())
}

#[derive(SimpleObject)]
#[graphql(name = "User")]
pub struct GqlUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<PublicUser> for GqlUser {
    fn from(user: PublicUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "Transaction", rename_fields = "snake_case")]
pub struct GqlTransaction {
    pub id: String,
    pub user_id: String,
    #[graphql(name = "type")]
    pub kind: String,
    pub category_id: Option<String>,
    pub amount: f64,
    pub description: Option<String>,
    pub date: String,
    pub is_recurring: bool,
    pub created_at: String,
}

impl From<Transaction> for GqlTransaction {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            user_id: tx.user_id,
            kind: tx.kind.to_string(),
            category_id: tx.category_id,
            amount: tx.amount.to_f64().unwrap_or_default(),
            description: tx.description,
            date: tx.date.to_string(),
            is_recurring: tx.is_recurring,
            created_at: tx.created_at.to_rfc3339(),
        }
    }
}

#[derive(SimpleObject)]
pub struct AuthPayload {
    pub message: String,
    pub token: String,
    pub user: GqlUser,
}

impl From<AuthResponse> for AuthPayload {
    fn from(response: AuthResponse) -> Self {
        Self {
            message: response.message,
            token: response.token,
            user: response.user.into(),
        }
    }
}

fn into_gql(rows: Vec<Transaction>) -> Vec<GqlTransaction> {
    rows.into_iter().map(GqlTransaction::from).collect()
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn get_users(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<GqlUser>> {
        caller(ctx)?;
        let users = service(ctx)?.list_users().await.map_err(|e| e.extend())?;
        Ok(users.into_iter().map(GqlUser::from).collect())
    }

    /// `null` when no user has this id.
    async fn get_user(
        &self,
        ctx: &Context<'_>,
        id: String,
    ) -> async_graphql::Result<Option<GqlUser>> {
        caller(ctx)?;
        match service(ctx)?.get_user(&id).await {
            Ok(user) => Ok(Some(user.into())),
            Err(AppError::Database(DatabaseError::NotFound(_))) => Ok(None),
            Err(e) => Err(e.extend()),
        }
    }

    /// The caller's transactions, newest first.
    async fn get_transactions(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<GqlTransaction>> {
        let caller = caller(ctx)?;
        let rows = service(ctx)?
            .list_all_transactions(&caller.id)
            .await
            .map_err(|e| e.extend())?;
        Ok(into_gql(rows))
    }

    async fn get_income_transactions(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<GqlTransaction>> {
        let caller = caller(ctx)?;
        let rows = service(ctx)?
            .list_transactions_of_kind(&caller.id, TransactionType::Income)
            .await
            .map_err(|e| e.extend())?;
        Ok(into_gql(rows))
    }

    async fn get_expense_transactions(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<GqlTransaction>> {
        let caller = caller(ctx)?;
        let rows = service(ctx)?
            .list_transactions_of_kind(&caller.id, TransactionType::Expense)
            .await
            .map_err(|e| e.extend())?;
        Ok(into_gql(rows))
    }
}

pub struct MutationRoot;

#[Object(rename_args = "snake_case")]
impl MutationRoot {
    async fn signup_user(
        &self,
        ctx: &Context<'_>,
        name: String,
        email: String,
        password: String,
    ) -> async_graphql::Result<AuthPayload> {
        let response = service(ctx)?
            .signup(&SignupRequest::new(name, email, password))
            .await
            .map_err(|e| e.extend())?;
        Ok(response.into())
    }

    async fn login_user(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> async_graphql::Result<AuthPayload> {
        let response = service(ctx)?
            .login(&LoginRequest::new(email, password))
            .await
            .map_err(|e| e.extend())?;
        Ok(response.into())
    }

    #[allow(clippy::too_many_arguments)]
    async fn add_transaction(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "type")] kind: String,
        category_id: Option<String>,
        amount: f64,
        description: Option<String>,
        date: Option<String>,
        is_recurring: Option<bool>,
    ) -> async_graphql::Result<GqlTransaction> {
        let caller = caller(ctx)?;
        let request =
            transaction_request(kind, category_id, amount, description, date, is_recurring)
                .map_err(|e| e.extend())?;
        let created = service(ctx)?
            .create_transaction(&caller.id, &request)
            .await
            .map_err(|e| e.extend())?;
        Ok(created.into())
    }
}

fn transaction_request(
    kind: String,
    category_id: Option<String>,
    amount: f64,
    description: Option<String>,
    date: Option<String>,
    is_recurring: Option<bool>,
) -> Result<CreateTransactionRequest, AppError> {
    let kind: TransactionType = kind.parse()?;
    let amount = Decimal::try_from(amount)
        .map_err(|_| ValidationError::field("amount", "must be a finite number"))?;
    let date = date
        .map(|raw| {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|_| ValidationError::field("date", "expected YYYY-MM-DD"))
        })
        .transpose()?;

    let mut request = CreateTransactionRequest::new(kind, amount);
    request.category_id = category_id;
    request.description = description;
    request.date = date;
    request.is_recurring = is_recurring.unwrap_or(false);
    Ok(request)
}

/// Executes a GraphQL request, attaching the caller when the bearer token verifies.
pub async fn graphql_handler(
    State(state): State<Arc<AppState>>,
    Extension(schema): Extension<FinanceSchema>,
    headers: HeaderMap,
    ApiJson(request): ApiJson<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    let mut request = request;
    if let Some(token) = bearer_token(&headers) {
        match state.auth.verify_token(token) {
            Ok(caller) => request = request.data(caller),
            Err(e) => debug!(error = %e, "GraphQL request with unusable token"),
        }
    }
    Json(schema.execute(request).await)
}

/// GraphiQL IDE.
pub async fn graphiql_handler() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
