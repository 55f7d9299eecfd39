//! GraphQL requests through the full router.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

use finance_api::api::create_router;
use finance_api::domain::{CreateTransactionRequest, TransactionType};
use finance_api::test_utils::{GROCERIES_CATEGORY_ID, TestContext};

async fn graphql(router: &Router, token: Option<&str>, query: &str) -> Value {
    let mut builder = Request::post("/graphql").header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = builder
        .body(Body::from(json!({ "query": query }).to_string()))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn error_code(response: &Value) -> &str {
    response["errors"][0]["extensions"]["code"].as_str().unwrap()
}

#[tokio::test]
async fn test_graphiql_page_is_served() {
    let router = create_router(TestContext::new().state());
    let response = router
        .oneshot(Request::get("/graphql").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&bytes).contains("graphiql"));
}

#[tokio::test]
async fn test_signup_then_add_and_query_transactions() {
    let router = create_router(TestContext::new().state());

    let signup = graphql(
        &router,
        None,
        r#"mutation { signupUser(name: "Ada", email: "ada@x.com", password: "pw") { token user { id email } } }"#,
    )
    .await;
    assert!(signup.get("errors").is_none(), "{}", signup);
    let token = signup["data"]["signupUser"]["token"].as_str().unwrap().to_string();

    let add = format!(
        r#"mutation {{ addTransaction(type: "expense", category_id: "{}", amount: 12.5, date: "2024-03-01") {{ id type amount date category_id }} }}"#,
        GROCERIES_CATEGORY_ID
    );
    let added = graphql(&router, Some(&token), &add).await;
    assert!(added.get("errors").is_none(), "{}", added);
    assert_eq!(added["data"]["addTransaction"]["type"], "expense");
    assert_eq!(added["data"]["addTransaction"]["amount"], 12.5);
    assert_eq!(added["data"]["addTransaction"]["date"], "2024-03-01");

    let listed = graphql(
        &router,
        Some(&token),
        "{ getTransactions { id } getExpenseTransactions { id } getIncomeTransactions { id } }",
    )
    .await;
    assert_eq!(listed["data"]["getTransactions"].as_array().unwrap().len(), 1);
    assert_eq!(
        listed["data"]["getExpenseTransactions"].as_array().unwrap().len(),
        1
    );
    assert!(
        listed["data"]["getIncomeTransactions"]
            .as_array()
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_errors_carry_codes() {
    let ctx = TestContext::new();
    let router = create_router(ctx.state());
    let caller = ctx.signup("ada@x.com").await;
    let token = ctx.token_for(&caller);

    let unauthenticated = graphql(&router, None, "{ getTransactions { id } }").await;
    assert_eq!(error_code(&unauthenticated), "UNAUTHENTICATED");

    let bad_token = graphql(&router, Some("garbage"), "{ getUsers { id } }").await;
    assert_eq!(error_code(&bad_token), "UNAUTHENTICATED");

    let duplicate = graphql(
        &router,
        None,
        r#"mutation { signupUser(name: "Ada", email: "ada@x.com", password: "pw") { token } }"#,
    )
    .await;
    assert_eq!(error_code(&duplicate), "CONFLICT");

    let bad_login = graphql(
        &router,
        None,
        r#"mutation { loginUser(email: "ada@x.com", password: "nope") { token } }"#,
    )
    .await;
    assert_eq!(error_code(&bad_login), "UNAUTHENTICATED");

    let bad_type = graphql(
        &router,
        Some(&token),
        r#"mutation { addTransaction(type: "transfer", amount: 1) { id } }"#,
    )
    .await;
    assert_eq!(error_code(&bad_type), "BAD_REQUEST");
}

#[tokio::test]
async fn test_get_user_by_id() {
    let ctx = TestContext::new();
    let router = create_router(ctx.state());
    let caller = ctx.signup("ada@x.com").await;
    let token = ctx.token_for(&caller);

    let found = graphql(
        &router,
        Some(&token),
        &format!(r#"{{ getUser(id: "{}") {{ email }} }}"#, caller.id),
    )
    .await;
    assert_eq!(found["data"]["getUser"]["email"], "ada@x.com");

    let missing = graphql(&router, Some(&token), r#"{ getUser(id: "usr_nope") { email } }"#).await;
    assert!(missing["data"]["getUser"].is_null());
}

#[tokio::test]
async fn test_get_transactions_returns_every_row() {
    let ctx = TestContext::new();
    let router = create_router(ctx.state());
    let caller = ctx.signup("ada@x.com").await;
    let token = ctx.token_for(&caller);
    let request = CreateTransactionRequest::new(TransactionType::Expense, Decimal::ONE);
    for _ in 0..60 {
        ctx.service.create_transaction(&caller.id, &request).await.unwrap();
    }

    let listed = graphql(
        &router,
        Some(&token),
        "{ getTransactions { id } getExpenseTransactions { id } }",
    )
    .await;
    assert_eq!(listed["data"]["getTransactions"].as_array().unwrap().len(), 60);
    assert_eq!(
        listed["data"]["getExpenseTransactions"].as_array().unwrap().len(),
        60
    );
}

#[tokio::test]
async fn test_malformed_body_gets_json_error() {
    let router = create_router(TestContext::new().state());
    let request = Request::post("/graphql")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{"))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["type"], "validation_error");
}
