//! End-to-end request flows over the REST surface.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use finance_api::api::create_router;
use finance_api::test_utils::{GROCERIES_CATEGORY_ID, SALARY_CATEGORY_ID, TestContext};

struct Client {
    router: Router,
    token: Option<String>,
}

impl Client {
    fn new(router: Router) -> Self {
        Self {
            router,
            token: None,
        }
    }

    fn with_token(&self, token: &str) -> Self {
        Self {
            router: self.router.clone(),
            token: Some(token.to_string()),
        }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = &self.token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn json(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = self.send(method, uri, body).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

async fn signed_up(client: &Client, email: &str) -> Client {
    let (status, body) = client
        .json(
            "POST",
            "/users/signup",
            Some(json!({"name": "A", "email": email, "password": "pw"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    client.with_token(body["token"].as_str().unwrap())
}

#[tokio::test]
async fn test_personal_finance_walkthrough() {
    let ctx = TestContext::new();
    let anonymous = Client::new(create_router(ctx.state()));

    // Signup, then a duplicate signup conflicts.
    let client = signed_up(&anonymous, "a@x.com").await;
    let (status, _) = anonymous
        .json(
            "POST",
            "/users/signup",
            Some(json!({"name": "A", "email": "a@x.com", "password": "pw"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Add an expense.
    let (status, created) = client
        .json(
            "POST",
            "/api/transactions",
            Some(json!({
                "type": "expense",
                "amount": 12.5,
                "date": "2024-03-01",
                "category_id": GROCERIES_CATEGORY_ID,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let txn_id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["type"], "expense");
    assert_eq!(created["category"]["name"], "Groceries");

    // Filtered lists.
    let (status, expenses) = client
        .json("GET", "/api/transactions?type=expense", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        expenses
            .as_array()
            .unwrap()
            .iter()
            .any(|t| t["id"] == txn_id.as_str())
    );

    let (_, income) = client
        .json("GET", "/api/transactions?type=income", None)
        .await;
    assert!(income.as_array().unwrap().is_empty());

    let (_, via_alias) = client.json("GET", "/transactions/expenses", None).await;
    assert_eq!(via_alias.as_array().unwrap().len(), 1);

    // No budgets yet, so the status is empty.
    let (status, budget_status) = client
        .json("GET", "/api/budgets/status?month=3&year=2024", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(budget_status, json!([]));

    // Unsupported currency.
    let (status, body) = anonymous
        .json("GET", "/api/exchange-rate?currency=XYZ", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Currency not found in rates");

    // A user with no transactions gets no tips and the advisor is not called.
    let fresh = signed_up(&anonymous, "b@x.com").await;
    let (status, tips) = fresh.json("GET", "/api/analyze-transactions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tips["tips"], json!([]));
    assert_eq!(tips["message"], "No transactions found");
    assert_eq!(ctx.advisor.call_count(), 0);

    // Deleting twice: the second attempt finds nothing.
    let uri = format!("/api/transactions/{}", txn_id);
    assert_eq!(
        client.send("DELETE", &uri, None).await.status(),
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        client.send("DELETE", &uri, None).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_users_cannot_touch_each_others_records() {
    let ctx = TestContext::new();
    let anonymous = Client::new(create_router(ctx.state()));
    let alice = signed_up(&anonymous, "alice@x.com").await;
    let bob = signed_up(&anonymous, "bob@x.com").await;

    let (_, txn) = alice
        .json(
            "POST",
            "/api/transactions",
            Some(json!({"type": "income", "amount": 1000, "category_id": SALARY_CATEGORY_ID})),
        )
        .await;
    let txn_uri = format!("/api/transactions/{}", txn["id"].as_str().unwrap());

    let (_, bob_list) = bob.json("GET", "/api/transactions", None).await;
    assert!(bob_list.as_array().unwrap().is_empty());

    let (status, _) = bob
        .json("PUT", &txn_uri, Some(json!({"amount": 1})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        bob.send("DELETE", &txn_uri, None).await.status(),
        StatusCode::NOT_FOUND
    );

    let (_, goal) = alice
        .json(
            "POST",
            "/api/savings-goals",
            Some(json!({"name": "Bike", "target_amount": 500})),
        )
        .await;
    let add_uri = format!("/api/savings-goals/{}/add", goal["id"].as_str().unwrap());
    let (status, _) = bob
        .json("POST", &add_uri, Some(json!({"amount": 10})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Alice's record is untouched.
    let (_, alice_list) = alice.json("GET", "/api/transactions", None).await;
    assert_eq!(alice_list[0]["amount"], "1000.00");
}

#[tokio::test]
async fn test_budget_tracks_spending() {
    let ctx = TestContext::new();
    let client = signed_up(&Client::new(create_router(ctx.state())), "a@x.com").await;

    let (status, budget) = client
        .json(
            "POST",
            "/api/budgets",
            Some(json!({
                "category_id": GROCERIES_CATEGORY_ID,
                "amount": 200,
                "month": 5,
                "year": 2024,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = client
        .json(
            "POST",
            "/api/budgets",
            Some(json!({
                "category_id": GROCERIES_CATEGORY_ID,
                "amount": 300,
                "month": 5,
                "year": 2024,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    client
        .json(
            "POST",
            "/api/transactions",
            Some(json!({
                "type": "expense",
                "amount": 50,
                "date": "2024-05-10",
                "category_id": GROCERIES_CATEGORY_ID,
            })),
        )
        .await;

    let (_, rows) = client
        .json("GET", "/api/budgets/status?month=5&year=2024", None)
        .await;
    let row = &rows[0];
    assert_eq!(row["budget_id"], budget["id"]);
    assert_eq!(row["spent_amount"], 50.0);
    assert_eq!(row["remaining_amount"], 150.0);
    assert_eq!(row["percentage_used"], 25.0);

    let (_, summary) = client
        .json("GET", "/api/transactions/summary?month=5&year=2024", None)
        .await;
    assert_eq!(summary[0]["total_expense"], 50.0);

    let (status, _) = client
        .json("GET", "/api/budgets?month=13&year=2024", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_savings_goal_becomes_achieved() {
    let ctx = TestContext::new();
    let client = signed_up(&Client::new(create_router(ctx.state())), "a@x.com").await;

    let (status, goal) = client
        .json(
            "POST",
            "/api/savings-goals",
            Some(json!({"name": "Laptop", "target_amount": 100, "current_amount": 40})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(goal["is_achieved"], false);

    let add_uri = format!("/api/savings-goals/{}/add", goal["id"].as_str().unwrap());
    let (status, updated) = client
        .json("POST", &add_uri, Some(json!({"amount": 60})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["is_achieved"], true);

    let (status, _) = client
        .json("POST", &add_uri, Some(json!({"amount": -5})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_custom_categories_and_defaults() {
    let ctx = TestContext::new();
    let client = signed_up(&Client::new(create_router(ctx.state())), "a@x.com").await;

    let (status, custom) = client
        .json(
            "POST",
            "/api/categories",
            Some(json!({"name": "Pets", "type": "expense"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(custom["is_default"], false);

    let (_, expense_categories) = client.json("GET", "/api/categories?type=expense", None).await;
    let names: Vec<&str> = expense_categories
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Pets"));
    assert!(names.contains(&"Groceries"));
    assert!(!names.contains(&"Salary"));

    // Defaults are read-only.
    let default_uri = format!("/api/categories/{}", GROCERIES_CATEGORY_ID);
    let (status, _) = client
        .json("PUT", &default_uri, Some(json!({"name": "Food"})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        client.send("DELETE", &default_uri, None).await.status(),
        StatusCode::NOT_FOUND
    );

    let custom_uri = format!("/api/categories/{}", custom["id"].as_str().unwrap());
    assert_eq!(
        client.send("DELETE", &custom_uri, None).await.status(),
        StatusCode::NO_CONTENT
    );
}

#[tokio::test]
async fn test_profile_onboarding() {
    let ctx = TestContext::new();
    let client = signed_up(&Client::new(create_router(ctx.state())), "a@x.com").await;

    let (status, profile) = client.json("GET", "/api/profile", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["preferred_currency"], "USD");
    assert_eq!(profile["onboarding_completed"], false);

    let (status, updated) = client
        .json(
            "PUT",
            "/api/profile",
            Some(json!({"preferred_currency": "eur"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["preferred_currency"], "EUR");

    let (status, done) = client
        .json("POST", "/api/profile/complete-onboarding", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["onboarding_completed"], true);
}

#[tokio::test]
async fn test_bank_feed_failure_is_500() {
    let ctx = TestContext::new();
    let client = signed_up(&Client::new(create_router(ctx.state())), "a@x.com").await;

    let (status, body) = client.json("GET", "/api/bank/mockbank", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "mock-bank-api");

    ctx.bank.set_failing(true);
    let (status, body) = client.json("GET", "/api/bank/mockbank", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], "Internal server error");
}

#[tokio::test]
async fn test_oversized_amount_is_rejected() {
    let ctx = TestContext::new();
    let client = signed_up(&Client::new(create_router(ctx.state())), "a@x.com").await;

    let (status, body) = client
        .json(
            "POST",
            "/api/transactions",
            Some(json!({"type": "expense", "amount": 1_000_000_000_000_i64})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "validation_error");
    assert!(body["error"]["message"].as_str().unwrap().contains("amount"));

    let (status, _) = client
        .json(
            "POST",
            "/api/transactions",
            Some(json!({"type": "expense", "amount": 9_999_999_999_i64})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}
