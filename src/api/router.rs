//! HTTP routing configuration with rate limiting and OpenAPI documentation.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Extension, Json, Router,
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use governor::{
    Quota, RateLimiter,
    clock::{Clock, DefaultClock},
    state::keyed::DashMapStateStore,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::app::AppState;
use crate::domain::{ErrorDetail, ErrorResponse, RateLimitResponse};

use super::graphql::{build_schema, graphiql_handler, graphql_handler};
use super::handlers::{
    ApiDoc, budgets, categories, external, health_check_handler, liveness_handler,
    metrics_handler, profile, readiness_handler, savings, transactions, users,
};
use super::middleware::require_auth;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests per second for signup and login
    pub auth_rps: u32,
    /// Burst size for signup and login
    pub auth_burst: u32,
    /// Requests per second for health endpoints
    pub health_rps: u32,
    /// Burst size for health endpoints
    pub health_burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            auth_rps: 10,
            auth_burst: 20,
            health_rps: 100,
            health_burst: 100,
        }
    }
}

impl RateLimitConfig {
    /// Credential limits as configured, health limits at their defaults.
    #[must_use]
    pub fn new(auth_rps: u32, auth_burst: u32) -> Self {
        Self {
            auth_rps,
            auth_burst,
            ..Self::default()
        }
    }
}

type KeyedLimiter = RateLimiter<IpAddr, DashMapStateStore<IpAddr>, DefaultClock>;

/// Shared rate limiter state, keyed by client IP
pub struct RateLimitState {
    auth_limiter: KeyedLimiter,
    health_limiter: KeyedLimiter,
    config: RateLimitConfig,
}

fn quota(rps: u32, burst: u32) -> Quota {
    let rps = NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN);
    let burst = NonZeroU32::new(burst).unwrap_or(rps);
    Quota::per_second(rps).allow_burst(burst)
}

impl RateLimitState {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            auth_limiter: RateLimiter::dashmap(quota(config.auth_rps, config.auth_burst)),
            health_limiter: RateLimiter::dashmap(quota(config.health_rps, config.health_burst)),
            config,
        }
    }
}

/// Client IP from X-Forwarded-For, X-Real-IP or the connection address.
/// Unknown clients share one bucket.
fn client_ip(request: &Request) -> IpAddr {
    let header_ip = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    };
    header_ip("x-forwarded-for")
        .or_else(|| header_ip("x-real-ip"))
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        })
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

fn header_value(value: impl ToString) -> HeaderValue {
    HeaderValue::from_str(&value.to_string()).unwrap_or_else(|_| HeaderValue::from_static("0"))
}

/// Rate limit middleware for signup and login
async fn rate_limit_auth_middleware(
    State(rate_limit): State<Arc<RateLimitState>>,
    request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(&request);
    let limit = header_value(rate_limit.config.auth_rps);
    match rate_limit.auth_limiter.check_key(&ip) {
        Ok(_) => {
            let mut response = next.run(request).await;
            response.headers_mut().insert("X-RateLimit-Limit", limit);
            response
        }
        Err(not_until) => {
            let retry_after = not_until
                .wait_time_from(DefaultClock::default().now())
                .as_secs();
            let body = RateLimitResponse {
                error: ErrorDetail {
                    r#type: "rate_limited".to_string(),
                    message: "Rate limit exceeded. Please slow down your requests.".to_string(),
                },
                retry_after,
            };

            let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
            let headers = response.headers_mut();
            headers.insert("X-RateLimit-Limit", limit);
            headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));
            headers.insert(header::RETRY_AFTER, header_value(retry_after));
            response
        }
    }
}

/// Rate limit middleware for health endpoints
async fn rate_limit_health_middleware(
    State(rate_limit): State<Arc<RateLimitState>>,
    request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(&request);
    match rate_limit.health_limiter.check_key(&ip) {
        Ok(_) => next.run(request).await,
        Err(not_until) => {
            let retry_after = not_until
                .wait_time_from(DefaultClock::default().now())
                .as_secs();
            let body = ErrorResponse {
                error: ErrorDetail {
                    r#type: "rate_limited".to_string(),
                    message: "Rate limit exceeded".to_string(),
                },
            };

            let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, header_value(retry_after));
            response
        }
    }
}

async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: ErrorDetail {
                r#type: "not_found".to_string(),
                message: "Route not found".to_string(),
            },
        }),
    )
}

fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);
    match frontend_url.and_then(|url| HeaderValue::from_str(url).ok()) {
        Some(origin) => layer.allow_origin(origin),
        None => layer.allow_origin(Any),
    }
}

/// Routes that need a verified caller.
fn protected_routes(app_state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let transaction_routes = Router::new()
        .route(
            "/",
            get(transactions::list_transactions_handler)
                .post(transactions::create_transaction_handler),
        )
        .route("/income", get(transactions::list_income_handler))
        .route("/expenses", get(transactions::list_expenses_handler))
        .route("/summary", get(transactions::monthly_summary_handler))
        .route(
            "/{id}",
            put(transactions::update_transaction_handler)
                .delete(transactions::delete_transaction_handler),
        );

    let category_routes = Router::new()
        .route(
            "/",
            get(categories::list_categories_handler).post(categories::create_category_handler),
        )
        .route(
            "/{id}",
            put(categories::update_category_handler).delete(categories::delete_category_handler),
        );

    let budget_routes = Router::new()
        .route(
            "/",
            get(budgets::list_budgets_handler).post(budgets::create_budget_handler),
        )
        .route("/status", get(budgets::budget_status_handler))
        .route(
            "/{id}",
            put(budgets::update_budget_handler).delete(budgets::delete_budget_handler),
        );

    let savings_routes = Router::new()
        .route(
            "/",
            get(savings::list_savings_goals_handler).post(savings::create_savings_goal_handler),
        )
        .route(
            "/{id}",
            put(savings::update_savings_goal_handler).delete(savings::delete_savings_goal_handler),
        )
        .route("/{id}/add", post(savings::add_contribution_handler));

    let profile_routes = Router::new()
        .route(
            "/",
            get(profile::get_profile_handler).put(profile::update_profile_handler),
        )
        .route(
            "/complete-onboarding",
            post(profile::complete_onboarding_handler),
        );

    Router::new()
        .nest("/api/transactions", transaction_routes.clone())
        .nest("/transactions", transaction_routes)
        .nest("/api/categories", category_routes)
        .nest("/api/budgets", budget_routes)
        .nest("/api/savings-goals", savings_routes)
        .nest("/api/profile", profile_routes)
        .route("/api/bank/mockbank", get(external::bank_transactions_handler))
        .route(
            "/api/analyze-transactions",
            get(external::analyze_transactions_handler),
        )
        .route("/users", get(users::list_users_handler))
        .route(
            "/users/{id}",
            get(users::get_user_handler).put(users::update_user_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(app_state),
            require_auth,
        ))
}

fn assemble(
    app_state: Arc<AppState>,
    credential_routes: Router<Arc<AppState>>,
    health_routes: Router<Arc<AppState>>,
    frontend_url: Option<&str>,
) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(cors_layer(frontend_url));

    let schema = build_schema(Arc::clone(&app_state.service));

    Router::new()
        .merge(protected_routes(&app_state))
        .merge(credential_routes)
        .merge(health_routes)
        .route("/api/exchange-rate", get(external::exchange_rate_handler))
        .route("/graphql", get(graphiql_handler).post(graphql_handler))
        .route("/metrics", get(metrics_handler))
        .fallback(not_found_handler)
        .layer(Extension(schema))
        .layer(middleware)
        .with_state(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

fn credential_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/signup", post(users::signup_handler))
        .route("/users/login", post(users::login_handler))
}

fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
}

/// Create router without rate limiting
pub fn create_router(app_state: Arc<AppState>) -> Router {
    assemble(app_state, credential_routes(), health_routes(), None)
}

/// Create router with per-IP rate limiting on credential and health routes
pub fn create_router_with_rate_limit(
    app_state: Arc<AppState>,
    config: RateLimitConfig,
    frontend_url: Option<&str>,
) -> Router {
    let rate_limit_state = Arc::new(RateLimitState::new(config));

    let credential_routes = credential_routes().layer(middleware::from_fn_with_state(
        Arc::clone(&rate_limit_state),
        rate_limit_auth_middleware,
    ));
    let health_routes = health_routes().layer(middleware::from_fn_with_state(
        rate_limit_state,
        rate_limit_health_middleware,
    ));

    assemble(app_state, credential_routes, health_routes, frontend_url)
}
