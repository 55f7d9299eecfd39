//! Personal Finance API
//!
//! A bookkeeping backend for individual users: income and expense
//! transactions, categories, monthly budgets, savings goals and a
//! per-user profile, served over REST and GraphQL.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   API Layer                  │
//! │   REST handlers, GraphQL schema, routing     │
//! ├─────────────────────────────────────────────┤
//! │               Application Layer              │
//! │   Auth, ownership scoping, business rules    │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │      Records, repository traits, errors      │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │  PostgreSQL, bank, exchange-rate and Gemini  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Every store and upstream sits behind a trait in [`domain`], so the
//! service and the HTTP surface run against in-memory mocks in tests.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use finance_api::api::create_router;
//! use finance_api::app::{AppState, AuthService, ExternalClients};
//! use finance_api::infra::PostgresClient;
//!
//! let db = Arc::new(PostgresClient::with_defaults(&database_url).await?);
//! let auth = Arc::new(AuthService::new(&jwt_secret, 3600)?);
//! let state = Arc::new(AppState::new(db, auth, external_clients));
//!
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod infra;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
