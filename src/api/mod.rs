//! The API layer: REST handlers, the GraphQL endpoint and routing.

pub mod error;
pub mod extract;
pub mod graphql;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use graphql::{FinanceSchema, build_schema};
pub use router::{RateLimitConfig, create_router, create_router_with_rate_limit};
