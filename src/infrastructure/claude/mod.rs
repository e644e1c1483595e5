//! Claude Messages API integration
//!
//! - `client`: HTTP client with minimum request spacing
//! - `analyst`: [`RecommendationOracle`](crate::domain::ports::RecommendationOracle) backed by the client

pub mod analyst;
pub mod client;
pub mod errors;
pub mod rate_limiter;
pub mod types;

pub use analyst::{extract_json_payload, parse_recommendation, ClaudeAnalyst};
pub use client::{ClaudeClient, ClaudeClientConfig};
pub use errors::ClaudeApiError;
pub use rate_limiter::IntervalRateLimiter;
pub use types::{ContentBlock, Message, MessageRequest, MessageResponse, Usage};
