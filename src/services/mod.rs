pub mod follow_service;
mod lexicon;
pub mod post_service;
pub mod sentiment_service;
pub mod user_service;

// Re-export services for convenience
pub use follow_service::FollowService;
pub use post_service::PostService;
pub use sentiment_service::{HttpPolarityScorer, LexiconScorer, PolarityScorer, SentimentService};
pub use user_service::UserService;
