pub mod user;
pub mod post;
pub mod follow;
pub mod sentiment;

// Re-export models for convenience
pub use user::User;
pub use post::Post;
pub use follow::Follow;
pub use sentiment::SentimentLabel;
