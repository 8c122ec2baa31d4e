pub mod post;
pub mod client;
pub mod config;

// Re-export important structs for convenience
pub use post::Post;
pub use client::FeedClient;
pub use config::Config;
