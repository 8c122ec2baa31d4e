use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::FeedtuiError;
use crate::models::post::Post;

/// HTTP client for the remote post store. The base URL is the collection
/// itself; item operations append `/{id}`.
#[derive(Clone)]
pub struct FeedClient {
    base_url: String,
    http: Client,
}

impl FeedClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FeedtuiError> {
        let base_url = sanitize_base_url(base_url.into())?;
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self { base_url, http })
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, FeedtuiError> {
        let response = self
            .http
            .get(&self.base_url)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn create_post(&self, draft: &Post) -> Result<Post, FeedtuiError> {
        let response = self
            .http
            .post(&self.base_url)
            .json(draft)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn update_post(&self, id: u64, post: &Post) -> Result<Post, FeedtuiError> {
        let response = self
            .http
            .put(self.post_url(id))
            .json(post)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn delete_post(&self, id: u64) -> Result<(), FeedtuiError> {
        self.http
            .delete(self.post_url(id))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    fn post_url(&self, id: u64) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

fn sanitize_base_url(mut base: String) -> Result<String, FeedtuiError> {
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    // Remove trailing slash for consistency
    while base.ends_with('/') {
        base.pop();
    }
    // Validate once
    Url::parse(&base).map_err(|e| FeedtuiError::Config(format!("invalid API URL: {e}")))?;
    Ok(base)
}
