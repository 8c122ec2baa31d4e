use std::env;
use std::fs;
use std::process::Command;

use crate::error::FeedtuiError;
use crate::models::{FeedClient, Post};

pub async fn fetch_posts(client: &FeedClient) -> Result<Vec<Post>, FeedtuiError> {
    client.list_posts().await
}

pub async fn create_post(client: &FeedClient, draft: &Post) -> Result<Post, FeedtuiError> {
    client.create_post(draft).await
}

pub async fn update_post(client: &FeedClient, id: u64, post: &Post) -> Result<Post, FeedtuiError> {
    client.update_post(id, post).await
}

pub async fn delete_post(client: &FeedClient, id: u64) -> Result<(), FeedtuiError> {
    client.delete_post(id).await
}

/// Compose post content in `$EDITOR` for the one-shot `post` command.
pub fn compose_via_editor() -> Result<String, FeedtuiError> {
    let editor = env::var("EDITOR")
        .unwrap_or_else(|_| "vi".to_string());

    let mut temp_path = env::temp_dir();
    temp_path.push("feedtui-post");

    let status = Command::new(editor)
        .arg(&temp_path)
        .status()?;

    if !status.success() {
        return Err(FeedtuiError::Io(
            "Editor exited with non-zero status".to_string(),
        ));
    }

    let content = fs::read_to_string(&temp_path)?;
    let _ = fs::remove_file(&temp_path);
    Ok(content)
}
