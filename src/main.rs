use feedtui::cli::Flags;
use feedtui::controllers::{post_controller, start_app};
use feedtui::models::post::sort_newest_first;
use feedtui::models::{Config, FeedClient, Post};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let flags = Flags::from_args();
    let config = Config::load()?;
    let client = FeedClient::new(config.api_url.clone())?;

    if flags.post() {
        // One-shot create, composed in $EDITOR
        let content = post_controller::compose_via_editor()?;
        let draft = Post {
            content,
            author: config.author.clone(),
            ..Post::default()
        };
        post_controller::create_post(&client, &draft).await?;
        println!("Post created successfully!");
        Ok(())
    } else if flags.list() {
        let mut posts = post_controller::fetch_posts(&client).await?;
        sort_newest_first(&mut posts);
        for post in posts {
            println!("{} posted at {}", post.author, post.display_time());
            println!("{}\n", post.content);
        }
        Ok(())
    } else {
        start_app(client).await
    }
}
