//! Basic example demonstrating the Flarum API client.
//!
//! Run with:
//! ```
//! FLARUM_URL=https://discuss.flarum.org cargo run --example basic
//! ```
//!
//! Set `FLARUM_API_TOKEN` to browse as a user instead of a guest.

use flarumapi::{FlarumClient, Model, RequestOptions};

#[tokio::main]
async fn main() -> flarumapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating Flarum client...");
    let client = FlarumClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    // Latest discussions, with their authors
    println!("\n--- Latest Discussions ---");
    let options = RequestOptions::new()
        .include(["user"])
        .sort("-lastPostedAt")
        .page(1);
    let discussions = client.discussions().get_all(&options).await?;
    println!("Found {} discussions", discussions.len());

    for discussion in &discussions {
        println!(
            "  - [{}] {} ({} comments)",
            discussion.id(),
            discussion.title().unwrap_or("untitled"),
            discussion.comment_count().unwrap_or(0)
        );
    }

    // Read the opening post of the first one
    if let Some(discussion) = discussions.first() {
        println!("\n--- Opening Post ---");
        let post = discussion.first_post().await?;
        println!("Post #{} by user {:?}", post.id(), post.user_id());
        println!("{}", post.content().unwrap_or_default());
    }

    // Tags
    println!("\n--- Tags ---");
    let tags = client.tags().get_all(&RequestOptions::new()).await?;
    for tag in tags.iter().take(10) {
        println!(
            "  - {} ({} discussions)",
            tag.name().unwrap_or("unnamed"),
            tag.discussion_count().unwrap_or(0)
        );
    }

    println!("\nDone!");
    Ok(())
}
