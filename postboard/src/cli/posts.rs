//! posts サブコマンド
//!
//! 稼働中のサーバーに対して投稿の一覧・作成・削除を行います。

use super::DEFAULT_SERVER_URL;
use crate::client::ApiClient;
use crate::types::Post;
use clap::{Args, Subcommand};

/// posts サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct PostsArgs {
    /// Server base URL
    #[arg(long, global = true, default_value = DEFAULT_SERVER_URL, env = "POSTBOARD_URL")]
    pub url: String,

    /// Operation to perform
    #[command(subcommand)]
    pub command: PostsCommand,
}

/// posts の操作
#[derive(Subcommand, Debug, Clone)]
pub enum PostsCommand {
    /// List posts, newest first
    List {
        /// Only show posts whose name contains this term
        #[arg(long)]
        filter: Option<String>,
    },
    /// Create a post
    Create {
        /// Post name
        #[arg(long)]
        name: String,
        /// Post description
        #[arg(long)]
        description: String,
    },
    /// Delete a post by id
    Delete {
        /// Post id
        id: String,
    },
}

/// posts サブコマンドを実行
pub async fn execute(args: &PostsArgs) -> anyhow::Result<()> {
    let client = ApiClient::new(&args.url)?;

    match &args.command {
        PostsCommand::List { filter } => {
            let posts = client.list_posts(filter.as_deref()).await?;
            if posts.is_empty() {
                println!("No posts");
            } else {
                println!("ID\tCREATED\tNAME\tDESCRIPTION");
                for post in &posts {
                    println!("{}", format_row(post));
                }
            }
        }
        PostsCommand::Create { name, description } => {
            let post = client.create_post(name, description).await?;
            println!("Created post {}", post.id);
        }
        PostsCommand::Delete { id } => {
            let post = client.delete_post(id).await?;
            println!("Deleted post {} ({})", post.id, post.name);
        }
    }
    Ok(())
}

fn format_row(post: &Post) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        post.id,
        post.created_at.format("%Y-%m-%d %H:%M:%S"),
        post.name,
        post.description
    )
}
