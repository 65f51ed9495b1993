//! `/posts` API commands

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;

use probekit_api::{ApiResponse, PostsClient, ReqwestTransport};
use probekit_common::{HarnessConfig, NewPost, Post, PostUpdate};

use crate::output::{print_item, print_list, print_success, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct ApiArgs {
    /// Override the configured base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Override the configured per-call timeout (milliseconds)
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: ApiCommands,
}

#[derive(Subcommand)]
pub enum ApiCommands {
    /// List all posts
    List,

    /// Get a post by id
    Get {
        /// Post id
        id: i64,
    },

    /// Create a post
    Create {
        #[arg(long)]
        user_id: i64,

        #[arg(long)]
        title: String,

        #[arg(long)]
        body: String,
    },

    /// Update a post
    Update {
        /// Post id
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        body: Option<String>,
    },

    /// Delete a post
    Delete {
        /// Post id
        id: i64,
    },

    /// Fetch a post and validate it against the post schema
    Check {
        /// Post id
        id: i64,
    },
}

#[derive(Serialize)]
struct ResponseDisplay {
    call: String,
    status: u16,
    ok: bool,
    body: Value,
}

impl ResponseDisplay {
    fn new(call: String, response: ApiResponse) -> Self {
        Self {
            call,
            status: response.status,
            ok: response.ok,
            body: response.body,
        }
    }
}

impl TableDisplay for ResponseDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Call", "Status", "OK", "Body"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.call.clone(),
            self.status.to_string(),
            if self.ok { "✓" } else { "✗" }.to_string(),
            serde_json::to_string_pretty(&self.body).unwrap_or_default(),
        ]
    }
}

#[derive(Serialize)]
struct PostDisplay {
    id: i64,
    user_id: i64,
    title: String,
    body: String,
}

impl From<Post> for PostDisplay {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            title: post.title,
            body: post.body,
        }
    }
}

impl TableDisplay for PostDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "User", "Title", "Body"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.user_id.to_string(),
            self.title.clone(),
            self.body.clone(),
        ]
    }
}

pub async fn execute(args: ApiArgs, config: &HarnessConfig, format: OutputFormat) -> Result<()> {
    let mut api = config.api.clone();
    if let Some(base_url) = args.base_url {
        api.base_url = base_url;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        api.timeout_ms = Some(timeout_ms);
    }

    let transport = ReqwestTransport::from_config(&api)
        .with_context(|| format!("invalid base URL {}", api.base_url))?;
    let client = PostsClient::with_config(transport, &api);

    match args.command {
        ApiCommands::List => {
            let response = client.list_posts().await?;
            match serde_json::from_value::<Vec<Post>>(response.body.clone()) {
                Ok(posts) if response.ok => {
                    let items: Vec<PostDisplay> = posts.into_iter().map(Into::into).collect();
                    print_list(&items, format);
                }
                _ => print_item(&ResponseDisplay::new("GET /posts".into(), response), format),
            }
        }

        ApiCommands::Get { id } => {
            let response = client.get_post(id).await?;
            print_item(&ResponseDisplay::new(format!("GET /posts/{}", id), response), format);
        }

        ApiCommands::Create { user_id, title, body } => {
            let response = client.create_post(&NewPost::new(user_id, title, body)).await?;
            print_item(&ResponseDisplay::new("POST /posts".into(), response), format);
        }

        ApiCommands::Update { id, title, body } => {
            let mut update = PostUpdate::default();
            if let Some(title) = title {
                update = update.title(title);
            }
            if let Some(body) = body {
                update = update.body(body);
            }
            if update.is_empty() {
                bail!("nothing to update: pass --title and/or --body");
            }

            let response = client.update_post(id, &update).await?;
            print_item(&ResponseDisplay::new(format!("PUT /posts/{}", id), response), format);
        }

        ApiCommands::Delete { id } => {
            let response = client.delete_post(id).await?;
            print_item(&ResponseDisplay::new(format!("DELETE /posts/{}", id), response), format);
        }

        ApiCommands::Check { id } => {
            let post = client
                .fetch_post(id)
                .await
                .with_context(|| format!("post {} failed the contract check", id))?;
            print_item(&PostDisplay::from(post), format);
            print_success(&format!("Post {} matches the post schema", id));
        }
    }

    Ok(())
}
