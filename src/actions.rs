use anyhow::{anyhow, Context, Result};
use log::{debug, info};

use crate::common::Post;

/// Quick actions offered on every listed post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostAction {
    OpenPost,
    OpenContent,
    CopyLink,
}

impl PostAction {
    pub fn title(&self) -> &'static str {
        match self {
            PostAction::OpenPost => "Open Post",
            PostAction::OpenContent => "Open Content URL",
            PostAction::CopyLink => "Copy Link",
        }
    }
}

/// Browser and clipboard access supplied by the environment.
pub trait ActionHost {
    fn open_url(&self, url: &str) -> Result<()>;
    fn copy_text(&self, text: &str) -> Result<()>;
}

/// Default browser via `webbrowser`, clipboard via `arboard`.
pub struct SystemActionHost;

impl ActionHost for SystemActionHost {
    fn open_url(&self, url: &str) -> Result<()> {
        webbrowser::open(url).with_context(|| format!("Failed to open {} in browser", url))
    }

    fn copy_text(&self, text: &str) -> Result<()> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| anyhow!("create clipboard context: {}", e))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| anyhow!("copy to clipboard: {}", e))
    }
}

/// Runs `action` on `post` and returns a status line for the user.
pub fn perform_action(
    action: PostAction,
    post: &Post,
    site_base: &str,
    host: &dyn ActionHost,
) -> Result<String> {
    debug!("Running '{}' on post {}", action.title(), post.id);
    match action {
        PostAction::OpenPost => {
            let url = post.canonical_url(site_base);
            host.open_url(&url)?;
            info!("Opened {}", url);
            Ok(format!("Opened {}", url))
        }
        PostAction::OpenContent => {
            if post.content_url.is_empty() {
                return Err(anyhow!("Post '{}' has no content URL", post.title));
            }
            host.open_url(&post.content_url)?;
            info!("Opened {}", post.content_url);
            Ok(format!("Opened {}", post.content_url))
        }
        PostAction::CopyLink => {
            let url = post.canonical_url(site_base);
            host.copy_text(&url)?;
            Ok(format!("Copied {} to clipboard", url))
        }
    }
}
