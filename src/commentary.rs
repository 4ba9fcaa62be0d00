//! Post-game commentary, behind an async collaborator boundary.
//!
//! The commentator gets the final score and how the run ended, and owes a
//! single line of text back. The fetch is bounded: a slow or failing
//! commentator is replaced by a fixed fallback string, and nothing that
//! happens here can ever touch game state.

use crate::game::EndCause;
use anyhow::Result;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Shown while the commentary fetch is still in flight
pub const PENDING_COMMENT: &str = "The announcer is reviewing the tape...";

/// Substituted when the commentator errors out or takes too long
pub const FALLBACK_COMMENT: &str = "Game over! (The announcer has lost its voice.)";

/// Longest the UI will wait for a line of commentary
pub const COMMENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Something that can comment on a finished game
pub trait Commentator: Send + Sync {
    fn comment(&self, score: u32, cause: EndCause) -> BoxFuture<'static, Result<String>>;
}

/// Built-in announcer: an offline arcade voice that picks a line from the
/// score band and flavors it with how the run ended
pub struct ArcadeAnnouncer;

impl Commentator for ArcadeAnnouncer {
    fn comment(&self, score: u32, cause: EndCause) -> BoxFuture<'static, Result<String>> {
        async move { Ok(announce(score, cause)) }.boxed()
    }
}

fn announce(score: u32, cause: EndCause) -> String {
    let opener = match cause {
        EndCause::Wall => "Straight into the masonry!",
        EndCause::SelfBite => "You bit your own tail!",
        EndCause::BoardFull => {
            return format!(
                "A FULL BOARD at {score} points?! Cabinet's yours, champ, we'll engrave the plaque."
            );
        }
    };

    let verdict = if score < 5 {
        "Did the joystick even get warm?"
    } else if score > 20 {
        "Certified high-roller, the cabinet salutes you!"
    } else {
        "Respectable run, now get back in there."
    };

    format!("{opener} {score} points. {verdict}")
}

/// Fetch one line of commentary, bounding the wait and swallowing errors.
/// Always produces text; never an error.
pub async fn fetch(commentator: Arc<dyn Commentator>, score: u32, cause: EndCause) -> String {
    fetch_with_timeout(commentator, score, cause, COMMENT_TIMEOUT).await
}

async fn fetch_with_timeout(
    commentator: Arc<dyn Commentator>,
    score: u32,
    cause: EndCause,
    limit: Duration,
) -> String {
    match tokio::time::timeout(limit, commentator.comment(score, cause)).await {
        Ok(Ok(text)) => text,
        Ok(Err(err)) => {
            warn!("commentary failed: {err:#}");
            FALLBACK_COMMENT.to_string()
        }
        Err(_) => {
            warn!("commentary timed out after {limit:?}");
            FALLBACK_COMMENT.to_string()
        }
    }
}
