//! Built-in generator tools.

mod product_review;
mod qa_pair;
mod support_dialogue;

pub use product_review::ProductReviewTool;
pub use qa_pair::QaPairTool;
pub use support_dialogue::SupportDialogueTool;

use rand::seq::SliceRandom;

/// Pick one entry at random; `pool` must be non-empty
fn pick<'a>(pool: &[&'a str]) -> &'a str {
    pool.choose(&mut rand::thread_rng()).copied().unwrap_or_default()
}
