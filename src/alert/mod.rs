/// Alert feed and emission rules.
///
/// Submodules:
/// - `feed` — the capped, newest-first alert list and acknowledgment.
/// - `rules` — tick-driven and update-driven alert emission.

pub mod feed;
pub mod rules;

pub use feed::AlertFeed;
