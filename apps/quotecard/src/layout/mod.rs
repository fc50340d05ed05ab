// Layout: font measurement and greedy line wrapping.
// Pure and CPU-bound; callers run it inside tokio::task::spawn_blocking.

pub mod font_metrics;
pub mod wrap;

pub use font_metrics::{CharCell, TrueTypeFont, Typeface};
pub use wrap::{wrap, WrappedLayout};
