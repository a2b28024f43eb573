mod broadcast_notifier;
mod presence;
mod stats;

pub use broadcast_notifier::*;
pub use presence::*;
pub use stats::*;
