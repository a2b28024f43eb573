mod allies;
mod effects;
mod notifier;
mod presence;

pub use allies::*;
pub use effects::*;
pub use notifier::*;
pub use presence::*;
