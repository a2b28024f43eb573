mod beacon;
mod periodic;
mod reconciler;

pub use beacon::*;
pub use periodic::*;
pub use reconciler::*;
