mod invite_registry;
mod ping_registry;

pub use invite_registry::*;
pub use ping_registry::*;
