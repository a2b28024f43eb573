mod invite;
mod party;
mod ping;

pub use invite::*;
pub use party::*;
pub use ping::*;
