mod party_event;
mod position;

pub use party_event::*;
pub use position::*;
