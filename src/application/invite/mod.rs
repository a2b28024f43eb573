mod accept_invite;
mod decline_invite;
mod send_invite;

pub use accept_invite::*;
pub use decline_invite::*;
pub use send_invite::*;
