mod create_party;
mod disband_party;
mod join_party;
mod kick_member;
mod leave_party;
mod update_party;

pub use create_party::*;
pub use disband_party::*;
pub use join_party::*;
pub use kick_member::*;
pub use leave_party::*;
pub use update_party::*;
