pub mod invite;
pub mod party;
pub mod ping;
