mod create_ping;
mod get_pings;
mod remove_ping;

pub use create_ping::*;
pub use get_pings::*;
pub use remove_ping::*;
