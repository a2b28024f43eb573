/// Online-presence oracle
///
/// Answered by the session layer; the core never resolves connectivity
/// itself.
pub trait PresenceOracle: Send + Sync {
    fn is_online(&self, player_id: &str) -> bool;
}
