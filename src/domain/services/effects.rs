use crate::domain::entities::Ping;
use crate::domain::value_objects::Position;

/// World-side spatial queries and visual effects
///
/// The beacon broadcaster asks who is near a marker and emits the effect
/// through this seam; rendering stays outside the core.
pub trait WorldEffects: Send + Sync {
    /// Players currently within `radius` of `position`.
    fn players_near(&self, position: &Position, radius: f64) -> Vec<String>;

    /// Emit a beacon effect for a live ping, visible to `observers`.
    fn emit_beacon(&self, ping: &Ping, observers: &[String]);
}

/// Effect sink that renders nothing; used in tests and headless setups.
pub struct NoopWorldEffects;

impl WorldEffects for NoopWorldEffects {
    fn players_near(&self, _position: &Position, _radius: f64) -> Vec<String> {
        Vec::new()
    }

    fn emit_beacon(&self, _ping: &Ping, _observers: &[String]) {}
}
