//! Physics backend abstraction.
//!
//! The controller never resolves collisions itself. It asks a backend two
//! things each tick: "is there ground inside this sphere?" and "move this
//! body by this displacement". Implement [`CharacterPhysicsBackend`] to
//! integrate a physics engine; the crate ships a transform-based
//! [`KinematicBackend`](crate::kinematic::KinematicBackend) for tests and
//! engine-less consumers.

use bevy::prelude::*;

/// Trait for physics backend implementations.
///
/// The backend handles the spatial ground query and the application of the
/// per-tick displacement, subject to whatever collision response it
/// implements. Both operations are bounded and non-blocking; they are called
/// at most once per character per tick.
pub trait CharacterPhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    /// Sphere-overlap test against ground geometry.
    ///
    /// # Arguments
    /// * `world` - The ECS world for queries
    /// * `center` - Sphere center in world space
    /// * `radius` - Sphere radius
    /// * `layers` - Layer bits; only geometry sharing a bit counts as ground
    /// * `exclude` - Entity to ignore (the character body itself)
    fn check_sphere(
        world: &World,
        center: Vec3,
        radius: f32,
        layers: u32,
        exclude: Entity,
    ) -> bool;

    /// Apply a world-space displacement to the character body.
    ///
    /// The backend may slide, block or otherwise modify the displacement in
    /// response to collisions; the controller only requests it.
    fn move_character(world: &mut World, entity: Entity, displacement: Vec3);
}

/// Empty plugin for backends that don't need additional setup.
pub struct NoOpBackendPlugin;

impl Plugin for NoOpBackendPlugin {
    fn build(&self, _app: &mut App) {}
}
