//! Transform-based reference backend.
//!
//! [`KinematicBackend`] applies displacements straight to [`Transform`] and
//! answers the ground probe with a sphere-vs-box overlap against
//! [`GroundVolume`] components. There is no collision response; it exists so
//! the controller can run (and be tested) without a physics engine.

use bevy::prelude::*;

use crate::backend::{CharacterPhysicsBackend, NoOpBackendPlugin};

/// An axis-aligned box of walkable ground, centered on its transform.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct GroundVolume {
    /// Half extents of the box in world units.
    pub half_extents: Vec3,
    /// Layer bits. The probe only accepts volumes sharing a bit with the
    /// character's ground layer mask.
    pub layers: u32,
}

impl Default for GroundVolume {
    fn default() -> Self {
        Self {
            half_extents: Vec3::new(10.0, 0.5, 10.0),
            layers: 1,
        }
    }
}

impl GroundVolume {
    /// Create a volume on layer 1 with the given half extents.
    pub fn new(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            layers: 1,
        }
    }

    /// Builder: set the layer bits.
    pub fn with_layers(mut self, layers: u32) -> Self {
        self.layers = layers;
        self
    }
}

/// Sphere-vs-AABB overlap test.
fn sphere_overlaps_box(center: Vec3, radius: f32, box_center: Vec3, half_extents: Vec3) -> bool {
    let min = box_center - half_extents;
    let max = box_center + half_extents;
    let closest = center.clamp(min, max);
    closest.distance_squared(center) <= radius * radius
}

/// Kinematic transform backend.
///
/// Displacements move the entity's [`Transform`] directly and the ground
/// probe tests against every [`GroundVolume`] in the world. Downward motion
/// is resolved against ground volumes: a body that would end the tick inside
/// one is snapped to its top face. There is no lateral collision response.
pub struct KinematicBackend;

impl CharacterPhysicsBackend for KinematicBackend {
    fn plugin() -> impl Plugin {
        NoOpBackendPlugin
    }

    fn check_sphere(
        world: &World,
        center: Vec3,
        radius: f32,
        layers: u32,
        exclude: Entity,
    ) -> bool {
        for entity_ref in world.iter_entities() {
            if entity_ref.id() == exclude {
                continue;
            }
            let Some(volume) = entity_ref.get::<GroundVolume>() else {
                continue;
            };
            if volume.layers & layers == 0 {
                continue;
            }
            let Some(transform) = entity_ref.get::<GlobalTransform>() else {
                continue;
            };
            if sphere_overlaps_box(center, radius, transform.translation(), volume.half_extents) {
                return true;
            }
        }
        false
    }

    fn move_character(world: &mut World, entity: Entity, displacement: Vec3) {
        let Some(origin) = world.get::<Transform>(entity).map(|t| t.translation) else {
            return;
        };
        let mut target = origin + displacement;

        if displacement.y < 0.0 {
            for entity_ref in world.iter_entities() {
                if entity_ref.id() == entity {
                    continue;
                }
                let Some(volume) = entity_ref.get::<GroundVolume>() else {
                    continue;
                };
                let Some(transform) = entity_ref.get::<GlobalTransform>() else {
                    continue;
                };
                let center = transform.translation();
                let min = center - volume.half_extents;
                let max = center + volume.half_extents;
                let inside_footprint = target.x >= min.x
                    && target.x <= max.x
                    && target.z >= min.z
                    && target.z <= max.z;
                if inside_footprint && target.y >= min.y && target.y < max.y {
                    target.y = max.y;
                }
            }
        }

        if let Some(mut transform) = world.get_mut::<Transform>(entity) {
            transform.translation = target;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_inside_box_overlaps() {
        assert!(sphere_overlaps_box(
            Vec3::ZERO,
            0.3,
            Vec3::ZERO,
            Vec3::splat(1.0)
        ));
    }

    #[test]
    fn sphere_touching_face_overlaps() {
        // Box top face at y=0.5, sphere center at y=0.7 with radius 0.28.
        assert!(sphere_overlaps_box(
            Vec3::new(0.0, 0.7, 0.0),
            0.28,
            Vec3::ZERO,
            Vec3::new(10.0, 0.5, 10.0)
        ));
    }

    #[test]
    fn sphere_clear_of_box_does_not_overlap() {
        assert!(!sphere_overlaps_box(
            Vec3::new(0.0, 1.0, 0.0),
            0.28,
            Vec3::ZERO,
            Vec3::new(10.0, 0.5, 10.0)
        ));
    }

    #[test]
    fn probe_respects_layer_mask() {
        let mut world = World::new();
        let transform = Transform::from_translation(Vec3::ZERO);
        world.spawn((
            transform,
            GlobalTransform::from(transform),
            GroundVolume::new(Vec3::splat(1.0)).with_layers(0b10),
        ));
        let probe = Vec3::new(0.0, 1.1, 0.0);

        assert!(KinematicBackend::check_sphere(
            &world,
            probe,
            0.3,
            0b10,
            Entity::PLACEHOLDER,
        ));
        assert!(!KinematicBackend::check_sphere(
            &world,
            probe,
            0.3,
            0b01,
            Entity::PLACEHOLDER,
        ));
    }

    #[test]
    fn probe_excludes_the_character_itself() {
        let mut world = World::new();
        let transform = Transform::from_translation(Vec3::ZERO);
        let body = world
            .spawn((
                transform,
                GlobalTransform::from(transform),
                GroundVolume::new(Vec3::splat(1.0)),
            ))
            .id();

        assert!(!KinematicBackend::check_sphere(
            &world,
            Vec3::ZERO,
            0.3,
            1,
            body,
        ));
    }

    #[test]
    fn downward_motion_snaps_to_the_ground_top() {
        let mut world = World::new();
        let ground = Transform::from_translation(Vec3::new(0.0, -0.5, 0.0));
        world.spawn((
            ground,
            GlobalTransform::from(ground),
            GroundVolume::new(Vec3::new(10.0, 0.5, 10.0)),
        ));
        let body = world.spawn(Transform::default()).id();

        KinematicBackend::move_character(&mut world, body, Vec3::new(0.1, -0.05, 0.0));

        let transform = world.get::<Transform>(body).unwrap();
        assert_eq!(transform.translation, Vec3::new(0.1, 0.0, 0.0));
    }

    #[test]
    fn downward_motion_past_a_volume_falls_through_its_side() {
        let mut world = World::new();
        let ground = Transform::from_translation(Vec3::new(0.0, -0.5, 0.0));
        world.spawn((
            ground,
            GlobalTransform::from(ground),
            GroundVolume::new(Vec3::new(1.0, 0.5, 1.0)),
        ));
        let body = world
            .spawn(Transform::from_translation(Vec3::new(5.0, 0.0, 0.0)))
            .id();

        KinematicBackend::move_character(&mut world, body, Vec3::new(0.0, -0.05, 0.0));

        let transform = world.get::<Transform>(body).unwrap();
        assert_eq!(transform.translation.y, -0.05);
    }

    #[test]
    fn move_character_shifts_the_transform() {
        let mut world = World::new();
        let body = world
            .spawn(Transform::from_translation(Vec3::new(1.0, 2.0, 3.0)))
            .id();

        KinematicBackend::move_character(&mut world, body, Vec3::new(0.5, -1.0, 0.0));

        let transform = world.get::<Transform>(body).unwrap();
        assert_eq!(transform.translation, Vec3::new(1.5, 1.0, 3.0));
    }
}
