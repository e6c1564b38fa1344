//! Save data container.
//!
//! A flat record captured from and applied to the character wholesale.
//! The on-disk format is up to the caller; the record just derives serde.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::vitals::PlayerVitals;

/// Everything persisted for a character.
///
/// Rotation is stored as euler angles in degrees, `(pitch, yaw, roll)`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SaveData {
    pub player_position: Vec3,
    pub player_rotation: Vec3,
    pub maintenance: i32,
    pub battery: i32,
}

impl SaveData {
    /// Capture the current character state.
    pub fn capture(transform: &Transform, vitals: &PlayerVitals) -> Self {
        let (yaw, pitch, roll) = transform.rotation.to_euler(EulerRot::YXZ);
        Self {
            player_position: transform.translation,
            player_rotation: Vec3::new(
                pitch.to_degrees(),
                yaw.to_degrees(),
                roll.to_degrees(),
            ),
            maintenance: vitals.maintenance,
            battery: vitals.battery,
        }
    }

    /// Apply a loaded record back onto the character.
    pub fn apply(&self, transform: &mut Transform, vitals: &mut PlayerVitals) {
        transform.translation = self.player_position;
        transform.rotation = Quat::from_euler(
            EulerRot::YXZ,
            self.player_rotation.y.to_radians(),
            self.player_rotation.x.to_radians(),
            self.player_rotation.z.to_radians(),
        );
        vitals.maintenance = self.maintenance;
        vitals.battery = self.battery;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_then_apply_restores_the_character() {
        let mut transform = Transform::from_translation(Vec3::new(4.0, 1.0, -2.5));
        transform.rotation = Quat::from_rotation_y(90.0_f32.to_radians());
        let mut vitals = PlayerVitals {
            maintenance: 60,
            damage: 10,
            battery: 45,
        };

        let data = SaveData::capture(&transform, &vitals);

        let mut restored_transform = Transform::default();
        let mut restored_vitals = PlayerVitals::default();
        data.apply(&mut restored_transform, &mut restored_vitals);

        assert_eq!(restored_transform.translation, transform.translation);
        assert!(restored_transform.rotation.angle_between(transform.rotation) < 1e-4);
        assert_eq!(restored_vitals.maintenance, 60);
        assert_eq!(restored_vitals.battery, 45);
    }

    #[test]
    fn apply_does_not_touch_damage() {
        let data = SaveData {
            player_position: Vec3::ZERO,
            player_rotation: Vec3::ZERO,
            maintenance: 50,
            battery: 50,
        };
        let mut transform = Transform::default();
        let mut vitals = PlayerVitals {
            damage: 25,
            ..default()
        };
        data.apply(&mut transform, &mut vitals);
        assert_eq!(vitals.damage, 25);
    }

    #[test]
    fn serializes_as_a_whole_record() {
        let data = SaveData {
            player_position: Vec3::new(1.0, 2.0, 3.0),
            player_rotation: Vec3::new(0.0, 180.0, 0.0),
            maintenance: 100,
            battery: 80,
        };
        let json = serde_json::to_string(&data).unwrap();
        let back: SaveData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }
}
