//! Orbit camera rig.
//!
//! The rig accumulates yaw and pitch from look input, clamps pitch and
//! re-wraps yaw, and writes the resulting orientation to its own transform.
//! It updates in `PostUpdate`, after the body has moved for the tick, so the
//! view never lags the body by a frame.

use bevy::prelude::*;

use crate::input::{InputFrame, PlayerInput};
use crate::math::wrap_angle;

/// Look input below this magnitude is ignored.
pub const LOOK_THRESHOLD: f32 = 0.01;

/// Link from a character to the camera rig entity it steers.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct CameraTarget(pub Entity);

impl FromWorld for CameraTarget {
    /// Placeholder target; reflection-driven spawning patches it afterwards.
    fn from_world(_world: &mut World) -> Self {
        Self(Entity::PLACEHOLDER)
    }
}

/// Yaw/pitch accumulator for a third-person camera.
///
/// Look input is applied without delta-time scaling: mouse deltas are
/// already per-frame quantities, and scaling them would couple look speed to
/// frame rate the wrong way around.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct CameraRig {
    /// Degrees of look input per unit of look axis.
    pub sensitivity: f32,
    /// Highest pitch the camera can reach, in degrees.
    pub top_clamp: f32,
    /// Lowest pitch the camera can reach, in degrees.
    pub bottom_clamp: f32,
    /// Additional pitch applied on output. Useful when the rig is locked.
    pub angle_override: f32,
    /// When true the rig ignores look input entirely.
    pub locked: bool,
    yaw: f32,
    pitch: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            sensitivity: 1.0,
            top_clamp: 70.0,
            bottom_clamp: -30.0,
            angle_override: 0.0,
            locked: false,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl CameraRig {
    /// Create a rig with the default clamps and sensitivity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the look sensitivity.
    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Builder: set the pitch clamps in degrees.
    pub fn with_pitch_clamps(mut self, bottom: f32, top: f32) -> Self {
        self.bottom_clamp = bottom;
        self.top_clamp = top;
        self
    }

    /// Current yaw in degrees. Locomotion reads this to make movement input
    /// camera-relative.
    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Current pitch in degrees, before the override is applied.
    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Accumulate one tick of look input.
    pub fn update(&mut self, frame: &InputFrame) {
        if frame.look_amount >= LOOK_THRESHOLD && !self.locked {
            self.yaw += frame.look.x * self.sensitivity;
            self.pitch += frame.look.y * self.sensitivity;
        }

        self.yaw = wrap_angle(self.yaw, f32::MIN, f32::MAX);
        self.pitch = wrap_angle(self.pitch, self.bottom_clamp, self.top_clamp);
    }

    /// Final rig orientation: `(pitch + override, yaw, 0)`.
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw.to_radians(),
            (self.pitch + self.angle_override).to_radians(),
            0.0,
        )
    }
}

/// Drive each character's rig from its sampled look input.
pub fn update_camera_rig(
    players: Query<(&PlayerInput, &CameraTarget)>,
    mut rigs: Query<(&mut CameraRig, &mut Transform)>,
) {
    for (input, target) in &players {
        let Ok((mut rig, mut transform)) = rigs.get_mut(target.0) else {
            continue;
        };
        rig.update(&input.frame);
        transform.rotation = rig.orientation();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RawInput;

    fn frame(look: Vec2) -> InputFrame {
        InputFrame::from_raw(&RawInput {
            look,
            ..default()
        })
    }

    #[test]
    fn look_input_accumulates() {
        let mut rig = CameraRig::new();
        rig.update(&frame(Vec2::new(1.0, 0.5)));
        assert_eq!(rig.yaw(), 1.0);
        assert_eq!(rig.pitch(), 0.5);
    }

    #[test]
    fn sensitivity_scales_input() {
        let mut rig = CameraRig::new().with_sensitivity(2.0);
        rig.update(&frame(Vec2::new(1.0, 0.0)));
        assert_eq!(rig.yaw(), 2.0);
    }

    #[test]
    fn below_threshold_input_is_ignored() {
        let mut rig = CameraRig::new();
        rig.update(&frame(Vec2::new(0.004, 0.004)));
        assert_eq!(rig.yaw(), 0.0);
        assert_eq!(rig.pitch(), 0.0);
    }

    #[test]
    fn locked_rig_ignores_input() {
        let mut rig = CameraRig::new();
        rig.locked = true;
        rig.update(&frame(Vec2::new(1.0, 1.0)));
        assert_eq!(rig.yaw(), 0.0);
        assert_eq!(rig.pitch(), 0.0);
    }

    #[test]
    fn pitch_stays_within_clamps() {
        let mut rig = CameraRig::new().with_pitch_clamps(-30.0, 70.0);
        for _ in 0..200 {
            rig.update(&frame(Vec2::new(0.0, 1.0)));
        }
        assert_eq!(rig.pitch(), 70.0);

        for _ in 0..400 {
            rig.update(&frame(Vec2::new(0.0, -1.0)));
        }
        assert_eq!(rig.pitch(), -30.0);
    }

    #[test]
    fn yaw_rewraps_after_full_turns() {
        let mut rig = CameraRig::new().with_sensitivity(10.0);
        for _ in 0..1000 {
            rig.update(&frame(Vec2::new(1.0, 0.0)));
            let yaw = rig.yaw();
            assert!((-360.0..=360.0).contains(&yaw), "yaw left the band: {yaw}");
        }
    }

    #[test]
    fn orientation_includes_the_angle_override() {
        let mut rig = CameraRig::new();
        rig.angle_override = 10.0;
        rig.update(&frame(Vec2::new(0.0, 0.5)));

        let expected = Quat::from_euler(
            EulerRot::YXZ,
            0.0_f32.to_radians(),
            10.5_f32.to_radians(),
            0.0,
        );
        assert!(rig.orientation().angle_between(expected) < 1e-5);
    }
}
