//! Animation parameter snapshot.
//!
//! The controller never plays animation clips itself. It publishes a small
//! set of typed parameters each tick, and the animation collaborator reads
//! them as a snapshot. Parameters are keyed by [`AnimParam`] rather than
//! hashed strings, so a typo is a compile error instead of a silent miss.

use bevy::prelude::*;

/// The parameters the controller drives.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimParam {
    /// Smoothed locomotion blend speed (float).
    Speed,
    /// Whether the ground probe reports contact (bool).
    Grounded,
    /// One-tick climb trigger.
    Climb,
    /// Whether the fall timeout has elapsed while airborne (bool).
    FreeFall,
    /// Input magnitude driving motion playback rate (float).
    MotionSpeed,
}

/// A parameter value as seen by the animation collaborator.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub enum AnimValue {
    Float(f32),
    Bool(bool),
    /// A trigger that is pending until taken.
    Trigger(bool),
}

/// Current animation parameter values for one character.
///
/// This component is optional: a character without it simply emits no
/// animation intents, and every controller system tolerates its absence.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct AnimationParams {
    speed: f32,
    motion_speed: f32,
    grounded: bool,
    free_fall: bool,
    climb_pending: bool,
}

impl AnimationParams {
    /// Set a float parameter. Logs and ignores non-float keys.
    pub fn set_float(&mut self, param: AnimParam, value: f32) {
        match param {
            AnimParam::Speed => self.speed = value,
            AnimParam::MotionSpeed => self.motion_speed = value,
            other => warn!("{other:?} is not a float animation parameter"),
        }
    }

    /// Set a boolean parameter. Logs and ignores non-boolean keys.
    pub fn set_bool(&mut self, param: AnimParam, value: bool) {
        match param {
            AnimParam::Grounded => self.grounded = value,
            AnimParam::FreeFall => self.free_fall = value,
            other => warn!("{other:?} is not a boolean animation parameter"),
        }
    }

    /// Fire a trigger parameter. Logs and ignores non-trigger keys.
    pub fn fire(&mut self, param: AnimParam) {
        match param {
            AnimParam::Climb => self.climb_pending = true,
            other => warn!("{other:?} is not a trigger animation parameter"),
        }
    }

    /// Read the current value of a parameter.
    pub fn get(&self, param: AnimParam) -> AnimValue {
        match param {
            AnimParam::Speed => AnimValue::Float(self.speed),
            AnimParam::MotionSpeed => AnimValue::Float(self.motion_speed),
            AnimParam::Grounded => AnimValue::Bool(self.grounded),
            AnimParam::FreeFall => AnimValue::Bool(self.free_fall),
            AnimParam::Climb => AnimValue::Trigger(self.climb_pending),
        }
    }

    /// Consume a pending trigger, returning whether it was set.
    ///
    /// The animation collaborator calls this once per tick per trigger; a
    /// trigger observed is a trigger cleared.
    pub fn take_trigger(&mut self, param: AnimParam) -> bool {
        match param {
            AnimParam::Climb => std::mem::take(&mut self.climb_pending),
            other => {
                warn!("{other:?} is not a trigger animation parameter");
                false
            }
        }
    }

    /// Convenience accessor for float parameters, `0.0` for other kinds.
    pub fn float(&self, param: AnimParam) -> f32 {
        match self.get(param) {
            AnimValue::Float(v) => v,
            _ => 0.0,
        }
    }

    /// Convenience accessor for boolean parameters, `false` for other kinds.
    pub fn flag(&self, param: AnimParam) -> bool {
        match self.get(param) {
            AnimValue::Bool(v) => v,
            _ => false,
        }
    }
}
