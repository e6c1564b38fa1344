//! Locomotion state machine.
//!
//! Owns the per-tick movement pipeline: gravity integration, the ground
//! probe, the one-shot climb pulse, the post-landing stun and horizontal
//! movement with camera-relative steering. Each tick produces a displacement
//! for the physics backend and a fresh set of animation parameters.

use bevy::prelude::*;
use rand::Rng;

use crate::animation::{AnimParam, AnimationParams};
use crate::audio::{CharacterSounds, PlayClipIntent};
use crate::backend::CharacterPhysicsBackend;
use crate::camera::{CameraRig, CameraTarget};
use crate::input::PlayerInput;
use crate::math::{lerp, smooth_damp_angle};
use crate::timer::Countdown;

/// Tuning for one character's locomotion.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct LocomotionConfig {
    /// Walking speed in units/second.
    pub move_speed: f32,
    /// Sprinting speed in units/second.
    pub sprint_speed: f32,
    /// Time to smooth the facing yaw toward the steering direction.
    pub rotation_smooth_time: f32,
    /// Rate at which speed approaches its target. Values around 100 are
    /// effectively instant at 60 Hz.
    pub speed_change_rate: f32,
    /// Vertical acceleration. The character uses its own gravity value
    /// rather than a global one.
    pub gravity: f32,
    /// Downward speed below which gravity stops accumulating.
    pub min_falling_speed: f32,
    /// Upward speed above which gravity stops accumulating.
    pub terminal_velocity: f32,
    /// Time airborne before the free-fall animation state engages. Keeps
    /// stair descent out of the fall animation.
    pub fall_timeout: f32,
    /// Longest the character can be rooted in place after a landing.
    pub land_speed_timeout_max: f32,
    /// Scales time-spent-airborne into the landing stun duration.
    pub land_stand_multiplier: f32,
    /// Vertical offset of the ground probe sphere. Negative values raise
    /// the sphere; useful for rough ground.
    pub grounded_offset: f32,
    /// Radius of the ground probe sphere. Should match the body's radius.
    pub grounded_radius: f32,
    /// Layer bits the probe treats as ground.
    pub ground_layers: u32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            move_speed: 1.5,
            sprint_speed: 4.0,
            rotation_smooth_time: 0.12,
            speed_change_rate: 100.0,
            gravity: -15.0,
            min_falling_speed: -15.0,
            terminal_velocity: 53.0,
            fall_timeout: 0.15,
            land_speed_timeout_max: 1.0,
            land_stand_multiplier: 1.5,
            grounded_offset: -0.14,
            grounded_radius: 0.28,
            ground_layers: 1,
        }
    }
}

impl LocomotionConfig {
    /// Builder: set walk and sprint speeds.
    pub fn with_speeds(mut self, move_speed: f32, sprint_speed: f32) -> Self {
        self.move_speed = move_speed;
        self.sprint_speed = sprint_speed;
        self
    }

    /// Builder: set the speed approach rate.
    pub fn with_speed_change_rate(mut self, rate: f32) -> Self {
        self.speed_change_rate = rate;
        self
    }

    /// Builder: set gravity.
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Builder: set the ground probe offset and radius.
    pub fn with_ground_probe(mut self, offset: f32, radius: f32) -> Self {
        self.grounded_offset = offset;
        self.grounded_radius = radius;
        self
    }

    /// Builder: set the ground layer bits.
    pub fn with_ground_layers(mut self, layers: u32) -> Self {
        self.ground_layers = layers;
        self
    }

    /// Builder: set the fall timeout.
    pub fn with_fall_timeout(mut self, secs: f32) -> Self {
        self.fall_timeout = secs;
        self
    }

    /// Builder: set the landing stun cap and multiplier.
    pub fn with_landing_stun(mut self, max_secs: f32, multiplier: f32) -> Self {
        self.land_speed_timeout_max = max_secs;
        self.land_stand_multiplier = multiplier;
        self
    }

    /// World-space center of the ground probe for a body at `position`.
    #[inline]
    pub fn probe_center(&self, position: Vec3) -> Vec3 {
        Vec3::new(
            position.x,
            position.y - self.grounded_offset,
            position.z,
        )
    }
}

/// The displacement and facing produced by one movement step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovePlan {
    /// World-space displacement to hand to the physics backend.
    pub displacement: Vec3,
    /// New facing yaw in degrees, present only when there was movement
    /// input this tick.
    pub face_yaw: Option<f32>,
}

/// Locomotion state for one character.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct Locomotion {
    /// Result of this tick's ground probe.
    pub grounded: bool,
    /// Climb pulse flag. Never survives past a tick; see `handle_climb`.
    pub is_climbing: bool,
    /// Current horizontal speed, smoothed.
    pub speed: f32,
    /// Animation blend speed; approaches the target even mid-air, so it can
    /// lag the true speed.
    pub animation_blend: f32,
    /// Signed vertical speed.
    pub vertical_velocity: f32,
    /// Facing yaw in degrees.
    pub yaw: f32,
    /// Seconds spent airborne since the last landing.
    pub in_air_time: f32,
    target_yaw: f32,
    yaw_velocity: f32,
    fall_timer: Countdown,
    land_timer: Countdown,
}

impl Default for Locomotion {
    fn default() -> Self {
        Self::new(&LocomotionConfig::default())
    }
}

impl Locomotion {
    /// Create locomotion state matching the given config.
    pub fn new(config: &LocomotionConfig) -> Self {
        Self {
            grounded: true,
            is_climbing: false,
            speed: 0.0,
            animation_blend: 0.0,
            vertical_velocity: 0.0,
            yaw: 0.0,
            in_air_time: 0.0,
            target_yaw: 0.0,
            yaw_velocity: 0.0,
            fall_timer: Countdown::new(config.fall_timeout),
            land_timer: Countdown::ready(config.land_speed_timeout_max),
        }
    }

    /// Whether the post-landing stun still suppresses movement.
    #[inline]
    pub fn stunned(&self) -> bool {
        !self.land_timer.expired()
    }

    /// Remaining landing stun in seconds.
    #[inline]
    pub fn stun_remaining(&self) -> f32 {
        self.land_timer.remaining().max(0.0)
    }

    /// Advance the landing stun window. Runs first each tick.
    pub fn tick_stun(&mut self, dt: f32) {
        self.land_timer.tick(dt);
    }

    /// Integrate gravity and track airborne time.
    ///
    /// Uses the previous tick's grounded flag: the probe result lands after
    /// this step each tick. While grounded, a negative vertical velocity is
    /// pinned at -2 so it cannot run away while standing. While airborne,
    /// the climb pulse is forced off and the free-fall flag raises once the
    /// fall timeout elapses. Gravity accumulates only while the velocity is
    /// strictly inside the falling band.
    pub fn apply_gravity(
        &mut self,
        config: &LocomotionConfig,
        input: &mut PlayerInput,
        mut anim: Option<&mut AnimationParams>,
        dt: f32,
    ) {
        if self.grounded {
            self.fall_timer.reset();
            if let Some(anim) = anim.as_deref_mut() {
                anim.set_bool(AnimParam::FreeFall, false);
            }
            if self.vertical_velocity < 0.0 {
                self.vertical_velocity = -2.0;
            }
        } else {
            self.in_air_time += dt;
            self.fall_timer.tick(dt);
            if self.fall_timer.expired() {
                if let Some(anim) = anim.as_deref_mut() {
                    anim.set_bool(AnimParam::FreeFall, true);
                }
            }
            // no climbing while airborne
            input.climb = false;
        }

        if self.vertical_velocity > config.min_falling_speed
            && self.vertical_velocity < config.terminal_velocity
        {
            self.vertical_velocity += config.gravity * dt;
        }
    }

    /// Record this tick's ground probe result.
    pub fn set_grounded(&mut self, grounded: bool, anim: Option<&mut AnimationParams>) {
        self.grounded = grounded;
        if let Some(anim) = anim {
            anim.set_bool(AnimParam::Grounded, grounded);
        }
    }

    /// Fire the climb pulse.
    ///
    /// Climbing is a one-shot trigger: the flag is raised and dropped within
    /// the same tick, so observers only ever see the pulse through the
    /// animation trigger. There is no sustained climbing state.
    pub fn handle_climb(&mut self, input: &PlayerInput, anim: Option<&mut AnimationParams>) {
        if input.climb && !self.is_climbing {
            debug!("climb");
            if let Some(anim) = anim {
                anim.fire(AnimParam::Climb);
            }
            self.is_climbing = true;
        }

        self.is_climbing = false;
    }

    /// One tick of horizontal movement. Skipped entirely while stunned.
    ///
    /// Speed approaches its target only while grounded (momentum is
    /// preserved mid-air) and is rounded to three decimals for deterministic
    /// animation blending. Steering is camera-relative: the input direction
    /// is rotated by the rig's yaw, the facing smooth-damps toward it, and
    /// the displacement runs along the steering target, not the smoothed
    /// facing.
    pub fn plan_movement(
        &mut self,
        config: &LocomotionConfig,
        input: &mut PlayerInput,
        mut anim: Option<&mut AnimationParams>,
        camera_yaw: f32,
        dt: f32,
    ) -> MovePlan {
        let movement = input.frame.movement;
        // Stick noise below 1e-5 per axis counts as no input.
        let has_input = movement.length_squared() >= 1e-10;
        let mut target_speed = if input.is_sprinting {
            config.sprint_speed
        } else {
            config.move_speed
        };
        if !has_input {
            target_speed = 0.0;
        }

        let speed_offset = 0.1;
        let input_magnitude = 1.0;

        // a collapsed speed drops the sprint toggle
        if self.speed < 0.05 {
            input.is_sprinting = false;
        }

        if self.grounded {
            if self.speed < target_speed - speed_offset || self.speed > target_speed + speed_offset
            {
                self.speed = lerp(
                    self.speed,
                    target_speed * input_magnitude,
                    dt * config.speed_change_rate,
                );
                self.speed = (self.speed * 1000.0).round() / 1000.0;
            } else {
                self.speed = target_speed;
            }
        }

        self.animation_blend = lerp(
            self.animation_blend,
            target_speed,
            dt * config.speed_change_rate,
        );
        if self.animation_blend < 0.01 {
            self.animation_blend = 0.0;
        }

        let mut face_yaw = None;
        if has_input {
            let input_direction = Vec3::new(movement.x, 0.0, movement.y).normalize_or_zero();
            self.target_yaw =
                input_direction.x.atan2(input_direction.z).to_degrees() + camera_yaw;
            self.yaw = smooth_damp_angle(
                self.yaw,
                self.target_yaw,
                &mut self.yaw_velocity,
                config.rotation_smooth_time,
                dt,
            );
            face_yaw = Some(self.yaw);
        }

        let target_rad = self.target_yaw.to_radians();
        let target_direction = Vec3::new(target_rad.sin(), 0.0, target_rad.cos());
        let displacement = target_direction.normalize_or_zero() * (self.speed * dt)
            + Vec3::new(0.0, self.vertical_velocity, 0.0) * dt;

        if let Some(anim) = anim.as_deref_mut() {
            anim.set_float(AnimParam::Speed, self.animation_blend);
            anim.set_float(AnimParam::MotionSpeed, input_magnitude);
        }

        MovePlan {
            displacement,
            face_yaw,
        }
    }

    /// Landing: zero the speed and arm the stun from time spent airborne.
    ///
    /// Returns the stun duration in seconds.
    pub fn begin_landing(&mut self, config: &LocomotionConfig) -> f32 {
        self.speed = 0.0;
        self.in_air_time *= config.land_stand_multiplier;
        let stun = self
            .in_air_time
            .clamp(0.0, config.land_speed_timeout_max);
        self.land_timer.arm(stun);
        self.in_air_time = 0.0;
        stun
    }
}

/// Out-of-band notifications from the animation collaborator.
///
/// These fire once per qualifying clip event, not per tick.
#[derive(Event, Debug, Clone, Copy)]
pub struct AnimationCallback {
    pub entity: Entity,
    pub kind: CallbackKind,
}

/// What the animation timeline reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CallbackKind {
    /// A footstep frame, with the weight of the clip that produced it.
    Footstep { clip_weight: f32 },
    /// The landing frame of a fall.
    Land,
}

/// React to footstep and landing callbacks.
///
/// Landing roots the character (see [`Locomotion::begin_landing`]) and plays
/// the landing clip; footsteps with enough clip weight play a random
/// footstep clip. Both are idempotent per callback.
pub fn handle_animation_callbacks(
    mut callbacks: EventReader<AnimationCallback>,
    mut characters: Query<(
        &mut Locomotion,
        &LocomotionConfig,
        Option<&mut AnimationParams>,
        Option<&CharacterSounds>,
        &GlobalTransform,
    )>,
    mut sounds: EventWriter<PlayClipIntent>,
) {
    for callback in callbacks.read() {
        let Ok((mut state, config, anim, clips, transform)) = characters.get_mut(callback.entity)
        else {
            continue;
        };

        match callback.kind {
            CallbackKind::Land => {
                let stun = state.begin_landing(config);
                if let Some(mut anim) = anim {
                    anim.set_float(AnimParam::Speed, 0.0);
                }
                info!("standing for {stun:.3} seconds after landing");
                if let Some(clips) = clips {
                    sounds.send(PlayClipIntent {
                        clip: clips.landing.clone(),
                        position: transform.translation(),
                        volume: clips.footstep_volume,
                    });
                }
            }
            CallbackKind::Footstep { clip_weight } => {
                if clip_weight <= 0.5 {
                    continue;
                }
                let Some(clips) = clips else { continue };
                if clips.footsteps.is_empty() {
                    continue;
                }
                let index = rand::thread_rng().gen_range(0..clips.footsteps.len());
                sounds.send(PlayClipIntent {
                    clip: clips.footsteps[index].clone(),
                    position: transform.translation(),
                    volume: clips.footstep_volume,
                });
            }
        }
    }
}

/// Advance every character's locomotion by one tick.
///
/// Runs as an exclusive system so the backend can be asked for the ground
/// probe and the final move against the same world. Order within the tick:
/// stun countdown, gravity (against last tick's grounded flag), ground
/// probe, climb pulse, then movement unless stunned. A stunned character
/// does not move at all, vertical velocity included.
pub fn update_locomotion<B: CharacterPhysicsBackend>(world: &mut World) {
    let dt = world.resource::<Time>().delta_secs();

    let characters: Vec<(Entity, LocomotionConfig, Option<Entity>)> = world
        .query_filtered::<(Entity, &LocomotionConfig, Option<&CameraTarget>), With<Locomotion>>()
        .iter(world)
        .map(|(entity, config, target)| (entity, *config, target.map(|t| t.0)))
        .collect();

    for (entity, config, camera) in characters {
        let camera_yaw = camera
            .and_then(|rig| world.get::<CameraRig>(rig))
            .map(|rig| rig.yaw())
            .unwrap_or(0.0);
        let position = world
            .get::<GlobalTransform>(entity)
            .map(|t| t.translation())
            .unwrap_or(Vec3::ZERO);
        let grounded = B::check_sphere(
            world,
            config.probe_center(position),
            config.grounded_radius,
            config.ground_layers,
            entity,
        );

        let Some(mut state) = world.get::<Locomotion>(entity).cloned() else {
            continue;
        };
        let Some(mut input) = world.get::<PlayerInput>(entity).cloned() else {
            continue;
        };
        let mut anim = world.get::<AnimationParams>(entity).cloned();

        state.tick_stun(dt);
        state.apply_gravity(&config, &mut input, anim.as_mut(), dt);
        state.set_grounded(grounded, anim.as_mut());
        state.handle_climb(&input, anim.as_mut());

        let plan = if state.stunned() {
            None
        } else {
            Some(state.plan_movement(&config, &mut input, anim.as_mut(), camera_yaw, dt))
        };

        if let Some(plan) = plan {
            B::move_character(world, entity, plan.displacement);
            if let Some(yaw) = plan.face_yaw {
                if let Some(mut transform) = world.get_mut::<Transform>(entity) {
                    transform.rotation = Quat::from_rotation_y(yaw.to_radians());
                }
            }
        }

        if let Some(mut stored) = world.get_mut::<Locomotion>(entity) {
            *stored = state;
        }
        if let Some(mut stored) = world.get_mut::<PlayerInput>(entity) {
            *stored = input;
        }
        if let Some(anim) = anim {
            if let Some(mut stored) = world.get_mut::<AnimationParams>(entity) {
                *stored = anim;
            }
        }
    }
}
