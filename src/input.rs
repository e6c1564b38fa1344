//! Input sampling.
//!
//! The external input collaborator writes normalized device values into the
//! [`RawInput`] resource every tick. [`sample_input`] then derives a
//! [`PlayerInput`] snapshot per character: quantized move amount, clamped
//! look axes, the debounced sprint toggle and the climb pulse. The snapshot
//! is overwritten wholesale each tick; no input history is kept.

use bevy::prelude::*;

use crate::timer::Countdown;

/// A climb trigger engages at this analog value and above.
pub const CLIMB_ENGAGE: f32 = 0.9;

/// Normalized device values for the current tick.
///
/// Whatever binds the actual devices (keyboard, gamepad, replay, AI) writes
/// this resource once per tick; the controller only ever polls it.
#[derive(Resource, Reflect, Debug, Clone, Default)]
#[reflect(Resource)]
pub struct RawInput {
    /// Movement vector, each axis in `[-1, 1]`.
    pub movement: Vec2,
    /// Look vector. Clamped per-axis during sampling.
    pub look: Vec2,
    /// Sprint trigger value. The toggle fires at exactly `1.0`.
    pub sprint_axis: f32,
    /// Climb trigger value. Engages at [`CLIMB_ENGAGE`] and above.
    pub climb_axis: f32,
    pub interact: bool,
    pub light_attack: bool,
    pub heavy_attack: bool,
    pub test_button: bool,
}

/// Per-tick derived input snapshot.
#[derive(Reflect, Debug, Clone, Copy, Default)]
pub struct InputFrame {
    /// Raw movement vector.
    pub movement: Vec2,
    /// Look vector with each axis clamped to `[-1, 1]`.
    pub look: Vec2,
    /// Quantized movement magnitude: exactly `0.0`, `0.5` or `1.0`.
    pub move_amount: f32,
    /// `|look.x| + |look.y|` after clamping; gates camera updates.
    pub look_amount: f32,
    pub sprint_axis: f32,
    pub climb_axis: f32,
    pub interact: bool,
    pub light_attack: bool,
    pub heavy_attack: bool,
    pub test_button: bool,
    /// True only while neither attack button is held; lets the attack lock
    /// clear.
    pub unlock_attack: bool,
}

impl InputFrame {
    /// Derive a frame from the raw device values.
    pub fn from_raw(raw: &RawInput) -> Self {
        let look = Vec2::new(
            raw.look.x.clamp(-1.0, 1.0),
            raw.look.y.clamp(-1.0, 1.0),
        );
        Self {
            movement: raw.movement,
            look,
            move_amount: quantize_move_amount(
                raw.movement.x.abs() + raw.movement.y.abs(),
            ),
            look_amount: look.x.abs() + look.y.abs(),
            sprint_axis: raw.sprint_axis,
            climb_axis: raw.climb_axis,
            interact: raw.interact,
            light_attack: raw.light_attack,
            heavy_attack: raw.heavy_attack,
            test_button: raw.test_button,
            unlock_attack: !raw.light_attack && !raw.heavy_attack,
        }
    }
}

/// Quantize a movement magnitude into the three speed tiers.
///
/// The raw value is clamped to `[0, 1]` first; anything in `(0, 0.5]` walks
/// at half tier, anything above runs at full tier. The animation blend tree
/// expects exactly these three values.
pub fn quantize_move_amount(raw: f32) -> f32 {
    let amount = raw.clamp(0.0, 1.0);
    if amount > 0.5 {
        1.0
    } else if amount > 0.0 {
        0.5
    } else {
        0.0
    }
}

/// Debounce configuration for the sprint toggle and the climb trigger.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct InputConfig {
    /// Minimum interval between two sprint toggles, in seconds.
    pub sprint_timeout: f32,
    /// Cooldown before another climb can be attempted, in seconds.
    pub climb_timeout: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            sprint_timeout: 1.0,
            climb_timeout: 0.5,
        }
    }
}

/// Sampled input state for one character.
///
/// Holds the current [`InputFrame`] plus the only two pieces of input-side
/// state that survive across ticks: the sprint toggle and the climb pulse,
/// each guarded by its own countdown.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct PlayerInput {
    /// Snapshot for the current tick.
    pub frame: InputFrame,
    /// Sprint toggle. Flips on a fully-pressed sprint trigger once the
    /// debounce countdown has run out.
    pub is_sprinting: bool,
    /// Climb pulse. True for at most one tick per engaged climb trigger.
    pub climb: bool,
    sprint_timer: Countdown,
    climb_timer: Countdown,
}

impl Default for PlayerInput {
    fn default() -> Self {
        Self::new(&InputConfig::default())
    }
}

impl PlayerInput {
    /// Create input state with the given debounce configuration.
    ///
    /// Both countdowns start running, so neither sprint nor climb can fire
    /// during the first debounce window after spawn.
    pub fn new(config: &InputConfig) -> Self {
        Self {
            frame: InputFrame::default(),
            is_sprinting: false,
            climb: false,
            sprint_timer: Countdown::new(config.sprint_timeout),
            climb_timer: Countdown::new(config.climb_timeout),
        }
    }

    /// Refresh the snapshot and advance the sprint/climb debounce state.
    ///
    /// Re-armed windows come from `config`, so a changed [`InputConfig`]
    /// takes effect from the next toggle on.
    pub fn sample(&mut self, raw: &RawInput, config: &InputConfig, dt: f32) {
        self.frame = InputFrame::from_raw(raw);

        self.sprint_timer.tick(dt);
        if self.sprint_timer.expired() && self.frame.sprint_axis == 1.0 {
            self.is_sprinting = !self.is_sprinting;
            self.sprint_timer.arm(config.sprint_timeout);
        }

        self.climb_timer.tick(dt);
        if self.frame.climb_axis >= CLIMB_ENGAGE && self.climb_timer.expired() {
            self.climb = true;
            self.climb_timer.arm(config.climb_timeout);
        } else {
            self.climb = false;
        }
    }

    /// Force the sprint toggle off and restart its debounce window.
    ///
    /// Called when locomotion collapses the speed to near zero, and available
    /// to scripted sequences.
    pub fn reset_sprint(&mut self) {
        self.is_sprinting = false;
        self.sprint_timer.reset();
    }
}

/// Poll [`RawInput`] into every character's [`PlayerInput`] snapshot.
///
/// Characters without an [`InputConfig`] component use the defaults.
pub fn sample_input(
    time: Res<Time>,
    raw: Res<RawInput>,
    mut players: Query<(&mut PlayerInput, Option<&InputConfig>)>,
) {
    for (mut input, config) in &mut players {
        let config = config.copied().unwrap_or_default();
        input.sample(&raw, &config, time.delta_secs());
    }
}
