//! Third-person character controller for Bevy.
//!
//! Drives a single-character locomotion state machine (grounded movement,
//! gravity, fall detection, post-landing stun, climb pulse), an orbit camera
//! rig, a one-shot attack gate and a debounced blade stow/draw toggle, all
//! from one polled [`RawInput`](input::RawInput) resource. Collision is
//! delegated to a pluggable [`CharacterPhysicsBackend`]; the crate ships a
//! transform-based [`KinematicBackend`](kinematic::KinematicBackend).
//!
//! ```no_run
//! use bevy::prelude::*;
//! use third_person_controller::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(ThirdPersonControllerPlugin::<KinematicBackend>::default())
//!         .add_systems(Startup, spawn_player)
//!         .run();
//! }
//!
//! fn spawn_player(mut commands: Commands) {
//!     let rig = commands.spawn((CameraRig::new(), Transform::default())).id();
//!     commands.spawn((
//!         Transform::default(),
//!         Locomotion::default(),
//!         LocomotionConfig::default(),
//!         PlayerInput::default(),
//!         AnimationParams::default(),
//!         CameraTarget(rig),
//!     ));
//! }
//! ```

use std::marker::PhantomData;

use bevy::prelude::*;

pub mod animation;
pub mod attack;
pub mod audio;
pub mod backend;
pub mod blade;
pub mod camera;
pub mod input;
pub mod kinematic;
pub mod locomotion;
pub mod math;
pub mod save;
pub mod timer;
pub mod vitals;

pub use backend::CharacterPhysicsBackend;

/// Common imports for crate consumers.
pub mod prelude {
    pub use crate::animation::{AnimParam, AnimValue, AnimationParams};
    pub use crate::attack::{AttackEvent, AttackGate, AttackKind, Weapon, WeaponItem};
    pub use crate::audio::{CharacterSounds, PlayClipIntent};
    pub use crate::backend::{CharacterPhysicsBackend, NoOpBackendPlugin};
    pub use crate::blade::{BladeAnchors, BladeToggle, StowBlades};
    pub use crate::camera::{CameraRig, CameraTarget};
    pub use crate::input::{InputConfig, PlayerInput, RawInput};
    pub use crate::kinematic::{GroundVolume, KinematicBackend};
    pub use crate::locomotion::{
        AnimationCallback, CallbackKind, Locomotion, LocomotionConfig,
    };
    pub use crate::save::SaveData;
    pub use crate::vitals::{InteractEvent, PlayerVitals};
    pub use crate::ThirdPersonControllerPlugin;
}

/// The controller plugin, generic over the physics backend.
///
/// Registers the controller's reflected types and events, installs the
/// backend's own plugin and wires the per-tick pipeline: input sampling,
/// interaction intents, animation callbacks, locomotion, the attack gate and
/// the blade toggle run chained in `Update`; the camera rig follows in
/// `PostUpdate` so the view never lags the body.
pub struct ThirdPersonControllerPlugin<B: CharacterPhysicsBackend> {
    _backend: PhantomData<B>,
}

impl<B: CharacterPhysicsBackend> Default for ThirdPersonControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _backend: PhantomData,
        }
    }
}

impl<B: CharacterPhysicsBackend> Plugin for ThirdPersonControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        app.register_type::<animation::AnimationParams>()
            .register_type::<attack::AttackGate>()
            .register_type::<attack::WeaponItem>()
            .register_type::<blade::BladeToggle>()
            .register_type::<camera::CameraRig>()
            .register_type::<camera::CameraTarget>()
            .register_type::<input::InputConfig>()
            .register_type::<input::PlayerInput>()
            .register_type::<input::RawInput>()
            .register_type::<kinematic::GroundVolume>()
            .register_type::<locomotion::Locomotion>()
            .register_type::<locomotion::LocomotionConfig>()
            .register_type::<vitals::PlayerVitals>()
            .init_resource::<input::RawInput>()
            .add_event::<locomotion::AnimationCallback>()
            .add_event::<audio::PlayClipIntent>()
            .add_event::<attack::AttackEvent>()
            .add_event::<vitals::InteractEvent>()
            .add_event::<blade::StowBlades>()
            .add_plugins(B::plugin())
            .add_systems(PostStartup, validate_character_setup)
            .add_systems(
                Update,
                (
                    input::sample_input,
                    vitals::emit_interact_intents,
                    locomotion::handle_animation_callbacks,
                    locomotion::update_locomotion::<B>,
                    attack::update_attack_gate,
                    blade::update_blade_toggle,
                )
                    .chain(),
            )
            .add_systems(PostUpdate, camera::update_camera_rig);
    }
}

/// Fail fast on characters that are missing a required collaborator.
///
/// A locomotion character without input or config would silently do nothing,
/// and a dangling camera target would leave movement permanently
/// world-relative. Both are setup bugs, so startup panics.
fn validate_character_setup(
    characters: Query<
        (
            Entity,
            Option<&input::PlayerInput>,
            Option<&locomotion::LocomotionConfig>,
            Option<&camera::CameraTarget>,
        ),
        With<locomotion::Locomotion>,
    >,
    rigs: Query<(), With<camera::CameraRig>>,
) {
    for (entity, player_input, config, target) in &characters {
        if player_input.is_none() {
            error!("character {entity} has Locomotion but no PlayerInput");
            panic!("character {entity} is missing PlayerInput");
        }
        if config.is_none() {
            error!("character {entity} has Locomotion but no LocomotionConfig");
            panic!("character {entity} is missing LocomotionConfig");
        }
        if let Some(target) = target {
            if rigs.get(target.0).is_err() {
                error!("character {entity} targets {} which has no CameraRig", target.0);
                panic!("character {entity} has a dangling camera target");
            }
        }
    }
}
