//! Sound intents.
//!
//! The controller emits "play this clip at this position" events; an audio
//! collaborator (or nothing at all) consumes them.

use bevy::prelude::*;

/// Request to play a clip at a world position.
#[derive(Event, Debug, Clone)]
pub struct PlayClipIntent {
    pub clip: Handle<AudioSource>,
    pub position: Vec3,
    /// Volume in `[0, 1]`.
    pub volume: f32,
}

/// Clips a character plays while moving.
///
/// Optional; a character without it stays silent but otherwise behaves
/// identically.
#[derive(Component, Debug, Clone)]
pub struct CharacterSounds {
    /// Played once per landing callback.
    pub landing: Handle<AudioSource>,
    /// One is chosen at random per footstep callback.
    pub footsteps: Vec<Handle<AudioSource>>,
    /// Volume for both footsteps and the landing clip.
    pub footstep_volume: f32,
}

impl Default for CharacterSounds {
    fn default() -> Self {
        Self {
            landing: Handle::default(),
            footsteps: Vec::new(),
            footstep_volume: 0.5,
        }
    }
}
