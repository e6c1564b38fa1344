//! Player vitals and the interact intent.
//!
//! Vitals are plain data owned by the character entity and handed to
//! whatever needs them; nothing inherits them.

use bevy::prelude::*;

use crate::input::PlayerInput;

/// Maintenance, damage and battery values for a character.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component)]
pub struct PlayerVitals {
    pub maintenance: i32,
    pub damage: i32,
    pub battery: i32,
}

impl Default for PlayerVitals {
    fn default() -> Self {
        Self {
            maintenance: 100,
            damage: 10,
            battery: 100,
        }
    }
}

impl PlayerVitals {
    /// Adjust maintenance by a signed delta.
    pub fn add_maintenance(&mut self, delta: i32) {
        self.maintenance += delta;
    }
}

/// Emitted while the interact button is held.
#[derive(Event, Debug, Clone, Copy)]
pub struct InteractEvent {
    pub entity: Entity,
}

/// Emit interact intents for characters holding the interact button.
pub fn emit_interact_intents(
    players: Query<(Entity, &PlayerInput)>,
    mut events: EventWriter<InteractEvent>,
) {
    for (entity, input) in &players {
        if input.frame.interact {
            debug!("interact");
            events.send(InteractEvent { entity });
        }
    }
}
