//! Attack gating.
//!
//! A two-state lock between the attack buttons and the attack intents: an
//! attack fires only on a press while unlocked, and the lock clears only
//! once both buttons are released. A held button can never re-trigger.
//! Damage resolution is out of scope; the gate stops at emitting intents.

use bevy::prelude::*;

use crate::input::{InputFrame, PlayerInput};

/// The weapons a character can hold.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weapon {
    #[default]
    BareHand,
    DualArmBlade,
    ElectroMagneticRifle,
}

/// A weapon asset record: which weapon it is and the model entities that
/// represent it.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct WeaponItem {
    pub weapon: Weapon,
    pub models: Vec<Entity>,
}

impl WeaponItem {
    pub fn new(weapon: Weapon, models: Vec<Entity>) -> Self {
        Self { weapon, models }
    }
}

/// Which attack was requested.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackKind {
    Light,
    Heavy,
}

/// An attack intent, emitted at most once per press-and-release cycle.
#[derive(Event, Debug, Clone, Copy)]
pub struct AttackEvent {
    pub entity: Entity,
    pub kind: AttackKind,
    pub weapon: Weapon,
}

/// The attack lock for one character.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct AttackGate {
    /// The weapon the next attack intent will carry.
    pub current_weapon: Weapon,
    locked: bool,
}

impl AttackGate {
    /// Create an unlocked gate for the given weapon.
    pub fn new(weapon: Weapon) -> Self {
        Self {
            current_weapon: weapon,
            locked: false,
        }
    }

    /// Whether an attack is in flight and further triggers are ignored.
    #[inline]
    pub fn locked(&self) -> bool {
        self.locked
    }

    /// Advance the gate by one tick of input.
    ///
    /// Returns the attack to fire this tick, if any. Light attacks win over
    /// heavy when both are pressed on the same tick.
    pub fn advance(&mut self, frame: &InputFrame) -> Option<AttackKind> {
        if !self.locked && frame.light_attack {
            self.locked = true;
            Some(AttackKind::Light)
        } else if !self.locked && frame.heavy_attack {
            self.locked = true;
            Some(AttackKind::Heavy)
        } else if self.locked && frame.unlock_attack {
            self.locked = false;
            None
        } else {
            None
        }
    }
}

/// Tick every attack gate and emit the resulting intents.
pub fn update_attack_gate(
    mut gates: Query<(Entity, &PlayerInput, &mut AttackGate)>,
    mut events: EventWriter<AttackEvent>,
) {
    for (entity, input, mut gate) in &mut gates {
        if let Some(kind) = gate.advance(&input.frame) {
            debug!("{kind:?} attack with {:?}", gate.current_weapon);
            events.send(AttackEvent {
                entity,
                kind,
                weapon: gate.current_weapon,
            });
        }
    }
}
