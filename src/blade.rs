//! Dual arm blade stow/draw toggle.
//!
//! The blades are two anchor entities that snap between a rest and a drawn
//! local position. Toggling is debounced; a scripted sequence can force the
//! blades back to rest at any time via [`StowBlades`], bypassing the
//! debounce.

use bevy::prelude::*;

use crate::input::PlayerInput;
use crate::timer::Countdown;

/// Force a character's blades to their rest positions.
///
/// Used by scripted sequences. Snaps the anchors without touching the
/// debounce countdown or the drawn flag.
#[derive(Event, Debug, Clone, Copy)]
pub struct StowBlades(pub Entity);

/// The two blade anchors and their local rest/draw positions.
#[derive(Reflect, Debug, Clone, Copy)]
pub struct BladeAnchors {
    pub left: Entity,
    pub right: Entity,
    pub left_draw: Vec3,
    pub right_draw: Vec3,
    pub left_rest: Vec3,
    pub right_rest: Vec3,
}

impl Default for BladeAnchors {
    /// Placeholder anchors; reflection-driven spawning patches them
    /// afterwards.
    fn default() -> Self {
        Self {
            left: Entity::PLACEHOLDER,
            right: Entity::PLACEHOLDER,
            left_draw: Vec3::ZERO,
            right_draw: Vec3::ZERO,
            left_rest: Vec3::ZERO,
            right_rest: Vec3::ZERO,
        }
    }
}

/// Debounced stow/draw state for a character's arm blades.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct BladeToggle {
    pub anchors: BladeAnchors,
    drawn: bool,
    debounce: Countdown,
}

/// Default interval between two blade toggles, in seconds.
pub const BLADE_DEBOUNCE: f32 = 1.0;

impl Default for BladeToggle {
    fn default() -> Self {
        Self::new(BladeAnchors::default())
    }
}

impl BladeToggle {
    /// Create a toggle that starts drawn, with the default debounce.
    pub fn new(anchors: BladeAnchors) -> Self {
        Self {
            anchors,
            drawn: true,
            debounce: Countdown::new(BLADE_DEBOUNCE),
        }
    }

    /// Builder: set the debounce duration.
    pub fn with_debounce(mut self, secs: f32) -> Self {
        self.debounce = Countdown::new(secs);
        self
    }

    /// Whether the blades are currently drawn.
    #[inline]
    pub fn drawn(&self) -> bool {
        self.drawn
    }

    /// Advance the debounce and decide whether this tick flips the state.
    ///
    /// Returns the anchor positions to apply when a toggle fires.
    fn advance(&mut self, trigger: bool, dt: f32) -> Option<(Vec3, Vec3)> {
        self.debounce.tick(dt);
        if !(self.debounce.expired() && trigger) {
            return None;
        }

        self.drawn = !self.drawn;
        self.debounce.reset();
        Some(if self.drawn {
            (self.anchors.left_draw, self.anchors.right_draw)
        } else {
            (self.anchors.left_rest, self.anchors.right_rest)
        })
    }
}

/// Tick the blade debounce, apply toggles, and handle forced stows.
pub fn update_blade_toggle(
    time: Res<Time>,
    mut stow_events: EventReader<StowBlades>,
    mut blades: Query<(Entity, &PlayerInput, &mut BladeToggle)>,
    mut anchors: Query<&mut Transform, Without<BladeToggle>>,
) {
    for (_, input, mut blade) in &mut blades {
        if let Some((left, right)) = blade.advance(input.frame.test_button, time.delta_secs()) {
            debug!("arm blades {}", if blade.drawn() { "drawn" } else { "stowed" });
            place_anchor(&mut anchors, blade.anchors.left, left);
            place_anchor(&mut anchors, blade.anchors.right, right);
        }
    }

    for StowBlades(entity) in stow_events.read() {
        let Ok((_, _, blade)) = blades.get(*entity) else {
            continue;
        };
        let rig = blade.anchors;
        place_anchor(&mut anchors, rig.left, rig.left_rest);
        place_anchor(&mut anchors, rig.right, rig.right_rest);
    }
}

fn place_anchor(
    anchors: &mut Query<&mut Transform, Without<BladeToggle>>,
    anchor: Entity,
    position: Vec3,
) {
    if let Ok(mut transform) = anchors.get_mut(anchor) {
        transform.translation = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_anchors() -> BladeAnchors {
        BladeAnchors {
            left: Entity::PLACEHOLDER,
            right: Entity::PLACEHOLDER,
            left_draw: Vec3::new(-0.5, 0.0, 0.2),
            right_draw: Vec3::new(0.5, 0.0, 0.2),
            left_rest: Vec3::new(-0.3, 0.0, -0.1),
            right_rest: Vec3::new(0.3, 0.0, -0.1),
        }
    }

    #[test]
    fn starts_drawn_and_debouncing() {
        let mut blade = BladeToggle::new(test_anchors());
        assert!(blade.drawn());
        // Trigger during the initial debounce window is ignored.
        assert!(blade.advance(true, 0.1).is_none());
        assert!(blade.drawn());
    }

    #[test]
    fn toggle_moves_anchors_to_rest_then_draw() {
        let anchors = test_anchors();
        let mut blade = BladeToggle::new(anchors).with_debounce(0.2);

        // Run out the debounce, then stow.
        blade.advance(false, 0.2);
        let stowed = blade.advance(true, 0.0).expect("toggle should fire");
        assert!(!blade.drawn());
        assert_eq!(stowed, (anchors.left_rest, anchors.right_rest));

        // And back out again after another full debounce.
        blade.advance(false, 0.2);
        let drawn = blade.advance(true, 0.0).expect("toggle should fire");
        assert!(blade.drawn());
        assert_eq!(drawn, (anchors.left_draw, anchors.right_draw));
    }

    #[test]
    fn two_triggers_inside_the_debounce_flip_once() {
        let mut blade = BladeToggle::new(test_anchors());

        blade.advance(false, 1.0);
        assert!(blade.advance(true, 0.0).is_some());
        assert!(!blade.drawn());

        // Second trigger 0.3s later: inside the fresh debounce window.
        assert!(blade.advance(true, 0.3).is_none());
        assert!(!blade.drawn());
    }

    #[test]
    fn held_trigger_toggles_once_per_window() {
        let mut blade = BladeToggle::new(test_anchors()).with_debounce(0.5);
        let mut flips = 0;
        for _ in 0..20 {
            if blade.advance(true, 0.1).is_some() {
                flips += 1;
            }
        }
        // 2.0s of held trigger with a 0.5s debounce: the first window ends
        // at 0.5s, then one flip per 0.5s.
        assert_eq!(flips, 4);
    }
}
