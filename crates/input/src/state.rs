use crate::action::{Action, KeyBindings};
use glam::Vec2;
use std::collections::HashSet;
use winit::keyboard::KeyCode;

/// Movement requested this frame, each axis in `[-1, 1]`.
///
/// `forward` is positive towards the view direction, `strafe` positive to
/// the right. Opposing keys cancel out.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveIntent {
    pub forward: f32,
    pub strafe: f32,
}

impl MoveIntent {
    pub fn is_idle(&self) -> bool {
        self.forward == 0.0 && self.strafe == 0.0
    }
}

/// Per-frame input state for a desktop session.
#[derive(Debug, Default)]
pub struct InputState {
    bindings: KeyBindings,
    held_keys: HashSet<KeyCode>,
    mouse_delta: Vec2,
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held_keys: HashSet::new(),
            mouse_delta: Vec2::ZERO,
        }
    }

    /// Record a key transition. Returns the bound action on a fresh press;
    /// releases and auto-repeat return `None`.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool, repeat: bool) -> Option<Action> {
        let action = self.bindings.action_for(key)?;
        if !pressed {
            self.held_keys.remove(&key);
            return None;
        }
        let fresh = self.held_keys.insert(key) && !repeat;
        if fresh {
            tracing::trace!("action {action:?} from {key:?}");
            Some(action)
        } else {
            None
        }
    }

    /// Whether any key bound to `action` is currently down.
    pub fn is_held(&self, action: Action) -> bool {
        self.held_keys
            .iter()
            .any(|k| self.bindings.action_for(*k) == Some(action))
    }

    pub fn movement(&self) -> MoveIntent {
        let axis = |pos: Action, neg: Action| -> f32 {
            (self.is_held(pos) as i8 - self.is_held(neg) as i8) as f32
        };
        MoveIntent {
            forward: axis(Action::MoveForward, Action::MoveBackward),
            strafe: axis(Action::StrafeRight, Action::StrafeLeft),
        }
    }

    /// Accumulate relative mouse motion in pixels.
    pub fn add_mouse_motion(&mut self, dx: f64, dy: f64) {
        self.mouse_delta += Vec2::new(dx as f32, dy as f32);
    }

    /// Motion since the last call; resets the accumulator.
    pub fn take_mouse_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.mouse_delta)
    }

    /// Forget all held keys and pending motion, e.g. when focus is lost and
    /// release events will never arrive.
    pub fn clear(&mut self) {
        self.held_keys.clear();
        self.mouse_delta = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> InputState {
        InputState::new(KeyBindings::default())
    }

    #[test]
    fn press_returns_action_once() {
        let mut input = state();
        assert_eq!(
            input.handle_key(KeyCode::Escape, true, false),
            Some(Action::Quit)
        );
        assert_eq!(input.handle_key(KeyCode::Escape, true, true), None);
        assert_eq!(input.handle_key(KeyCode::Escape, false, false), None);
        assert_eq!(
            input.handle_key(KeyCode::Escape, true, false),
            Some(Action::Quit)
        );
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut input = state();
        assert_eq!(input.handle_key(KeyCode::KeyQ, true, false), None);
        assert!(input.movement().is_idle());
    }

    #[test]
    fn held_keys_produce_movement() {
        let mut input = state();
        input.handle_key(KeyCode::KeyW, true, false);
        input.handle_key(KeyCode::KeyD, true, false);
        assert_eq!(
            input.movement(),
            MoveIntent {
                forward: 1.0,
                strafe: 1.0
            }
        );

        input.handle_key(KeyCode::KeyW, false, false);
        input.handle_key(KeyCode::KeyS, true, false);
        input.handle_key(KeyCode::KeyD, false, false);
        input.handle_key(KeyCode::KeyA, true, false);
        assert_eq!(
            input.movement(),
            MoveIntent {
                forward: -1.0,
                strafe: -1.0
            }
        );
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut input = state();
        input.handle_key(KeyCode::KeyW, true, false);
        input.handle_key(KeyCode::KeyS, true, false);
        assert_eq!(input.movement().forward, 0.0);
    }

    #[test]
    fn alternate_binding_keeps_action_held() {
        let mut input = state();
        input.handle_key(KeyCode::KeyW, true, false);
        input.handle_key(KeyCode::ArrowUp, true, false);
        input.handle_key(KeyCode::KeyW, false, false);
        assert!(input.is_held(Action::MoveForward));
    }

    #[test]
    fn mouse_delta_accumulates_and_resets() {
        let mut input = state();
        input.add_mouse_motion(3.0, -1.0);
        input.add_mouse_motion(2.0, 4.0);
        assert_eq!(input.take_mouse_delta(), Vec2::new(5.0, 3.0));
        assert_eq!(input.take_mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn clear_releases_everything() {
        let mut input = state();
        input.handle_key(KeyCode::KeyW, true, false);
        input.add_mouse_motion(1.0, 1.0);
        input.clear();
        assert!(input.movement().is_idle());
        assert_eq!(input.take_mouse_delta(), Vec2::ZERO);
    }
}
