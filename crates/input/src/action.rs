use std::collections::HashMap;
use winit::keyboard::KeyCode;

/// A high-level action produced by the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    /// Show or hide the debug overlay.
    ToggleHud,
    /// Leave the render loop.
    Quit,
}

impl Action {
    /// Whether the action is meaningful while held, as opposed to firing once.
    pub fn is_continuous(self) -> bool {
        matches!(
            self,
            Action::MoveForward | Action::MoveBackward | Action::StrafeLeft | Action::StrafeRight
        )
    }
}

/// Physical key to action table.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<KeyCode, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        bindings.bind(KeyCode::KeyW, Action::MoveForward);
        bindings.bind(KeyCode::ArrowUp, Action::MoveForward);
        bindings.bind(KeyCode::KeyS, Action::MoveBackward);
        bindings.bind(KeyCode::ArrowDown, Action::MoveBackward);
        bindings.bind(KeyCode::KeyA, Action::StrafeLeft);
        bindings.bind(KeyCode::ArrowLeft, Action::StrafeLeft);
        bindings.bind(KeyCode::KeyD, Action::StrafeRight);
        bindings.bind(KeyCode::ArrowRight, Action::StrafeRight);
        bindings.bind(KeyCode::F1, Action::ToggleHud);
        bindings.bind(KeyCode::Escape, Action::Quit);
        bindings
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Bind `key` to `action`, replacing any previous binding for that key.
    pub fn bind(&mut self, key: KeyCode, action: Action) {
        self.map.insert(key, action);
    }

    pub fn unbind(&mut self, key: KeyCode) -> Option<Action> {
        self.map.remove(&key)
    }

    pub fn action_for(&self, key: KeyCode) -> Option<Action> {
        self.map.get(&key).copied()
    }
}
