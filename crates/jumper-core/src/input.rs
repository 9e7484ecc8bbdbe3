use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Logical actions the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    MoveRight,
    Jump,
    ActivateJetpack,
    SustainFlight,
}

/// Actions held during one tick. Sampled once per tick and shared by every
/// consumer in that tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    held: HashSet<InputAction>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_actions(actions: &[InputAction]) -> Self {
        Self {
            held: actions.iter().copied().collect(),
        }
    }

    pub fn press(&mut self, action: InputAction) {
        self.held.insert(action);
    }

    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

/// Maps physical key codes (DOM `KeyboardEvent.code` names) to actions.
/// One key may drive several actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    bindings: HashMap<String, Vec<InputAction>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = HashMap::new();
        bindings.insert("ArrowRight".to_string(), vec![InputAction::MoveRight]);
        bindings.insert(
            "Space".to_string(),
            vec![InputAction::Jump, InputAction::SustainFlight],
        );
        bindings.insert("KeyJ".to_string(), vec![InputAction::ActivateJetpack]);
        Self { bindings }
    }
}

impl KeyBindings {
    pub fn actions_for(&self, code: &str) -> &[InputAction] {
        self.bindings.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn bind(&mut self, code: impl Into<String>, actions: Vec<InputAction>) {
        self.bindings.insert(code.into(), actions);
    }
}

/// Keyboard state fed by a windowing frontend.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    keys_down: HashSet<String>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_key_down(&mut self, code: impl Into<String>) {
        self.keys_down.insert(code.into());
    }

    pub fn on_key_up(&mut self, code: &str) {
        self.keys_down.remove(code);
    }

    pub fn is_key_down(&self, code: &str) -> bool {
        self.keys_down.contains(code)
    }

    /// Resolve the currently held keys into an action snapshot.
    pub fn snapshot(&self, bindings: &KeyBindings) -> InputSnapshot {
        let mut snapshot = InputSnapshot::new();
        for code in &self.keys_down {
            for &action in bindings.actions_for(code) {
                snapshot.press(action);
            }
        }
        snapshot
    }
}
