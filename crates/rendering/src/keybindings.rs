//! Keyboard shortcuts as a resource.
//!
//! Input systems read bindings from [`KeyBindings`] instead of hardcoding
//! `KeyCode`s, and the help window lists them from the same place.

use bevy::prelude::*;

/// Every action that can be bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindableAction {
    PanUp,
    PanDown,
    PanLeft,
    PanRight,
    ToolMove,
    ToolPlace,
    ToolRemove,
    CycleTool,
    Deselect,
    CycleLayer,
    PreviousLocation,
    NextLocation,
    Save,
    Load,
    ToggleHelp,
}

impl BindableAction {
    pub const ALL: [BindableAction; 15] = [
        Self::PanUp,
        Self::PanDown,
        Self::PanLeft,
        Self::PanRight,
        Self::ToolMove,
        Self::ToolPlace,
        Self::ToolRemove,
        Self::CycleTool,
        Self::Deselect,
        Self::CycleLayer,
        Self::PreviousLocation,
        Self::NextLocation,
        Self::Save,
        Self::Load,
        Self::ToggleHelp,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::PanUp => "Pan Up",
            Self::PanDown => "Pan Down",
            Self::PanLeft => "Pan Left",
            Self::PanRight => "Pan Right",
            Self::ToolMove => "Move Tool",
            Self::ToolPlace => "Place Tool",
            Self::ToolRemove => "Remove Tool",
            Self::CycleTool => "Next Tool",
            Self::Deselect => "Deselect",
            Self::CycleLayer => "Cycle Layer",
            Self::PreviousLocation => "Previous Location",
            Self::NextLocation => "Next Location",
            Self::Save => "Save Layout",
            Self::Load => "Load Layout",
            Self::ToggleHelp => "Shortcut Help",
        }
    }

    /// Heading the help window groups this action under. `ALL` lists
    /// actions grouped in this order.
    pub fn category(self) -> &'static str {
        match self {
            Self::PanUp | Self::PanDown | Self::PanLeft | Self::PanRight => "Camera",
            Self::ToolMove | Self::ToolPlace | Self::ToolRemove | Self::CycleTool | Self::Deselect => "Tools",
            Self::CycleLayer | Self::PreviousLocation | Self::NextLocation => "Map",
            Self::Save | Self::Load | Self::ToggleHelp => "General",
        }
    }
}

/// A single key binding: a key code plus optional modifier flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub key: KeyCode,
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyBinding {
    pub const fn simple(key: KeyCode) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
        }
    }

    pub const fn ctrl(key: KeyCode) -> Self {
        Self {
            key,
            ctrl: true,
            shift: false,
        }
    }

    fn modifiers_match(self, keys: &ButtonInput<KeyCode>) -> bool {
        let ctrl_held = keys.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]);
        let shift_held = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
        ctrl_held == self.ctrl && shift_held == self.shift
    }

    /// The key went down this frame with exactly the bound modifiers held.
    pub fn just_pressed(self, keys: &ButtonInput<KeyCode>) -> bool {
        keys.just_pressed(self.key) && self.modifiers_match(keys)
    }

    /// Held, for continuous actions like panning.
    pub fn pressed(self, keys: &ButtonInput<KeyCode>) -> bool {
        keys.pressed(self.key) && self.modifiers_match(keys)
    }

    /// Human-readable label (e.g. "Ctrl+S", "Tab").
    pub fn display_label(self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(keycode_label(self.key));
        parts.join("+")
    }
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct KeyBindings {
    pub pan_up: KeyBinding,
    pub pan_down: KeyBinding,
    pub pan_left: KeyBinding,
    pub pan_right: KeyBinding,
    pub tool_move: KeyBinding,
    pub tool_place: KeyBinding,
    pub tool_remove: KeyBinding,
    pub cycle_tool: KeyBinding,
    pub deselect: KeyBinding,
    pub cycle_layer: KeyBinding,
    pub previous_location: KeyBinding,
    pub next_location: KeyBinding,
    pub save: KeyBinding,
    pub load: KeyBinding,
    pub toggle_help: KeyBinding,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            pan_up: KeyBinding::simple(KeyCode::KeyW),
            pan_down: KeyBinding::simple(KeyCode::KeyS),
            pan_left: KeyBinding::simple(KeyCode::KeyA),
            pan_right: KeyBinding::simple(KeyCode::KeyD),
            tool_move: KeyBinding::simple(KeyCode::KeyM),
            tool_place: KeyBinding::simple(KeyCode::KeyP),
            tool_remove: KeyBinding::simple(KeyCode::KeyX),
            cycle_tool: KeyBinding::simple(KeyCode::Tab),
            deselect: KeyBinding::simple(KeyCode::Escape),
            cycle_layer: KeyBinding::simple(KeyCode::KeyL),
            previous_location: KeyBinding::simple(KeyCode::BracketLeft),
            next_location: KeyBinding::simple(KeyCode::BracketRight),
            save: KeyBinding::ctrl(KeyCode::KeyS),
            load: KeyBinding::ctrl(KeyCode::KeyO),
            toggle_help: KeyBinding::simple(KeyCode::F1),
        }
    }
}

impl KeyBindings {
    pub fn get(&self, action: BindableAction) -> KeyBinding {
        match action {
            BindableAction::PanUp => self.pan_up,
            BindableAction::PanDown => self.pan_down,
            BindableAction::PanLeft => self.pan_left,
            BindableAction::PanRight => self.pan_right,
            BindableAction::ToolMove => self.tool_move,
            BindableAction::ToolPlace => self.tool_place,
            BindableAction::ToolRemove => self.tool_remove,
            BindableAction::CycleTool => self.cycle_tool,
            BindableAction::Deselect => self.deselect,
            BindableAction::CycleLayer => self.cycle_layer,
            BindableAction::PreviousLocation => self.previous_location,
            BindableAction::NextLocation => self.next_location,
            BindableAction::Save => self.save,
            BindableAction::Load => self.load,
            BindableAction::ToggleHelp => self.toggle_help,
        }
    }

    /// Pairs of actions sharing the same binding.
    pub fn find_conflicts(&self) -> Vec<(BindableAction, BindableAction)> {
        let mut conflicts = Vec::new();
        let all = BindableAction::ALL;
        for (i, &a) in all.iter().enumerate() {
            for &b in &all[i + 1..] {
                if self.get(a) == self.get(b) {
                    conflicts.push((a, b));
                }
            }
        }
        conflicts
    }
}

pub fn keycode_label(key: KeyCode) -> &'static str {
    match key {
        KeyCode::KeyA => "A",
        KeyCode::KeyD => "D",
        KeyCode::KeyL => "L",
        KeyCode::KeyM => "M",
        KeyCode::KeyO => "O",
        KeyCode::KeyP => "P",
        KeyCode::KeyS => "S",
        KeyCode::KeyW => "W",
        KeyCode::KeyX => "X",
        KeyCode::Tab => "Tab",
        KeyCode::Escape => "Esc",
        KeyCode::BracketLeft => "[",
        KeyCode::BracketRight => "]",
        KeyCode::ArrowUp => "Up",
        KeyCode::ArrowDown => "Down",
        KeyCode::ArrowLeft => "Left",
        KeyCode::ArrowRight => "Right",
        KeyCode::Delete => "Delete",
        KeyCode::Space => "Space",
        KeyCode::F1 => "F1",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keybindings_have_no_conflicts() {
        let conflicts = KeyBindings::default().find_conflicts();
        assert!(conflicts.is_empty(), "unexpected conflicts: {:?}", conflicts);
    }

    #[test]
    fn test_conflict_detection() {
        let mut kb = KeyBindings::default();
        kb.tool_remove = kb.tool_move;
        assert_eq!(
            kb.find_conflicts(),
            vec![(BindableAction::ToolMove, BindableAction::ToolRemove)]
        );
    }

    #[test]
    fn test_display_label() {
        assert_eq!(KeyBinding::simple(KeyCode::BracketRight).display_label(), "]");
        assert_eq!(KeyBinding::ctrl(KeyCode::KeyS).display_label(), "Ctrl+S");
        let shifted = KeyBinding {
            key: KeyCode::Tab,
            ctrl: false,
            shift: true,
        };
        assert_eq!(shifted.display_label(), "Shift+Tab");
    }

    #[test]
    fn test_all_is_grouped_by_category() {
        let mut seen: Vec<&str> = Vec::new();
        for action in BindableAction::ALL {
            let category = action.category();
            if seen.last() != Some(&category) {
                assert!(!seen.contains(&category), "{category} appears twice");
                seen.push(category);
            }
        }
        assert_eq!(seen, ["Camera", "Tools", "Map", "General"]);
    }

    #[test]
    fn test_ctrl_binding_needs_ctrl() {
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::KeyS);
        assert!(KeyBinding::simple(KeyCode::KeyS).just_pressed(&keys));
        assert!(!KeyBinding::ctrl(KeyCode::KeyS).just_pressed(&keys));

        keys.press(KeyCode::ControlLeft);
        assert!(KeyBinding::ctrl(KeyCode::KeyS).just_pressed(&keys));
        assert!(!KeyBinding::simple(KeyCode::KeyS).pressed(&keys));
    }
}
