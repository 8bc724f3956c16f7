use torusflight_shared::KeyAction;

pub const KEYDOWN: &str = "keydown";
pub const KEYUP: &str = "keyup";

/// Map a DOM `KeyboardEvent.type` to the tracker's key action.
pub fn key_action(event_type: &str) -> Option<KeyAction> {
    match event_type {
        KEYDOWN => Some(KeyAction::Down),
        KEYUP => Some(KeyAction::Up),
        _ => None,
    }
}
