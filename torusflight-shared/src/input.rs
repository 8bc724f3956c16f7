/// Key that flips between the two named camera views (key-down only).
pub const TOGGLE_VIEW_KEY: &str = "t";

/// A movement intent bound to one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

impl Movement {
    pub const ALL: [Movement; 6] = [
        Movement::Forward,
        Movement::Backward,
        Movement::Left,
        Movement::Right,
        Movement::Up,
        Movement::Down,
    ];

    /// Map a DOM `KeyboardEvent.key` value to a movement.
    ///
    /// Matching is literal and case-sensitive, so `"W"` (shift held) is not
    /// recognized.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "w" => Some(Movement::Forward),
            "s" => Some(Movement::Backward),
            "a" => Some(Movement::Left),
            "d" => Some(Movement::Right),
            " " => Some(Movement::Up),
            "Shift" => Some(Movement::Down),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
}

/// A raw key event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent<'a> {
    pub key: &'a str,
    pub action: KeyAction,
}

impl<'a> KeyEvent<'a> {
    pub fn down(key: &'a str) -> Self {
        Self { key, action: KeyAction::Down }
    }

    pub fn up(key: &'a str) -> Self {
        Self { key, action: KeyAction::Up }
    }
}

/// What the host should do after an event has been handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyResponse {
    /// The host must suppress its default handling of the key.
    pub prevent_default: bool,
    /// The event flipped the view mode.
    pub view_toggled: bool,
}

impl KeyResponse {
    pub fn merge(self, other: KeyResponse) -> KeyResponse {
        KeyResponse {
            prevent_default: self.prevent_default || other.prevent_default,
            view_toggled: self.view_toggled || other.view_toggled,
        }
    }
}

/// Held-key state for the six movement directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementFlags {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MovementFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self, movement: Movement) -> bool {
        match movement {
            Movement::Forward => self.forward,
            Movement::Backward => self.backward,
            Movement::Left => self.left,
            Movement::Right => self.right,
            Movement::Up => self.up,
            Movement::Down => self.down,
        }
    }

    pub fn set(&mut self, movement: Movement, held: bool) {
        let flag = match movement {
            Movement::Forward => &mut self.forward,
            Movement::Backward => &mut self.backward,
            Movement::Left => &mut self.left,
            Movement::Right => &mut self.right,
            Movement::Up => &mut self.up,
            Movement::Down => &mut self.down,
        };
        *flag = held;
    }

    pub fn any(&self) -> bool {
        Movement::ALL.iter().any(|m| self.is_held(*m))
    }

    /// Apply a key event. Unrecognized keys leave every flag untouched.
    ///
    /// Recognized keys ask the host to suppress its default handling on both
    /// press and release.
    pub fn apply(&mut self, event: &KeyEvent<'_>) -> KeyResponse {
        match Movement::from_key(event.key) {
            Some(movement) => {
                self.set(movement, event.action == KeyAction::Down);
                KeyResponse {
                    prevent_default: true,
                    view_toggled: false,
                }
            }
            None => KeyResponse::default(),
        }
    }
}
