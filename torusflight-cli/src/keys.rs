use winit::keyboard::{Key, NamedKey};

/// Translate a winit logical key to the DOM `KeyboardEvent.key` string the
/// flight controls expect. Keys with no DOM counterpart here map to `None`.
pub fn dom_key(key: &Key) -> Option<&str> {
    match key {
        Key::Character(text) => Some(text.as_str()),
        Key::Named(NamedKey::Space) => Some(" "),
        Key::Named(NamedKey::Shift) => Some("Shift"),
        _ => None,
    }
}

/// Resolve a key name given on the command line. `space` stands for `" "`,
/// which a shell cannot pass through a comma list comfortably.
pub fn parse_key_name(name: &str) -> &str {
    match name.trim() {
        "space" | "Space" => " ",
        "shift" => "Shift",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    #[test]
    fn test_characters_pass_through() {
        assert_eq!(dom_key(&Key::Character(SmolStr::new("w"))), Some("w"));
        assert_eq!(dom_key(&Key::Character(SmolStr::new("t"))), Some("t"));
        // Shift+w produces "W", which the tracker ignores.
        assert_eq!(dom_key(&Key::Character(SmolStr::new("W"))), Some("W"));
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(dom_key(&Key::Named(NamedKey::Space)), Some(" "));
        assert_eq!(dom_key(&Key::Named(NamedKey::Shift)), Some("Shift"));
        assert_eq!(dom_key(&Key::Named(NamedKey::Escape)), None);
    }

    #[test]
    fn test_parse_key_name() {
        assert_eq!(parse_key_name("space"), " ");
        assert_eq!(parse_key_name(" w "), "w");
        assert_eq!(parse_key_name("shift"), "Shift");
        assert_eq!(parse_key_name("Shift"), "Shift");
    }
}
