// Editing commands as delivered by the key-binding layer
// Command names arrive as strings from an open set; anything this
// crate does not recognize is carried as Custom and routed back to the
// caller unhandled.

/// A named editing command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    Bold,
    Italic,
    Underline,
    Code,
    Backspace,
    BackspaceWord,
    BackspaceToStartOfLine,
    Delete,
    DeleteWord,
    DeleteToEndOfBlock,
    Custom(String),
}

impl EditorCommand {
    pub fn from_name(name: &str) -> Self {
        match name {
            "bold" => EditorCommand::Bold,
            "italic" => EditorCommand::Italic,
            "underline" => EditorCommand::Underline,
            "code" => EditorCommand::Code,
            "backspace" => EditorCommand::Backspace,
            "backspace-word" => EditorCommand::BackspaceWord,
            "backspace-to-start-of-line" => EditorCommand::BackspaceToStartOfLine,
            "delete" => EditorCommand::Delete,
            "delete-word" => EditorCommand::DeleteWord,
            "delete-to-end-of-block" => EditorCommand::DeleteToEndOfBlock,
            _ => EditorCommand::Custom(name.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            EditorCommand::Bold => "bold",
            EditorCommand::Italic => "italic",
            EditorCommand::Underline => "underline",
            EditorCommand::Code => "code",
            EditorCommand::Backspace => "backspace",
            EditorCommand::BackspaceWord => "backspace-word",
            EditorCommand::BackspaceToStartOfLine => "backspace-to-start-of-line",
            EditorCommand::Delete => "delete",
            EditorCommand::DeleteWord => "delete-word",
            EditorCommand::DeleteToEndOfBlock => "delete-to-end-of-block",
            EditorCommand::Custom(name) => name,
        }
    }
}

/// A Tab key event. The policy marks it consumed by calling
/// `prevent_default`, mirroring how a browser key event would be
/// intercepted; the caller applies its default tab behavior only when
/// the event was left alone.
#[derive(Debug, Clone)]
pub struct TabEvent {
    pub shift: bool,
    prevented: bool,
}

impl TabEvent {
    pub fn new(shift: bool) -> Self {
        TabEvent {
            shift,
            prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.prevented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_round_trip() {
        for name in [
            "bold",
            "italic",
            "underline",
            "code",
            "backspace",
            "backspace-word",
            "backspace-to-start-of-line",
            "delete",
            "delete-word",
            "delete-to-end-of-block",
        ] {
            let command = EditorCommand::from_name(name);
            assert!(!matches!(command, EditorCommand::Custom(_)));
            assert_eq!(command.name(), name);
        }
    }

    #[test]
    fn test_unknown_name_becomes_custom() {
        let command = EditorCommand::from_name("frobnicate");
        assert_eq!(command, EditorCommand::Custom("frobnicate".to_string()));
        assert_eq!(command.name(), "frobnicate");
    }
}
