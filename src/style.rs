// Inline text styling (semantic, not syntactic)
// A StyleSet is a value: updates return a new set, the original is untouched.

use std::fmt;

/// An inline style tag that a character can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineStyle {
    Bold,
    Italic,
    Underline,
    Code,
    Strikethrough,
}

impl InlineStyle {
    pub fn name(&self) -> &'static str {
        match self {
            InlineStyle::Bold => "BOLD",
            InlineStyle::Italic => "ITALIC",
            InlineStyle::Underline => "UNDERLINE",
            InlineStyle::Code => "CODE",
            InlineStyle::Strikethrough => "STRIKETHROUGH",
        }
    }
}

/// The set of inline styles carried by a character or by the
/// editor's pending-style override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleSet {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub code: bool,
    pub strikethrough: bool,
}

impl StyleSet {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn bold() -> Self {
        StyleSet {
            bold: true,
            ..Default::default()
        }
    }

    pub fn italic() -> Self {
        StyleSet {
            italic: true,
            ..Default::default()
        }
    }

    pub fn code() -> Self {
        StyleSet {
            code: true,
            ..Default::default()
        }
    }

    pub fn contains(&self, style: InlineStyle) -> bool {
        match style {
            InlineStyle::Bold => self.bold,
            InlineStyle::Italic => self.italic,
            InlineStyle::Underline => self.underline,
            InlineStyle::Code => self.code,
            InlineStyle::Strikethrough => self.strikethrough,
        }
    }

    /// Copy of this set with the given style present
    pub fn with(mut self, style: InlineStyle) -> Self {
        self.set(style, true);
        self
    }

    /// Copy of this set with the given style absent
    pub fn without(mut self, style: InlineStyle) -> Self {
        self.set(style, false);
        self
    }

    /// Copy of this set with the given style flipped
    pub fn toggled(self, style: InlineStyle) -> Self {
        if self.contains(style) {
            self.without(style)
        } else {
            self.with(style)
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn set(&mut self, style: InlineStyle, on: bool) {
        match style {
            InlineStyle::Bold => self.bold = on,
            InlineStyle::Italic => self.italic = on,
            InlineStyle::Underline => self.underline = on,
            InlineStyle::Code => self.code = on,
            InlineStyle::Strikethrough => self.strikethrough = on,
        }
    }
}

impl fmt::Display for StyleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for style in [
            InlineStyle::Bold,
            InlineStyle::Italic,
            InlineStyle::Underline,
            InlineStyle::Code,
            InlineStyle::Strikethrough,
        ] {
            if self.contains(style) {
                if !first {
                    write!(f, "+")?;
                }
                write!(f, "{}", style.name())?;
                first = false;
            }
        }
        if first {
            write!(f, "-")?;
        }
        Ok(())
    }
}
