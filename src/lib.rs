// Library exports for blocknest

pub mod block;
pub mod command;
pub mod config;
pub mod depth;
pub mod document;
pub mod editor_state;
pub mod modifier;
pub mod nested;
pub mod rich_text;
pub mod selection;
pub mod style;

pub use block::{Block, BlockKey, BlockType, CharacterMetadata, EntityKey};
pub use command::{EditorCommand, TabEvent};
pub use config::PolicyConfig;
pub use document::{ContentState, Entity};
pub use editor_state::{ChangeType, EditorState};
pub use nested::NestedPolicy;
pub use selection::SelectionState;
pub use style::{InlineStyle, StyleSet};
