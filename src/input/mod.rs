//! Translates platform key, pointer and wheel events into [`EditorCommand`]s.
//!
//! [`EditorCommand`]: crate::session::EditorCommand

mod pointer;
mod shortcut;

pub use pointer::{resolve_pointer, PointerButton, PointerContext, PointerEvent};
pub use shortcut::{resolve_shortcut, InputContext, ShortcutKey, ShortcutModifiers};
