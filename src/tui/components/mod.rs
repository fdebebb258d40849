//! Shared TUI components

pub mod field;
pub mod footer;
pub mod header;
pub mod message;
pub mod toast;

pub use field::{SelectRow, SelectRowProps, TextFieldRow, TextFieldRowProps, field_display};
pub use footer::{Footer, FooterProps, Shortcut, shortcuts};
pub use header::{Header, HeaderProps, NavTab};
pub use message::{Message, MessageKind, MessageProps};
pub use toast::{Toast, ToastLevel, render_toast};
