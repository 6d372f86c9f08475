/// Desktop stand-in for the on-screen keyboard.
pub mod keyboard;
pub mod message_input;
pub mod message_list;
pub mod scroll_manager;
/// Screen coordinator wiring input, list and keyboard together.
pub mod view;

pub use keyboard::VirtualKeyboard;
pub use message_input::{InputChanged, InputFocusChanged, MessageInput};
pub use message_list::{ListScrolled, MessageList};
pub use scroll_manager::ScrollManager;
pub use view::ChatView;
