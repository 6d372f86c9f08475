#![deny(unsafe_code)]

/// Window shell: title bar, lifecycle forwarding and global actions.
pub mod app;
/// Chat screen entities built on the `miniai-chat` domain crate.
pub mod chat;
/// Settings persistence.
pub mod settings;
