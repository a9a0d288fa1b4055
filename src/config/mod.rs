//! Startup configuration.
//!
//! A TOML file is read once, validated, and turned into an immutable
//! [`Settings`] value that services receive by `Arc` at construction time.
//! Nothing else reads configuration.

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::{
    AllowedCreators, CommentNotification, DeveloperEntry, PageSize, Settings, SubtaskSettings,
    TesterAlias,
};
