//! Core library: prompt construction, model calls, script rendering and the
//! authoring session shared by the CLI and the TUI.

pub mod client;
pub mod clipboard;
pub mod config;
pub mod encoder;
pub mod error;
pub mod export;
pub mod extraction;
pub mod html;
pub mod progress;
pub mod prompt;
pub mod render;
pub mod service;
pub mod session;
pub mod viewer;

pub use client::{GeminiAdapter, ModelClient, ModelRequest};
pub use config::Config;
pub use error::{ConfigError, FileReadError, LessonError};
pub use service::LessonService;
pub use session::Session;
