pub mod file_utils;
pub mod source_files;
pub mod types;

pub use file_utils::*;
pub use source_files::*;
pub use types::*;
