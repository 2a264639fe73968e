pub mod commands;
pub mod file_ops;

pub use commands::{parse_command, Command, ValidationError};
pub use file_ops::FileOperations;
