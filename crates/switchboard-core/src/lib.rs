pub mod config;
pub mod error;
pub mod tool;

pub use config::{ConfigSource, FileConfig, StaticConfig, SwitchboardConfig};
pub use error::{CoreError, Result};
pub use tool::{Tool, ToolDefinition, ToolResult};
