pub mod registry;
pub mod search;
pub mod weather;

pub use registry::{ToolHandler, ToolRegistry};
