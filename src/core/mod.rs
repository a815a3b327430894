pub mod pipeline;
pub mod reader;
