//! Reply normalization

pub mod responses;


pub use responses::{ResponseParser, parse_tool_arguments};
