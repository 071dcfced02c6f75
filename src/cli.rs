//! CLI domain: parse, route, output, and presentation only.
//! Filesystem work happens in [`crate::filesystem`]; this layer only wires it up.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{format_listing, format_stat};
pub use route::RunContext;
