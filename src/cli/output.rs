//! CLI output: error mapping from domain errors to the CLI surface.

/// Render an error and its causes on one line, e.g.
/// `cannot open github:o/r!/x: No such file or directory: x`.
pub fn map_error(e: &anyhow::Error) -> String {
    format!("{:#}", e)
}
