//! Integration tests for githubfs

mod canonical_identity;
mod eager_resolution;
mod filesystem_read;
mod read_only;
mod resolver_failures;
mod test_utils;
