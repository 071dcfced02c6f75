//! Property-based tests for the path algebra and identities
