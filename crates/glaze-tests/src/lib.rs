//! Integration tests for the glaze crates.
//!
//! End-to-end checks that run the pipeline across glaze-core, glaze-ops and
//! glaze-io together.
