//! End-to-end tests for reading datasets from disk.
//!
//! Each test writes a synthetic header and payload into a temporary directory
//! and reads them back through `read_data`.
