//! Shared LiteSVM harness for the rotary savings integration tests

pub mod common;
