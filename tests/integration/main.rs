//! Integration test modules.

mod recording_ui;
mod walk_flow_test;
