//! Unit tests for the step sequencer

mod helpers;

mod build_tests;
mod snapshot_tests;
