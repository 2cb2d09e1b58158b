//! Unit tests for the ODA CLI.
//!
//! These tests exercise the application services through stubbed ports and
//! run fast without external I/O.


mod controller;
mod retention;
mod shipping;
