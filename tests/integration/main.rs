//! Integration tests for the ODA CLI binary.

mod cli_tests;
