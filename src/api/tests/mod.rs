//! Unit tests for request parsing helpers.

mod dto_tests;
