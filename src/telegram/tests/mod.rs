//! Unit tests for the Bot API wire types.

mod types_tests;
