//! Unit tests for the chat surface.
