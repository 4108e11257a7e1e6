//! Unit tests for credentials.
