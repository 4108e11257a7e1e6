//! Tasktrack: personal task tracking over a JSON API and a chat bot.
//!
//! Users manage tasks with a title, description, status, priority, and
//! deadline, and comment on each other's tasks. The same command layer
//! serves two front doors: an authenticated HTTP API and a chat bot, where
//! participants are registered on first contact.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and messaging
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: Orchestration shared by both front doors
//!
//! # Modules
//!
//! - [`identity`]: Users, chat profiles, and participant reconciliation
//! - [`task`]: Tasks, comments, and the task command layer
//! - [`notify`]: Comment notifications to task owners
//! - [`chat`]: Bot command routing and the polling loop
//! - [`telegram`]: Bot API client
//! - [`api`]: HTTP surface
//! - [`auth`]: Password hashing and JWT tokens
//! - [`app`]: Service wiring over a storage backend

pub mod api;
pub mod app;
pub mod auth;
pub mod chat;
pub mod config;
pub mod identity;
pub mod logging;
pub mod notify;
pub mod persistence;
pub mod task;
pub mod telegram;
