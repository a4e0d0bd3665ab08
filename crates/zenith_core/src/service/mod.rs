//! Use-case services over repository contracts.
//!
//! # Responsibility
//! - Orchestrate sharing, importing and plan application for the goal list.
//! - Keep callers (FFI, CLI) independent from SQLite and codec details.

pub mod goal_service;
