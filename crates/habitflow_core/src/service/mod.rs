//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate rollover, engine mutations and persistence into use-case
//!   level APIs.
//! - Keep UI layers decoupled from storage details.

pub mod habit_service;
