//! Gramlite - the persistence core of a small photo-sharing service
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              External collaborators (not here)               │
//! │  - HTTP routes, request validation                          │
//! │  - Authentication, password hashing                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Data Layer                              │
//! │  - SQLite (sqlx), explicit Database context                 │
//! │  - Users, posts, comments, likes, follow edges              │
//! │  - Projections with live engagement counts                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `data`: database context, row models, projections
//! - `config`: configuration management
//! - `error`: error types
//!
//! Writes are validated at the boundary: uniqueness of usernames/emails,
//! one like per (user, post) pair, no duplicate or self-referential follow
//! edges. Hard deletes cascade atomically; soft-deleting a user only flips
//! `is_active`.

pub mod config;
pub mod data;
pub mod error;
