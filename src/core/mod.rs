//! Core business logic - framework-agnostic approval, funding, and workflow
//! operations.
//!
//! `policy` and `funding` are pure and side-effect free; `workflow` is the
//! sole mutation entry point over projects, funding schedules, and approval
//! history. The remaining modules are read accessors and directory
//! management for the entities the workflow consumes.

/// Pure schedule validation and payment state transitions
pub mod funding;
/// Approval group management and roster resolution
pub mod group;
/// Pure approval admissibility and transition rules
pub mod policy;
/// Read accessors over projects, funding, history, and task progress
pub mod project;
/// User directory operations
pub mod user;
/// The workflow engine - orchestrates policy and funding against the store
pub mod workflow;
