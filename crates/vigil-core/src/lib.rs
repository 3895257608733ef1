//! # vigil-core
//!
//! Core types for the Vigil change-audit engine.
//!
//! This crate is storage-agnostic. It provides:
//! - Field values with logical equality, and the fixed-point `Decimal`
//! - The `Auditable` trait and the static `EntityRegistry` of monitored tables
//! - Snapshot capture and the field-level diff engine
//! - Actor references and the explicit `MutationContext`
//! - Entity structs (catalog records, users, audit log entries)
//! - Cross-cutting error types

pub mod actor;
pub mod capture;
pub mod diff;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod registry;
pub mod snapshot;
pub mod value;
