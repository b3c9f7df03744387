//! Tempo Types - Shared domain types
//!
//! This crate contains domain types used across Tempo services:
//! - Users and plan catalog
//! - Subscription lifecycle
//! - Invoice ledger

pub mod invoice;
pub mod plan;
pub mod subscription;
pub mod user;

pub use invoice::*;
pub use plan::*;
pub use subscription::*;
pub use user::*;
