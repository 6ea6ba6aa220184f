//! Core library for taskapp
//!
//! This crate contains the to-do list business logic:
//! - Task model and storage
//! - Reminder signalling
//! - List presentation

pub mod error;
pub mod presenter;
pub mod reminder;
pub mod task;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
