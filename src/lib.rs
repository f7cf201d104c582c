//! Client library for the hairstyle-changer backend
//!
//! Handles client-side image preparation (constraint-based resizing before
//! upload) and typed access to the backend's face-analysis, hairstyle
//! transformation, and catalog search endpoints.

pub mod api;
pub mod app;
pub mod error;
pub mod image;
pub mod models;

pub use error::{Error, Result};
