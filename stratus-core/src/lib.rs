//! Stratus Core
//!
//! Core library for reconciling declarative resource configuration with
//! remote cloud resources through create/read/update/delete verbs

pub mod differ;
pub mod import;
pub mod provider;
pub mod reconciler;
pub mod resource;
pub mod schema;
