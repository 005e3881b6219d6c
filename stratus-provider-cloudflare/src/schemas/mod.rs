//! Cloudflare resource schema definitions

pub mod hyperdrive;
pub mod pages;
pub mod types;
