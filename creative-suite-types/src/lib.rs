//! Wire types shared by the Creative Suite crates.

pub mod config;
pub mod content;
pub mod enums;
pub mod models;
pub mod response;
