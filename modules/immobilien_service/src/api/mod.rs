//! API layer - REST transport and native client

pub mod native;
pub mod rest;
