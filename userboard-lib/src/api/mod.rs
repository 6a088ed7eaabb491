//! Remote data source access

mod client;

pub use client::*;
