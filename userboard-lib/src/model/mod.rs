//! Data model

mod user;

pub use user::*;
