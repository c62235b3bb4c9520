//! Common types shared by the token generator crates

mod secret;

pub use secret::Secret;
