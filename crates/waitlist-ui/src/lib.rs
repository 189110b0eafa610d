//! Dioxus front end for the waitlist signup card.

pub mod bridge;
pub mod components;
pub mod hooks;

pub use components::*;
