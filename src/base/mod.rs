//! Base types and error handling.
//!
//! Foundational types shared by every layer:
//! - [`NetError`](neterror::NetError): the crate-wide error taxonomy
//! - [`LoadState`](loadstate::LoadState): request lifecycle states

pub mod loadstate;
pub mod neterror;
