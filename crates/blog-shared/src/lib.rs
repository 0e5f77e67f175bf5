//! # WebBlog Shared
//!
//! Wire types of the JSON API.
//! Kept free of server dependencies so clients can reuse them.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, FieldErrorResponse, MessageResponse};
