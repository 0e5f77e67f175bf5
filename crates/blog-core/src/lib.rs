//! # WebBlog Core
//!
//! The domain layer of the blog: entities, markdown rendering, sorting and
//! pagination, input validation and the services built on them.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod markdown;
pub mod pagination;
pub mod ports;
pub mod services;
pub mod validation;

pub use error::{DomainError, RepoError};
pub use markdown::{RenderMode, render};
pub use pagination::{Page, PageMeta, PageRequest};
pub use validation::{FieldError, ValidationErrors};
