//! Application services - the operations the presentation layer calls.
//!
//! Services hold repository handles behind `Arc<dyn …>` and take the acting
//! identity explicitly; they never read ambient request state.

mod account;
mod blog;

pub use account::AccountService;
pub use blog::BlogService;
