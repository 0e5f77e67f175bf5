//! Domain entities - the core business objects.

mod comment;
mod post;
mod sort;
mod user;

pub use comment::{Comment, CommentView, MAX_COMMENT_LEN, NewComment};
pub use post::{EXCERPT_LEN, NewPost, Post, PostDetail, PostSummary, PostUpdate};
pub use sort::{CommentSort, PostSort};
pub use user::{Actor, NewUser, User};
