//! Data models for SwipePedia

mod article;
mod language;
mod sort;
mod swipe;

pub use article::Article;
pub use language::Language;
pub use sort::BookmarkSortOrder;
pub use swipe::SwipeAction;
