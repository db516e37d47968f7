//! Data models for Shelfmark

pub mod author;
pub mod book;
pub mod book_instance;
pub mod category;
pub mod enums;
pub mod genre;
pub mod patron;
pub mod publisher;

// Re-export commonly used types
pub use author::Author;
pub use book::Book;
pub use book_instance::BookInstance;
pub use category::Category;
pub use enums::{Format, Sex, Status};
pub use genre::Genre;
pub use patron::Patron;
pub use publisher::Publisher;
