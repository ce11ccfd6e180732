//! Database entities.

pub mod category;
pub mod comment;
pub mod genre;
pub mod genre_title;
pub mod review;
pub mod title;
pub mod user;

pub use category::Entity as Category;
pub use comment::Entity as Comment;
pub use genre::Entity as Genre;
pub use genre_title::Entity as GenreTitle;
pub use review::Entity as Review;
pub use title::Entity as Title;
pub use user::Entity as User;
pub use user::UserRole;
