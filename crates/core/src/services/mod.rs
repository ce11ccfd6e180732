//! Business logic services.

#![allow(missing_docs)]

pub mod auth;
pub mod category;
pub mod comment;
pub mod genre;
pub mod mail;
pub mod policy;
pub mod rating;
pub mod review;
pub mod title;
pub mod user;

pub use auth::{AuthService, ObtainTokenInput, SignupInput, TokenService};
pub use category::{CategoryInput, CategoryService};
pub use comment::{CommentService, CreateCommentInput, UpdateCommentInput};
pub use genre::{GenreInput, GenreService};
pub use mail::{Mailer, MailerService, NoOpMailer, SmtpMailer};
pub use rating::rating_of;
pub use review::{CreateReviewInput, ReviewService, UpdateReviewInput};
pub use title::{CreateTitleInput, TitleListQuery, TitleService, TitleWithRating, UpdateTitleInput};
pub use user::{AdminUserInput, AdminUserUpdateInput, ProfileUpdateInput, UserService};
