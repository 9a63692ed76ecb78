//! Users Module
//!
//! The application-level consumer of the cache: a small user directory whose
//! lookups are memoized through [`CacheStore`](crate::cache::CacheStore).

mod model;
mod repository;
mod service;

pub use model::User;
pub use repository::UserRepository;
pub use service::UserService;
