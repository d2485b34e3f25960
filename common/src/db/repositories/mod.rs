// Repository layer for database operations

pub mod user;

pub use user::UserRepository;
