pub mod comment;
pub mod date;
pub mod session;
pub mod trip;
pub mod ulid;
pub mod user;
