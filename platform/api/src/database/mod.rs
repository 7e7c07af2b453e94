mod comment;
mod trip;
mod user;

pub use comment::*;
pub use trip::*;
pub use user::*;

pub use common::database::Ulid;
