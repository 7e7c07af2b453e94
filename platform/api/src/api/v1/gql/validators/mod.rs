mod password;
mod username;

pub use password::PasswordValidator;
pub use username::UsernameValidator;
