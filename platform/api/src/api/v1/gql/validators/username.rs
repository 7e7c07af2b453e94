use async_graphql::{CustomValidator, InputValueError};

use crate::database;

pub struct UsernameValidator;

impl CustomValidator<String> for UsernameValidator {
    fn check(&self, value: &String) -> Result<(), InputValueError<String>> {
        database::User::validate_username(value).map_err(InputValueError::custom)
    }
}
