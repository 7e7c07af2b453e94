use async_graphql::{CustomValidator, InputValueError};

use crate::database;

pub struct PasswordValidator;

impl CustomValidator<String> for PasswordValidator {
    fn check(&self, value: &String) -> Result<(), InputValueError<String>> {
        database::User::validate_password(value).map_err(InputValueError::custom)
    }
}
