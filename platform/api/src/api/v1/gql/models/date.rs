use async_graphql::{InputValueError, InputValueResult, Scalar, ScalarType, Value};
use chrono::{DateTime, Utc};

/// An RFC3339 timestamp scalar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateRFC3339(pub DateTime<Utc>);

#[Scalar(name = "DateRFC3339")]
impl ScalarType for DateRFC3339 {
    fn parse(value: Value) -> InputValueResult<Self> {
        match value {
            Value::String(s) => match DateTime::parse_from_rfc3339(&s) {
                Ok(date) => Ok(DateRFC3339(date.with_timezone(&Utc))),
                Err(e) => Err(InputValueError::custom(e.to_string())),
            },
            _ => Err(InputValueError::custom("Invalid value")),
        }
    }

    fn to_value(&self) -> Value {
        Value::String(self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for DateRFC3339 {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}
