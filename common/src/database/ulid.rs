/// A ULID stored as a postgres `UUID`.
///
/// The database column type stays `UUID` (and `UUID[]` for arrays) while the
/// application works with lexicographically sortable ids.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Ulid(pub ulid::Ulid);

impl Ulid {
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    pub fn nil() -> Self {
        Self(ulid::Ulid::nil())
    }

    pub fn to_uuid(self) -> uuid::Uuid {
        self.0.into()
    }
}

impl Default for Ulid {
    fn default() -> Self {
        Self::nil()
    }
}

impl std::fmt::Display for Ulid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.to_string().fmt(f)
    }
}

impl std::fmt::Debug for Ulid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<ulid::Ulid> for Ulid {
    fn from(id: ulid::Ulid) -> Self {
        Self(id)
    }
}

impl From<Ulid> for ulid::Ulid {
    fn from(id: Ulid) -> Self {
        id.0
    }
}

impl From<uuid::Uuid> for Ulid {
    fn from(id: uuid::Uuid) -> Self {
        Self(ulid::Ulid::from(id))
    }
}

impl From<Ulid> for uuid::Uuid {
    fn from(id: Ulid) -> Self {
        id.0.into()
    }
}

impl sqlx::Type<sqlx::Postgres> for Ulid {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <uuid::Uuid as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

impl sqlx::postgres::PgHasArrayType for Ulid {
    fn array_type_info() -> sqlx::postgres::PgTypeInfo {
        <uuid::Uuid as sqlx::postgres::PgHasArrayType>::array_type_info()
    }

    fn array_compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <uuid::Uuid as sqlx::postgres::PgHasArrayType>::array_compatible(ty)
    }
}

impl sqlx::Decode<'_, sqlx::Postgres> for Ulid {
    fn decode(
        value: sqlx::postgres::PgValueRef<'_>,
    ) -> Result<Self, Box<dyn std::error::Error + 'static + Send + Sync>> {
        let id = <uuid::Uuid as sqlx::Decode<'_, sqlx::Postgres>>::decode(value)?;
        Ok(Self(ulid::Ulid::from(id)))
    }
}

impl sqlx::Encode<'_, sqlx::Postgres> for Ulid {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <uuid::Uuid as sqlx::Encode<'_, sqlx::Postgres>>::encode_by_ref(&self.0.into(), buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_round_trip() {
        let id = Ulid::new();
        let uuid: uuid::Uuid = id.into();
        assert_eq!(Ulid::from(uuid), id);
    }

    #[test]
    fn display_matches_inner_ulid() {
        let inner = ulid::Ulid::new();
        assert_eq!(Ulid(inner).to_string(), inner.to_string());
    }

    #[test]
    fn ordering_follows_creation_time() {
        let a = Ulid::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = Ulid::new();
        assert!(a < b);
    }
}
