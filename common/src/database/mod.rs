mod ulid;

pub use ulid::Ulid;

pub type Pool = sqlx::PgPool;
