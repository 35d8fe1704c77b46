use std::borrow::Cow;

use sqlx::PgPool;

use crate::errors::AppError;

#[derive(Clone)]
pub struct SqlxUserRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxProjectRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxBlogPostRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxCodeSnippetRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxContactMessageRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxQuoteRequestRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxServiceRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxServiceAreaRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxSiteSettingRepo {
    pub pool: PgPool,
}

/// Maps a unique violation to a 409 with a readable message; everything
/// else goes through the generic `sqlx::Error` conversion.
pub(crate) fn unique_conflict(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23505")) => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::from(err),
    }
}

/// Turns `RowNotFound` into a 404 naming the missing resource.
pub(crate) fn not_found(err: sqlx::Error, what: &str) -> AppError {
    match err {
        sqlx::Error::RowNotFound => AppError::NotFound(format!("{} not found", what)),
        other => AppError::from(other),
    }
}
