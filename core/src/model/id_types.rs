use std::fmt::Display;

use serde::Serialize;

#[derive(sqlx::Type, Debug, Clone, PartialEq, Eq, Copy, Hash, Serialize)]
#[sqlx(transparent)]
pub struct PostId(pub i64);

impl From<i64> for PostId {
    fn from(value: i64) -> Self {
        PostId(value)
    }
}

impl Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("PostId({})", self.0))
    }
}
