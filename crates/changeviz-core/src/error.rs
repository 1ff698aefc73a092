pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate change identifier in snapshot: {id}")]
    DuplicateChange {
        id: String,
    },

    #[error(
        "change {id}: name {name:?} does not equal unique prefix {prefix:?} followed by suffix {suffix:?}"
    )]
    NameMismatch {
        id: String,
        name: String,
        prefix: String,
        suffix: String,
    },
}
