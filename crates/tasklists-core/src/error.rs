use thiserror::Error;

#[derive(Debug, Error)]
pub enum TasklistsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("duplicate id {id} in {scope}")]
    DuplicateId { scope: String, id: u64 },
}
