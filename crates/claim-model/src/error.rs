use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("group type tag is empty")]
    EmptyGroupType,
}

pub type Result<T> = std::result::Result<T, ModelError>;
