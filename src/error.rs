use crate::{profile::ProfileError, source::SourceError};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error in the `profile` module")]
    Profile(#[from] ProfileError),
    #[error("Error in the `source` module")]
    Source(#[from] SourceError),
}
