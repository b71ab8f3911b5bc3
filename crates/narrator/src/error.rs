use thiserror::Error;

#[derive(Error, Debug)]
pub enum NarratorError {
    #[error("Cannot summarise race '{0}' without any drivers")]
    NoDrivers(String),
}
