pub mod grid;
pub mod remote;
pub mod types;

pub use grid::*;
pub use remote::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("Detection endpoint unreachable at {0}")]
    Connection(String),

    #[error("Detection endpoint returned error (status {status}): {body}")]
    Endpoint { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Image encoding error: {0}")]
    ImageEncoding(String),
}
