pub mod client;
pub mod guardrail;
pub mod json_extract;
pub mod prompt;
pub mod text_parse;

pub use client::*;
pub use guardrail::*;
pub use json_extract::*;
pub use prompt::*;
pub use text_parse::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("Generation endpoint unreachable at {0}")]
    Connection(String),

    #[error("Generation endpoint returned error (status {status}): {body}")]
    Endpoint { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("No JSON object found in model output")]
    NoJsonObject,

    #[error("Malformed JSON in model output: {0}")]
    MalformedJson(String),
}
