#![deny(clippy::all)]
//! Node.js binding of the oxc linker, for bundler plugins.

use napi::{Error, Result, Status};
use napi_derive::napi;

use crate::linker::linker_options::LinkerOptions;
use crate::linker::oxc::link_source;

/// Links the partial declarations of `code`. `options` is the JSON form of `LinkerOptions`;
/// missing fields take their defaults.
#[napi]
pub fn link_file(filename: String, code: String, options: Option<String>) -> Result<String> {
    let options = match options {
        Some(json) => serde_json::from_str::<LinkerOptions>(&json).map_err(|error| {
            Error::new(
                Status::InvalidArg,
                format!("Invalid linker options: {}", error),
            )
        })?,
        None => LinkerOptions::default(),
    };
    link_source(&filename, &code, &options)
        .map_err(|error| Error::new(Status::GenericFailure, error.render()))
}
