//! Configuration files read by the `ng-link` binary.

pub mod linker_config;
