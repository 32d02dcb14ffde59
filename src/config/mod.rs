//! Configuration for kofer
//!
//! Currently limited to path resolution for the encrypted store file.

pub mod paths;

pub use paths::KoferPaths;
