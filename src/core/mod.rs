//! Core building blocks: row-to-case mapping, run settings, and the small
//! timestamp and URL helpers. Consumed by the high-level `api` module.
pub mod id;
pub mod mapper;
pub mod settings;
pub mod timestamp;
pub mod url;
