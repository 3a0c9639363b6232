//! pixdiff-remote - Production collaborators for the diff pipeline
//!
//! Implements the `pixdiff-diff` capability traits against the real
//! world: [`HttpFetcher`] retrieves input images over HTTP, and
//! [`ObjectStorePublisher`] uploads finished overlays to an
//! S3-compatible object store. Both are blocking; the server runs them
//! under `spawn_blocking`.

pub mod fetch;
pub mod publish;

pub use fetch::HttpFetcher;
pub use publish::ObjectStorePublisher;
