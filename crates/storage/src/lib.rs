//! Object storage access (MinIO/S3 compatible) for climate data products.

pub mod object_store;

pub use self::object_store::{ObjectStorage, ObjectStorageConfig};
