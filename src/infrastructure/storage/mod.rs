mod local;
mod s3;

pub use local::LocalObjectStorage;
pub use s3::S3ObjectStorage;
