mod local;
mod qdrant;

pub use local::{remove_dir_with_retry, DeleteRetry, LocalVectorIndex};
pub use qdrant::QdrantVectorIndex;
