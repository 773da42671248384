//! Request and response records of the memory service.

pub mod answer;
pub mod citation;
pub mod index;
pub mod problem;
pub mod query;
pub mod status;
pub mod tags;
pub mod upload;

pub use answer::{MemoryAnswer, StreamState, TokenUsage};
pub use citation::{Citation, Partition, SearchResult};
pub use index::{IndexCollection, IndexDetails};
pub use problem::ProblemDetails;
pub use query::{MemoryQuery, QueryArgs, SearchQuery};
pub use status::DataPipelineStatus;
pub use tags::{parse_tag, MemoryFilter, TagCollection, TagValue};
pub use upload::{
    DeleteAccepted, DocumentUpload, FileContent, FormField, FormValue, UploadAccepted, UploadFile,
};
