//! Endpoint descriptors: one function per service operation.
//!
//! Each function builds the request and pairs it with the operation's status
//! table. Nothing is sent; pass the [`Call`] to a client or a [`Dispatcher`].
//!
//! [`Dispatcher`]: crate::dispatch::Dispatcher

use kmem_core::{
    DataPipelineStatus, DeleteAccepted, DocumentUpload, IndexCollection, MemoryAnswer, MemoryQuery,
    Model, Optional, ProblemDetails, SearchQuery, SearchResult, UploadAccepted,
};

use crate::dispatch::{Call, DecodePath, StatusTable};
use crate::transport::{HttpMethod, HttpRequest};

use DecodePath::{Acknowledge, Alternate, Primary};

pub const UPLOAD_STATUSES: StatusTable = &[
    (200, Acknowledge),
    (202, Primary),
    (400, Alternate),
    (401, Alternate),
    (403, Alternate),
    (503, Alternate),
];

pub const ASK_STATUSES: StatusTable = &[
    (200, Primary),
    (401, Alternate),
    (403, Alternate),
    (503, Alternate),
];

pub const SEARCH_STATUSES: StatusTable = &[(200, Primary), (401, Alternate), (403, Alternate)];

pub const UPLOAD_STATUS_STATUSES: StatusTable = &[
    (200, Primary),
    (400, Alternate),
    (401, Alternate),
    (403, Alternate),
    (404, Alternate),
    (413, Alternate),
];

pub const LIST_INDEXES_STATUSES: StatusTable = &[(200, Primary), (401, Alternate), (403, Alternate)];

pub const DELETE_STATUSES: StatusTable = &[(202, Primary), (401, Alternate), (403, Alternate)];

/// `POST /upload` as a multipart form.
pub fn upload_document(upload: &DocumentUpload) -> Call<UploadAccepted, ProblemDetails> {
    let request = HttpRequest::new(HttpMethod::Post, "/upload").multipart(upload.to_form());
    Call::new("upload_document", request, UPLOAD_STATUSES)
}

/// `POST /ask`.
pub fn ask(query: &MemoryQuery) -> Call<MemoryAnswer, ProblemDetails> {
    let request = HttpRequest::new(HttpMethod::Post, "/ask").json(query.encode());
    Call::new("ask", request, ASK_STATUSES)
}

/// `POST /search`.
pub fn search(query: &SearchQuery) -> Call<SearchResult, ProblemDetails> {
    let request = HttpRequest::new(HttpMethod::Post, "/search").json(query.encode());
    Call::new("search", request, SEARCH_STATUSES)
}

/// `GET /upload-status?index=&documentId=`.
pub fn upload_status(
    index: Optional<&str>,
    document_id: &str,
) -> Call<DataPipelineStatus, ProblemDetails> {
    let request = HttpRequest::new(HttpMethod::Get, "/upload-status")
        .query_param("index", index)
        .query_param("documentId", Optional::Present(document_id));
    Call::new("upload_status", request, UPLOAD_STATUS_STATUSES)
}

/// `GET /indexes`.
pub fn list_indexes() -> Call<IndexCollection, ProblemDetails> {
    let request = HttpRequest::new(HttpMethod::Get, "/indexes");
    Call::new("list_indexes", request, LIST_INDEXES_STATUSES)
}

/// `DELETE /indexes?index=`.
pub fn delete_index(index: Optional<&str>) -> Call<DeleteAccepted, ProblemDetails> {
    let request = HttpRequest::new(HttpMethod::Delete, "/indexes").query_param("index", index);
    Call::new("delete_index", request, DELETE_STATUSES)
}

/// `DELETE /documents?index=&documentId=`.
pub fn delete_document(
    index: Optional<&str>,
    document_id: &str,
) -> Call<DeleteAccepted, ProblemDetails> {
    let request = HttpRequest::new(HttpMethod::Delete, "/documents")
        .query_param("index", index)
        .query_param("documentId", Optional::Present(document_id));
    Call::new("delete_document", request, DELETE_STATUSES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RequestBody;
    use kmem_core::UploadFile;
    use serde_json::json;

    #[test]
    fn test_search_descriptor() {
        let call = search(&SearchQuery::new("default", "test").limit(3));
        assert_eq!(call.request.method, HttpMethod::Post);
        assert_eq!(call.request.path, "/search");
        assert_eq!(
            call.request.body,
            RequestBody::Json(json!({"index": "default", "query": "test", "limit": 3}))
        );
        assert_eq!(call.decode_path(200), Some(Primary));
        assert_eq!(call.decode_path(503), None);
    }

    #[test]
    fn test_upload_descriptor() {
        let upload = DocumentUpload::new(UploadFile::new("a.txt", b"x".to_vec())).index("docs");
        let call = upload_document(&upload);
        match &call.request.body {
            RequestBody::Multipart(parts) => assert_eq!(parts.len(), 2),
            other => panic!("expected multipart, got {:?}", other),
        }
        assert_eq!(call.decode_path(200), Some(Acknowledge));
        assert_eq!(call.decode_path(202), Some(Primary));
        assert_eq!(call.decode_path(503), Some(Alternate));
    }

    #[test]
    fn test_upload_status_omits_absent_index() {
        let call = upload_status(Optional::Absent, "doc-1");
        assert_eq!(
            call.request.query,
            vec![("documentId".to_string(), "doc-1".to_string())]
        );
        assert_eq!(call.decode_path(413), Some(Alternate));
    }

    #[test]
    fn test_delete_descriptors() {
        let call = delete_document(Optional::Present("docs"), "doc-1");
        assert_eq!(call.request.method, HttpMethod::Delete);
        assert_eq!(call.request.path, "/documents");
        assert_eq!(call.request.query.len(), 2);

        let call = delete_index(Optional::Null);
        assert_eq!(call.request.path, "/indexes");
        assert!(call.request.query.is_empty());
        assert_eq!(call.decode_path(202), Some(Primary));
    }

    #[test]
    fn test_list_indexes_descriptor() {
        let call = list_indexes();
        assert_eq!(call.request.method, HttpMethod::Get);
        assert_eq!(call.request.body, RequestBody::Empty);
        assert_eq!(call.operation, "list_indexes");
    }
}
