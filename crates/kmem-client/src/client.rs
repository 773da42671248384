//! Memory service clients.
//!
//! [`MemoryClient`] is awaitable and [`BlockingMemoryClient`] blocks the
//! calling thread. Both send the same [`Call`]s through the same
//! [`Dispatcher`], so a response decodes identically in either mode.

use tracing::info;

use kmem_core::{
    DataPipelineStatus, DeleteAccepted, DocumentUpload, IndexCollection, MemoryAnswer, MemoryQuery,
    Model, Optional, ProblemDetails, SearchQuery, SearchResult, UploadAccepted,
};

use crate::api;
use crate::config::ClientConfig;
use crate::dispatch::{Call, Dispatcher, Outcome, Response};
use crate::error::Result;
use crate::http::{BlockingReqwestTransport, ReqwestTransport};
use crate::transport::{AsyncTransport, Transport};

/// Settings both clients apply on top of their transport.
#[derive(Debug, Clone)]
struct Defaults {
    dispatcher: Dispatcher,
    index: String,
}

impl Defaults {
    fn new(config: &ClientConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(config.raise_on_unexpected_status),
            index: config.default_index.clone(),
        }
    }

    fn index<'a>(&'a self, index: Option<&'a str>) -> Optional<&'a str> {
        Optional::Present(index.unwrap_or(&self.index))
    }

    fn search(&self, query: &SearchQuery) -> SearchQuery {
        let mut query = query.clone();
        if query.index.is_absent() {
            query.index = Optional::Present(self.index.clone());
        }
        query
    }

    fn ask(&self, query: &MemoryQuery) -> MemoryQuery {
        let mut query = query.clone();
        if query.index.is_absent() {
            query.index = Optional::Present(self.index.clone());
        }
        query
    }

    fn upload(&self, upload: &DocumentUpload) -> DocumentUpload {
        let mut upload = upload.clone();
        if upload.index.is_absent() {
            upload.index = Optional::Present(self.index.clone());
        }
        upload
    }
}

fn log_construction(mode: &str, config: &ClientConfig) {
    info!(
        subsystem = "client",
        component = mode,
        base_url = %config.base_url,
        timeout_secs = config.timeout_seconds,
        auth = config.token.is_some(),
        "Initializing memory client"
    );
}

/// Awaitable client.
#[derive(Debug, Clone)]
pub struct MemoryClient<T = ReqwestTransport> {
    transport: T,
    defaults: Defaults,
}

impl MemoryClient<ReqwestTransport> {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        log_construction("async", &config);
        Ok(Self::with_transport(transport, &config))
    }

    /// Create from `KM_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }
}

impl<T: AsyncTransport> MemoryClient<T> {
    pub fn with_transport(transport: T, config: &ClientConfig) -> Self {
        Self {
            transport,
            defaults: Defaults::new(config),
        }
    }

    pub fn default_index(&self) -> &str {
        &self.defaults.index
    }

    /// A search request against the default index.
    pub fn search_query(&self, query: impl Into<String>) -> SearchQuery {
        SearchQuery::new(self.defaults.index.clone(), query)
    }

    /// A question against the default index.
    pub fn memory_query(&self, question: impl Into<String>) -> MemoryQuery {
        MemoryQuery::new(self.defaults.index.clone(), question)
    }

    pub async fn execute<R: Model, P: Model>(&self, call: Call<R, P>) -> Result<Outcome<R, P>> {
        Ok(self.execute_detailed(call).await?.parsed)
    }

    /// Like [`execute`](Self::execute), keeping status, headers and body.
    pub async fn execute_detailed<R: Model, P: Model>(
        &self,
        call: Call<R, P>,
    ) -> Result<Response<Outcome<R, P>>> {
        self.defaults
            .dispatcher
            .send_async(&self.transport, call)
            .await
    }

    /// Upload a document. An absent index is set to the default index.
    pub async fn upload_document(
        &self,
        upload: &DocumentUpload,
    ) -> Result<Outcome<UploadAccepted, ProblemDetails>> {
        let upload = self.defaults.upload(upload);
        self.execute(api::upload_document(&upload)).await
    }

    /// Ask a question. An absent index is set to the default index.
    pub async fn ask(&self, query: &MemoryQuery) -> Result<Outcome<MemoryAnswer, ProblemDetails>> {
        self.execute(api::ask(&self.defaults.ask(query))).await
    }

    pub async fn search(
        &self,
        query: &SearchQuery,
    ) -> Result<Outcome<SearchResult, ProblemDetails>> {
        self.execute(api::search(&self.defaults.search(query))).await
    }

    pub async fn upload_status(
        &self,
        index: Option<&str>,
        document_id: &str,
    ) -> Result<Outcome<DataPipelineStatus, ProblemDetails>> {
        self.execute(api::upload_status(self.defaults.index(index), document_id))
            .await
    }

    pub async fn list_indexes(&self) -> Result<Outcome<IndexCollection, ProblemDetails>> {
        self.execute(api::list_indexes()).await
    }

    pub async fn delete_index(
        &self,
        index: Option<&str>,
    ) -> Result<Outcome<DeleteAccepted, ProblemDetails>> {
        self.execute(api::delete_index(self.defaults.index(index)))
            .await
    }

    pub async fn delete_document(
        &self,
        index: Option<&str>,
        document_id: &str,
    ) -> Result<Outcome<DeleteAccepted, ProblemDetails>> {
        self.execute(api::delete_document(self.defaults.index(index), document_id))
            .await
    }
}

/// Blocking client. Do not use from inside an async runtime.
#[derive(Debug, Clone)]
pub struct BlockingMemoryClient<T = BlockingReqwestTransport> {
    transport: T,
    defaults: Defaults,
}

impl BlockingMemoryClient<BlockingReqwestTransport> {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = BlockingReqwestTransport::new(&config)?;
        log_construction("blocking", &config);
        Ok(Self::with_transport(transport, &config))
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }
}

impl<T: Transport> BlockingMemoryClient<T> {
    pub fn with_transport(transport: T, config: &ClientConfig) -> Self {
        Self {
            transport,
            defaults: Defaults::new(config),
        }
    }

    pub fn default_index(&self) -> &str {
        &self.defaults.index
    }

    pub fn search_query(&self, query: impl Into<String>) -> SearchQuery {
        SearchQuery::new(self.defaults.index.clone(), query)
    }

    pub fn memory_query(&self, question: impl Into<String>) -> MemoryQuery {
        MemoryQuery::new(self.defaults.index.clone(), question)
    }

    pub fn execute<R: Model, P: Model>(&self, call: Call<R, P>) -> Result<Outcome<R, P>> {
        Ok(self.execute_detailed(call)?.parsed)
    }

    pub fn execute_detailed<R: Model, P: Model>(
        &self,
        call: Call<R, P>,
    ) -> Result<Response<Outcome<R, P>>> {
        self.defaults.dispatcher.send(&self.transport, call)
    }

    pub fn upload_document(
        &self,
        upload: &DocumentUpload,
    ) -> Result<Outcome<UploadAccepted, ProblemDetails>> {
        let upload = self.defaults.upload(upload);
        self.execute(api::upload_document(&upload))
    }

    pub fn ask(&self, query: &MemoryQuery) -> Result<Outcome<MemoryAnswer, ProblemDetails>> {
        self.execute(api::ask(&self.defaults.ask(query)))
    }

    pub fn search(&self, query: &SearchQuery) -> Result<Outcome<SearchResult, ProblemDetails>> {
        self.execute(api::search(&self.defaults.search(query)))
    }

    pub fn upload_status(
        &self,
        index: Option<&str>,
        document_id: &str,
    ) -> Result<Outcome<DataPipelineStatus, ProblemDetails>> {
        self.execute(api::upload_status(self.defaults.index(index), document_id))
    }

    pub fn list_indexes(&self) -> Result<Outcome<IndexCollection, ProblemDetails>> {
        self.execute(api::list_indexes())
    }

    pub fn delete_index(
        &self,
        index: Option<&str>,
    ) -> Result<Outcome<DeleteAccepted, ProblemDetails>> {
        self.execute(api::delete_index(self.defaults.index(index)))
    }

    pub fn delete_document(
        &self,
        index: Option<&str>,
        document_id: &str,
    ) -> Result<Outcome<DeleteAccepted, ProblemDetails>> {
        self.execute(api::delete_document(self.defaults.index(index), document_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::transport::RequestBody;
    use kmem_core::{FormValue, UploadFile};
    use serde_json::json;

    fn config() -> ClientConfig {
        ClientConfig::default().with_default_index("docs")
    }

    #[test]
    fn test_blocking_fills_default_index() {
        let transport = MockTransport::new()
            .with_json(200, json!({"completed": true}))
            .with_json(202, json!({"index": "docs"}));
        let client = BlockingMemoryClient::with_transport(transport.clone(), &config());

        let status = client.upload_status(None, "doc-1").unwrap().decoded().unwrap();
        assert!(status.is_ready());
        client.delete_index(Some("other")).unwrap();

        let sent = transport.requests();
        assert_eq!(
            sent[0].query,
            vec![
                ("index".to_string(), "docs".to_string()),
                ("documentId".to_string(), "doc-1".to_string()),
            ]
        );
        assert_eq!(sent[1].query, vec![("index".to_string(), "other".to_string())]);
    }

    #[test]
    fn test_upload_keeps_explicit_index() {
        let transport = MockTransport::new()
            .with_json(202, json!({}))
            .with_json(202, json!({}));
        let client = BlockingMemoryClient::with_transport(transport.clone(), &config());

        let file = UploadFile::new("a.txt", b"x".to_vec());
        client.upload_document(&DocumentUpload::new(file.clone())).unwrap();
        client
            .upload_document(&DocumentUpload::new(file).index("mine"))
            .unwrap();

        let indexes: Vec<String> = transport
            .requests()
            .iter()
            .map(|request| match &request.body {
                RequestBody::Multipart(parts) => parts
                    .iter()
                    .find(|p| p.name == "index")
                    .and_then(|p| match &p.value {
                        FormValue::Text(text) => Some(text.clone()),
                        FormValue::File(_) => None,
                    })
                    .unwrap_or_default(),
                other => panic!("expected multipart, got {:?}", other),
            })
            .collect();
        assert_eq!(indexes, vec!["docs", "mine"]);
    }

    #[test]
    fn test_query_helpers_use_default_index() {
        let client = BlockingMemoryClient::with_transport(MockTransport::new(), &config());
        assert_eq!(client.default_index(), "docs");
        assert_eq!(client.search_query("q").index, Optional::Present("docs".to_string()));
        assert_eq!(client.memory_query("q").index, Optional::Present("docs".to_string()));
    }

    #[test]
    fn test_search_and_ask_fill_only_absent_index() {
        let transport = MockTransport::new()
            .with_json(200, json!({}))
            .with_json(200, json!({}))
            .with_json(200, json!({}));
        let client = BlockingMemoryClient::with_transport(transport.clone(), &config());

        let mut absent = SearchQuery::new("ignored", "q");
        absent.index = Optional::Absent;
        client.search(&absent).unwrap();

        let mut null = MemoryQuery::new("ignored", "why?");
        null.index = Optional::Null;
        client.ask(&null).unwrap();

        client.search(&SearchQuery::new("mine", "q")).unwrap();

        let bodies: Vec<_> = transport
            .requests()
            .into_iter()
            .map(|request| match request.body {
                RequestBody::Json(body) => body["index"].clone(),
                other => panic!("expected JSON, got {:?}", other),
            })
            .collect();
        assert_eq!(bodies, vec![json!("docs"), json!(null), json!("mine")]);
    }

    #[tokio::test]
    async fn test_async_detailed_keeps_raw_content() {
        let transport = MockTransport::new().with_json(401, json!({"title": "Unauthorized"}));
        let client = MemoryClient::with_transport(transport, &config());

        let response = client.execute_detailed(api::list_indexes()).await.unwrap();
        assert_eq!(response.status, 401);
        assert_eq!(response.content, br#"{"title":"Unauthorized"}"#);
        let problem = response.parsed.alternate().unwrap();
        assert_eq!(problem.title, Optional::Present("Unauthorized".to_string()));
    }

    #[tokio::test]
    async fn test_async_and_blocking_agree() {
        let body = json!({"noResult": false, "results": [{"documentId": "d1"}]});
        let query = SearchQuery::new("docs", "q");

        let async_client =
            MemoryClient::with_transport(MockTransport::new().with_json(200, body.clone()), &config());
        let async_outcome = async_client.search(&query).await.unwrap();

        let blocking_client =
            BlockingMemoryClient::with_transport(MockTransport::new().with_json(200, body), &config());
        let blocking_outcome = blocking_client.search(&query).unwrap();

        assert_eq!(async_outcome, blocking_outcome);
    }
}
