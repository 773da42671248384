//! Document upload requests and the service's acceptance replies.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::codec::WireCodec;
use crate::error::{DecodeError, Result};
use crate::models::tags::TagCollection;
use crate::optional::Optional;
use crate::wire::WireValue;
use crate::wire_model;

/// Raw file bytes; base64 text in JSON form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileContent(pub Vec<u8>);

impl WireCodec for FileContent {
    fn to_wire(&self) -> WireValue {
        WireValue::String(STANDARD.encode(&self.0))
    }

    fn from_wire(value: WireValue) -> Result<Self> {
        match value {
            WireValue::String(text) => STANDARD
                .decode(text.as_bytes())
                .map(FileContent)
                .map_err(|_| DecodeError::invalid_type("base64 string", &WireValue::String(text))),
            other => Err(DecodeError::invalid_type("base64 string", &other)),
        }
    }
}

wire_model! {
    /// One file of a document.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct UploadFile {
        pub file_name: String => "fileName",
        pub content_type: Optional<String> => "contentType",
        pub content: FileContent => "content",
    }
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: Optional::Absent,
            content: FileContent(content.into()),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Optional::Present(content_type.into());
        self
    }
}

/// Value of one multipart form part.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File(UploadFile),
}

/// One multipart form part.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub value: FormValue,
}

impl FormField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::Text(value.into()),
        }
    }

    pub fn file(name: impl Into<String>, file: UploadFile) -> Self {
        Self {
            name: name.into(),
            value: FormValue::File(file),
        }
    }
}

wire_model! {
    /// Request for `POST /upload`.
    ///
    /// Sent as a multipart form (see [`DocumentUpload::to_form`]); the JSON
    /// encoding exists so uploads can be stored and replayed.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct DocumentUpload {
        pub files: Vec<UploadFile> => "files",
        pub index: Optional<String> => "index",
        pub document_id: Optional<String> => "documentId",
        pub tags: Optional<TagCollection> => "tags",
        pub steps: Optional<Vec<String>> => "steps",
    }
}

impl DocumentUpload {
    pub fn new(file: UploadFile) -> Self {
        Self {
            files: vec![file],
            ..Default::default()
        }
    }

    pub fn file(mut self, file: UploadFile) -> Self {
        self.files.push(file);
        self
    }

    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Optional::Present(index.into());
        self
    }

    pub fn document_id(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = Optional::Present(document_id.into());
        self
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match &mut self.tags {
            Optional::Present(tags) => {
                tags.add(key, value);
            }
            slot => {
                let mut tags = TagCollection::new();
                tags.add(key, value);
                *slot = Optional::Present(tags);
            }
        }
        self
    }

    pub fn step(mut self, step: impl Into<String>) -> Self {
        match &mut self.steps {
            Optional::Present(steps) => steps.push(step.into()),
            slot => *slot = Optional::Present(vec![step.into()]),
        }
        self
    }

    /// Multipart parts in send order: `file1..fileN`, `index`, `documentId`,
    /// one `tags` part per `key:value`, one `steps` part per step. Absent and
    /// null fields produce no part.
    pub fn to_form(&self) -> Vec<FormField> {
        let mut form: Vec<FormField> = self
            .files
            .iter()
            .enumerate()
            .map(|(i, file)| FormField::file(format!("file{}", i + 1), file.clone()))
            .collect();

        if let Optional::Present(index) = &self.index {
            form.push(FormField::text("index", index.as_str()));
        }
        if let Optional::Present(document_id) = &self.document_id {
            form.push(FormField::text("documentId", document_id.as_str()));
        }
        if let Optional::Present(tags) = &self.tags {
            form.extend(tags.to_pairs().into_iter().map(|pair| FormField::text("tags", pair)));
        }
        if let Optional::Present(steps) = &self.steps {
            form.extend(steps.iter().map(|step| FormField::text("steps", step.as_str())));
        }
        form
    }
}

wire_model! {
    /// `202` reply to an upload: ingestion has been queued.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct UploadAccepted {
        pub index: Optional<String> => "index",
        pub document_id: Optional<String> => "documentId",
        pub message: Optional<String> => "message",
    }
}

wire_model! {
    /// `202` reply to an index or document deletion.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct DeleteAccepted {
        pub index: Optional<String> => "index",
        pub document_id: Optional<String> => "documentId",
        pub message: Optional<String> => "message",
    }
}
