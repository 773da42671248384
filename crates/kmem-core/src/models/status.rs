//! Ingestion pipeline status.

use crate::codec::Timestamp;
use crate::models::tags::TagCollection;
use crate::optional::Optional;
use crate::resolver::OrRaw;
use crate::wire_model;

wire_model! {
    /// Reply to `GET /upload-status`. This record keeps snake_case wire names.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct DataPipelineStatus {
        pub completed: Optional<bool> => "completed",
        pub empty: Optional<bool> => "empty",
        pub index: Optional<String> => "index",
        pub document_id: Optional<String> => "document_id",
        pub tags: Optional<OrRaw<TagCollection>> => "tags",
        pub creation: Optional<Timestamp> => "creation",
        pub last_update: Optional<Timestamp> => "last_update",
        pub steps: Optional<Vec<String>> => "steps",
        pub remaining_steps: Optional<Vec<String>> => "remaining_steps",
        pub completed_steps: Optional<Vec<String>> => "completed_steps",
    }
}

impl DataPipelineStatus {
    /// Completed and produced at least one record.
    pub fn is_ready(&self) -> bool {
        self.completed == Optional::Present(true) && self.empty != Optional::Present(true)
    }

    pub fn remaining(&self) -> &[String] {
        self.remaining_steps.present().map(Vec::as_slice).unwrap_or(&[])
    }
}
