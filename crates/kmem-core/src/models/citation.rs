//! Search results and the citations they are made of.

use crate::codec::Timestamp;
use crate::models::tags::TagCollection;
use crate::optional::Optional;
use crate::resolver::OrRaw;
use crate::wire_model;

wire_model! {
    /// A chunk of a source document that matched.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Partition {
        pub text: Optional<String> => "text",
        pub relevance: Optional<f64> => "relevance",
        pub partition_number: Optional<i64> => "partitionNumber",
        pub section_number: Optional<i64> => "sectionNumber",
        pub last_update: Optional<Timestamp> => "lastUpdate",
        pub tags: Optional<OrRaw<TagCollection>> => "tags",
    }
}

wire_model! {
    /// A source document and its matching partitions.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Citation {
        pub link: Optional<String> => "link",
        pub index: Optional<String> => "index",
        pub document_id: Optional<String> => "documentId",
        pub file_id: Optional<String> => "fileId",
        pub source_content_type: Optional<String> => "sourceContentType",
        pub source_name: Optional<String> => "sourceName",
        pub source_url: Optional<String> => "sourceUrl",
        pub partitions: Optional<OrRaw<Vec<Partition>>> => "partitions",
    }
}

impl Citation {
    pub fn partitions(&self) -> &[Partition] {
        match &self.partitions {
            Optional::Present(OrRaw::Typed(partitions)) => partitions,
            _ => &[],
        }
    }

    /// Highest partition relevance, if any partition reports one.
    pub fn best_relevance(&self) -> Option<f64> {
        self.partitions()
            .iter()
            .filter_map(|p| p.relevance.present().copied())
            .fold(None, |best, r| Some(best.map_or(r, |b: f64| b.max(r))))
    }
}

wire_model! {
    /// Reply to `POST /search`.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct SearchResult {
        pub query: Optional<String> => "query",
        pub no_result: Optional<bool> => "noResult",
        pub results: Optional<OrRaw<Vec<Citation>>> => "results",
    }
}

impl SearchResult {
    pub fn citations(&self) -> &[Citation] {
        match &self.results {
            Optional::Present(OrRaw::Typed(citations)) => citations,
            _ => &[],
        }
    }
}
