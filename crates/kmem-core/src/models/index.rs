//! Index listing.

use crate::optional::Optional;
use crate::resolver::OrRaw;
use crate::wire_model;

wire_model! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct IndexDetails {
        pub name: Optional<String> => "name",
    }
}

wire_model! {
    /// Reply to `GET /indexes`.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct IndexCollection {
        pub results: Optional<OrRaw<Vec<IndexDetails>>> => "results",
    }
}

impl IndexCollection {
    pub fn indexes(&self) -> &[IndexDetails] {
        match &self.results {
            Optional::Present(OrRaw::Typed(indexes)) => indexes,
            _ => &[],
        }
    }

    /// Names of the listed indexes, skipping entries without one.
    pub fn names(&self) -> Vec<&str> {
        self.indexes()
            .iter()
            .filter_map(|index| index.name.present().map(String::as_str))
            .collect()
    }
}
