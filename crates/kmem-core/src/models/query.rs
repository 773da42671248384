//! Search and ask requests.

use crate::models::tags::MemoryFilter;
use crate::optional::Optional;
use crate::resolver::OrRaw;
use crate::wire::WireValue;
use crate::wire_model;

wire_model! {
    /// Free-form arguments forwarded to the service's pipeline handlers.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct QueryArgs {
        ; extra values
    }
}

impl QueryArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: WireValue) -> Self {
        self.values.set(key, value);
        self
    }
}

wire_model! {
    /// Request body for `POST /search`. An absent index targets the
    /// service's default index.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct SearchQuery {
        pub index: Optional<String> => "index",
        pub query: Optional<String> => "query",
        pub filters: Optional<OrRaw<Vec<MemoryFilter>>> => "filters",
        pub min_relevance: Optional<f64> => "minRelevance",
        pub limit: Optional<i64> => "limit",
        pub args: Optional<OrRaw<QueryArgs>> => "args",
    }
}

impl SearchQuery {
    pub fn new(index: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            index: Optional::Present(index.into()),
            query: Optional::Present(query.into()),
            ..Default::default()
        }
    }

    pub fn filter(mut self, filter: MemoryFilter) -> Self {
        push_filter(&mut self.filters, filter);
        self
    }

    pub fn filters(mut self, filters: Vec<MemoryFilter>) -> Self {
        for filter in filters {
            push_filter(&mut self.filters, filter);
        }
        self
    }

    pub fn min_relevance(mut self, min_relevance: f64) -> Self {
        self.min_relevance = Optional::Present(min_relevance);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Optional::Present(limit);
        self
    }

    pub fn args(mut self, args: QueryArgs) -> Self {
        self.args = Optional::Present(OrRaw::Typed(args));
        self
    }

    /// Typed filters, empty when absent or not decodable.
    pub fn filter_list(&self) -> &[MemoryFilter] {
        typed_filters(&self.filters)
    }
}

wire_model! {
    /// Request body for `POST /ask`.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct MemoryQuery {
        pub index: Optional<String> => "index",
        pub question: Optional<String> => "question",
        pub filters: Optional<OrRaw<Vec<MemoryFilter>>> => "filters",
        pub min_relevance: Optional<f64> => "minRelevance",
        pub stream: Optional<bool> => "stream",
        pub args: Optional<OrRaw<QueryArgs>> => "args",
    }
}

impl MemoryQuery {
    pub fn new(index: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            index: Optional::Present(index.into()),
            question: Optional::Present(question.into()),
            ..Default::default()
        }
    }

    pub fn filter(mut self, filter: MemoryFilter) -> Self {
        push_filter(&mut self.filters, filter);
        self
    }

    pub fn filters(mut self, filters: Vec<MemoryFilter>) -> Self {
        for filter in filters {
            push_filter(&mut self.filters, filter);
        }
        self
    }

    pub fn min_relevance(mut self, min_relevance: f64) -> Self {
        self.min_relevance = Optional::Present(min_relevance);
        self
    }

    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = Optional::Present(stream);
        self
    }

    pub fn args(mut self, args: QueryArgs) -> Self {
        self.args = Optional::Present(OrRaw::Typed(args));
        self
    }

    pub fn filter_list(&self) -> &[MemoryFilter] {
        typed_filters(&self.filters)
    }
}

fn push_filter(filters: &mut Optional<OrRaw<Vec<MemoryFilter>>>, filter: MemoryFilter) {
    if let Optional::Present(OrRaw::Typed(list)) = filters {
        list.push(filter);
        return;
    }
    *filters = Optional::Present(OrRaw::Typed(vec![filter]));
}

fn typed_filters(filters: &Optional<OrRaw<Vec<MemoryFilter>>>) -> &[MemoryFilter] {
    match filters {
        Optional::Present(OrRaw::Typed(list)) => list,
        _ => &[],
    }
}
