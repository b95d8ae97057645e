use crate::domain::message::Message;

const DEFAULT_SEARCH_PAGE_SIZE: usize = 20;
const MAX_SEARCH_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub take: usize,
    pub cursor: Option<String>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            take: DEFAULT_SEARCH_PAGE_SIZE,
            cursor: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    pub results: Vec<Message>,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchSourceError {
    Unauthorized,
    Unavailable,
    InvalidData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Query is empty after trimming whitespace.
    EmptyQuery,
    Unauthorized,
    TemporarilyUnavailable,
    DataContractViolation,
}

/// Port to the server's message search endpoint.
pub trait SearchSource {
    fn search(
        &self,
        query: &str,
        take: usize,
        cursor: Option<&str>,
    ) -> Result<SearchPage, SearchSourceError>;
}

impl<T: SearchSource + ?Sized> SearchSource for &T {
    fn search(
        &self,
        query: &str,
        take: usize,
        cursor: Option<&str>,
    ) -> Result<SearchPage, SearchSourceError> {
        (*self).search(query, take, cursor)
    }
}

pub fn search_messages(
    source: &dyn SearchSource,
    query: SearchQuery,
) -> Result<SearchPage, SearchError> {
    let text = query.query.trim();
    if text.is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    let take = match query.take {
        0 => DEFAULT_SEARCH_PAGE_SIZE,
        value if value > MAX_SEARCH_PAGE_SIZE => MAX_SEARCH_PAGE_SIZE,
        value => value,
    };

    source
        .search(text, take, query.cursor.as_deref())
        .map_err(map_source_error)
}

fn map_source_error(error: SearchSourceError) -> SearchError {
    match error {
        SearchSourceError::Unauthorized => SearchError::Unauthorized,
        SearchSourceError::Unavailable => SearchError::TemporarilyUnavailable,
        SearchSourceError::InvalidData => SearchError::DataContractViolation,
    }
}
