use crate::domain::message::Message;

const DEFAULT_PAGE_SIZE: usize = 50;
const MAX_PAGE_SIZE: usize = 200;

/// One page of history, newest page first, with an opaque cursor for the
/// next (older) page. `next_cursor = None` means history is exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePage {
    pub messages: Vec<Message>,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistorySourceError {
    Unauthorized,
    Unavailable,
    InvalidData,
}

/// Port to the server's cursor-paginated history endpoint.
pub trait HistorySource {
    fn fetch_page(
        &self,
        take: usize,
        cursor: Option<&str>,
    ) -> Result<MessagePage, HistorySourceError>;
}

impl<T> HistorySource for &T
where
    T: HistorySource + ?Sized,
{
    fn fetch_page(
        &self,
        take: usize,
        cursor: Option<&str>,
    ) -> Result<MessagePage, HistorySourceError> {
        (*self).fetch_page(take, cursor)
    }
}

/// Pagination or search failed; the local store is untouched and the caller
/// decides whether to retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    Unauthorized,
    TemporarilyUnavailable,
    DataContractViolation,
}

/// Fetches the most recent page.
pub fn load_initial(source: &dyn HistorySource, take: usize) -> Result<MessagePage, FetchError> {
    source
        .fetch_page(normalized_take(take), None)
        .map_err(map_source_error)
}

/// Fetches the page older than `cursor`.
pub fn load_older(
    source: &dyn HistorySource,
    take: usize,
    cursor: &str,
) -> Result<MessagePage, FetchError> {
    source
        .fetch_page(normalized_take(take), Some(cursor))
        .map_err(map_source_error)
}

fn normalized_take(take: usize) -> usize {
    match take {
        0 => DEFAULT_PAGE_SIZE,
        value if value > MAX_PAGE_SIZE => MAX_PAGE_SIZE,
        value => value,
    }
}

fn map_source_error(error: HistorySourceError) -> FetchError {
    match error {
        HistorySourceError::Unauthorized => FetchError::Unauthorized,
        HistorySourceError::Unavailable => FetchError::TemporarilyUnavailable,
        HistorySourceError::InvalidData => FetchError::DataContractViolation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct StubSource {
        result: Result<MessagePage, HistorySourceError>,
        captured_take: RefCell<Option<usize>>,
        captured_cursor: RefCell<Option<Option<String>>>,
    }

    impl StubSource {
        fn with_result(result: Result<MessagePage, HistorySourceError>) -> Self {
            Self {
                result,
                captured_take: RefCell::new(None),
                captured_cursor: RefCell::new(None),
            }
        }
    }

    impl HistorySource for StubSource {
        fn fetch_page(
            &self,
            take: usize,
            cursor: Option<&str>,
        ) -> Result<MessagePage, HistorySourceError> {
            *self.captured_take.borrow_mut() = Some(take);
            *self.captured_cursor.borrow_mut() = Some(cursor.map(str::to_owned));
            self.result.clone()
        }
    }

    fn empty_page() -> MessagePage {
        MessagePage {
            messages: vec![],
            next_cursor: None,
        }
    }

    #[test]
    fn uses_default_page_size_when_take_is_zero() {
        let source = StubSource::with_result(Ok(empty_page()));

        let _ = load_initial(&source, 0).expect("load must succeed");

        assert_eq!(*source.captured_take.borrow(), Some(50));
    }

    #[test]
    fn caps_page_size_to_maximum_boundary() {
        let source = StubSource::with_result(Ok(empty_page()));

        let _ = load_initial(&source, 999).expect("load must succeed");

        assert_eq!(*source.captured_take.borrow(), Some(200));
    }

    #[test]
    fn initial_load_passes_no_cursor() {
        let source = StubSource::with_result(Ok(empty_page()));

        let _ = load_initial(&source, 50).expect("load must succeed");

        assert_eq!(*source.captured_cursor.borrow(), Some(None));
    }

    #[test]
    fn older_load_passes_cursor_through() {
        let source = StubSource::with_result(Ok(empty_page()));

        let _ = load_older(&source, 50, "abc").expect("load must succeed");

        assert_eq!(
            *source.captured_cursor.borrow(),
            Some(Some("abc".to_owned()))
        );
    }

    #[test]
    fn maps_unavailable_error() {
        let source = StubSource::with_result(Err(HistorySourceError::Unavailable));

        let error = load_older(&source, 50, "abc").expect_err("load must fail");

        assert_eq!(error, FetchError::TemporarilyUnavailable);
    }

    #[test]
    fn maps_invalid_data_error() {
        let source = StubSource::with_result(Err(HistorySourceError::InvalidData));

        let error = load_initial(&source, 50).expect_err("load must fail");

        assert_eq!(error, FetchError::DataContractViolation);
    }
}
