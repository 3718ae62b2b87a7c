use payloads::requests::DEFAULT_PAGE_LIMIT;
use payloads::responses::Pagination;

/// Snapshot of a list store: the current page of items plus the request
/// that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T, F> {
    pub items: Vec<T>,
    pub loading: bool,
    /// Message of the last failed operation, cleared when a load starts.
    pub error: Option<String>,
    pub filters: F,
    pub pagination: Pagination,
}

impl<T, F: Default> Default for ResourceState<T, F> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            filters: F::default(),
            pagination: Pagination::new(1, DEFAULT_PAGE_LIMIT, 0),
        }
    }
}

impl<T, F> ResourceState<T, F> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
