//! Cursor-paginated result sets.

use serde::Serialize;

/// One page of results from a cursor-paginated endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    /// Cursor for the next page, if any
    pub next: Option<String>,
    /// Cursor for the previous page, if any
    pub previous: Option<String>,
}

impl<T> Page<T> {
    /// A page with no neighbours
    pub fn single(results: Vec<T>) -> Self {
        Self {
            results,
            next: None,
            previous: None,
        }
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}
