//! Paging

use crate::error::{QueryError, QueryResult};

/// Requested slice of a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Pageable {
    /// Everything, in one page
    #[default]
    Unpaged,
    /// Zero-based page number and page size
    Paged { page: u32, size: u32 },
}

impl Pageable {
    /// A page request; size must be at least one
    pub fn of(page: u32, size: u32) -> QueryResult<Self> {
        if size == 0 {
            return Err(QueryError::unsupported("page size must be at least 1"));
        }
        Ok(Pageable::Paged { page, size })
    }

    pub fn is_paged(&self) -> bool {
        matches!(self, Pageable::Paged { .. })
    }

    /// Number of elements preceding this page
    pub fn offset(&self) -> u64 {
        match self {
            Pageable::Unpaged => 0,
            Pageable::Paged { page, size } => u64::from(*page) * u64::from(*size),
        }
    }

    pub fn size(&self) -> Option<u32> {
        match self {
            Pageable::Unpaged => None,
            Pageable::Paged { size, .. } => Some(*size),
        }
    }
}

/// One page of results plus the total match count
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    content: Vec<T>,
    pageable: Pageable,
    total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, pageable: Pageable, total_elements: u64) -> Self {
        Self {
            content,
            pageable,
            total_elements,
        }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    pub fn pageable(&self) -> Pageable {
        self.pageable
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn total_pages(&self) -> u64 {
        match self.pageable {
            Pageable::Unpaged => 1,
            Pageable::Paged { size, .. } => {
                let size = u64::from(size);
                (self.total_elements + size - 1) / size
            }
        }
    }

    pub fn number(&self) -> u32 {
        match self.pageable {
            Pageable::Unpaged => 0,
            Pageable::Paged { page, .. } => page,
        }
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.number()) + 1 < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number() > 0
    }
}
