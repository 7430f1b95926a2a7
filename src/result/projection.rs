//! Result shaping
//!
//! Reduces the store's lazy list to what the caller asked for. Every
//! operation walks the list with an iterator; none of them index into it.

use crate::error::{QueryError, QueryResult};
use crate::planner::ResultShape;

use super::lazy::LazyList;
use super::page::{Page, Pageable};

/// Native results plus the shape the caller expects
#[derive(Debug)]
pub struct ResultProjection<T> {
    results: LazyList<T>,
    shape: ResultShape,
}

impl<T: Clone + 'static> ResultProjection<T> {
    pub fn new(results: LazyList<T>, shape: ResultShape) -> Self {
        Self { results, shape }
    }

    pub fn shape(&self) -> ResultShape {
        self.shape
    }

    /// Zero results is `None`, one is the entity, more is an error
    pub fn single_result(&self) -> QueryResult<Option<T>> {
        let mut iter = self.results.iter();
        let first = match iter.next() {
            None => return Ok(None),
            Some(item) => item?,
        };
        match iter.next() {
            None => Ok(Some(first)),
            Some(second) => {
                second?;
                let mut actual = 2;
                for item in iter {
                    item?;
                    actual += 1;
                }
                Err(QueryError::IncorrectResultSize {
                    expected: 1,
                    actual,
                })
            }
        }
    }

    /// The list itself, or the single result as a 0/1 list for
    /// single-entity shapes
    pub fn result_list(self) -> QueryResult<LazyList<T>> {
        if self.shape.is_single_entity() {
            let single = self.single_result()?;
            return Ok(LazyList::from_option(single));
        }
        Ok(self.results)
    }

    /// Answers from one emptiness check
    pub fn exists(&self) -> QueryResult<bool> {
        Ok(!self.results.is_empty()?)
    }

    /// Slices a page out of the list
    ///
    /// `count` supplies the total for paged requests and is not called for
    /// unpaged ones, whose total is the materialized size.
    pub fn paged_result<F>(self, pageable: Pageable, count: F) -> QueryResult<Page<T>>
    where
        F: FnOnce() -> QueryResult<u64>,
    {
        match pageable {
            Pageable::Unpaged => {
                let content = self.results.try_collect()?;
                let total = content.len() as u64;
                Ok(Page::new(content, pageable, total))
            }
            Pageable::Paged { size, .. } => {
                let total = count()?;
                let offset = usize::try_from(pageable.offset()).unwrap_or(usize::MAX);
                let content = self
                    .results
                    .iter()
                    .skip(offset)
                    .take(size as usize)
                    .collect::<Result<Vec<T>, _>>()?;
                Ok(Page::new(content, pageable, total))
            }
        }
    }

    pub fn into_results(self) -> LazyList<T> {
        self.results
    }
}
