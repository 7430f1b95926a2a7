//! Lazy result lists
//!
//! A `LazyList` stands in for the store client's paginated result list.
//! It can be iterated any number of times, each pass starting from the
//! beginning, and deliberately offers no length or positional access:
//! asking for element `n` would force every earlier page to be fetched.

use std::fmt;

use crate::store::{StoreError, StoreResult};

type Source<T> = Box<dyn Fn() -> Box<dyn Iterator<Item = StoreResult<T>>>>;

/// Restartable, single-pass-per-iteration sequence of store results
pub struct LazyList<T> {
    source: Source<T>,
}

impl<T: 'static> LazyList<T> {
    /// Creates a list whose every pass calls `source` afresh
    pub fn new<F, I>(source: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = StoreResult<T>>,
        I::IntoIter: 'static,
    {
        Self {
            source: Box::new(move || Box::new(source().into_iter())),
        }
    }

    pub fn empty() -> Self {
        Self::new(std::iter::empty)
    }

    /// Starts a new pass
    pub fn iter(&self) -> Box<dyn Iterator<Item = StoreResult<T>>> {
        (self.source)()
    }

    /// Emptiness check that pulls at most one element from one pass
    pub fn is_empty(&self) -> StoreResult<bool> {
        match self.iter().next() {
            None => Ok(true),
            Some(Ok(_)) => Ok(false),
            Some(Err(err)) => Err(err),
        }
    }

    /// Materializes one full pass, stopping at the first error
    pub fn try_collect(&self) -> StoreResult<Vec<T>> {
        self.iter().collect()
    }
}

impl<T: Clone + 'static> LazyList<T> {
    pub fn from_vec(items: Vec<T>) -> Self {
        Self::new(move || items.clone().into_iter().map(Ok))
    }

    pub fn from_option(item: Option<T>) -> Self {
        Self::new(move || item.clone().into_iter().map(Ok))
    }

    /// A list whose every pass fails with the same message
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(move || std::iter::once(Err(StoreError::new(message.clone()))))
    }
}

impl<'a, T: 'static> IntoIterator for &'a LazyList<T> {
    type Item = StoreResult<T>;
    type IntoIter = Box<dyn Iterator<Item = StoreResult<T>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> fmt::Debug for LazyList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyList").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_restartable() {
        let list = LazyList::from_vec(vec![1, 2, 3]);
        assert_eq!(list.try_collect().unwrap(), vec![1, 2, 3]);
        assert_eq!(list.try_collect().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_is_empty_pulls_one_element() {
        let pulled = Rc::new(Cell::new(0));
        let counter = Rc::clone(&pulled);
        let list = LazyList::new(move || {
            let counter = Rc::clone(&counter);
            (0..100).map(move |i| {
                counter.set(counter.get() + 1);
                Ok(i)
            })
        });

        assert!(!list.is_empty().unwrap());
        assert_eq!(pulled.get(), 1);
        assert!(LazyList::<i32>::empty().is_empty().unwrap());
    }

    #[test]
    fn test_error_propagates() {
        let list = LazyList::<i32>::failing("page fetch failed");
        assert!(list.is_empty().is_err());
        assert!(list.try_collect().is_err());
    }

    #[test]
    fn test_for_loop() {
        let list = LazyList::from_option(Some("only"));
        let mut seen = Vec::new();
        for item in &list {
            seen.push(item.unwrap());
        }
        assert_eq!(seen, vec!["only"]);
    }
}
