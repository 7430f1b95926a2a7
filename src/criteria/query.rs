//! Built queries
//!
//! A built query holds its native request and calls the store only when
//! consumed. Consuming it twice issues the request twice.

use std::marker::PhantomData;

use crate::error::{QueryError, QueryResult};
use crate::observability::{log_event, Event};
use crate::planner::{AccessPath, ResultShape};
use crate::result::{LazyList, Page, Pageable, ResultProjection};
use crate::schema::KeySchema;
use crate::store::StoreOperations;

use super::request::StoreRequest;

/// Item query over entities of type `T`
pub struct Query<'a, T, S: StoreOperations<T> + ?Sized> {
    store: &'a S,
    schema: &'a KeySchema,
    path: AccessPath,
    request: StoreRequest,
    shape: ResultShape,
    _entity: PhantomData<fn() -> T>,
}

impl<'a, T, S> Query<'a, T, S>
where
    T: Clone + 'static,
    S: StoreOperations<T> + ?Sized,
{
    pub(crate) fn new(
        store: &'a S,
        schema: &'a KeySchema,
        path: AccessPath,
        request: StoreRequest,
        shape: ResultShape,
    ) -> Self {
        Self {
            store,
            schema,
            path,
            request,
            shape,
            _entity: PhantomData,
        }
    }

    pub fn request(&self) -> &StoreRequest {
        &self.request
    }

    pub fn path(&self) -> &AccessPath {
        &self.path
    }

    pub fn shape(&self) -> ResultShape {
        self.shape
    }

    /// Calls the store
    pub fn execute(&self) -> QueryResult<ResultProjection<T>> {
        let results = match &self.request {
            StoreRequest::Load(request) => LazyList::from_option(self.store.load(self.schema, request)?),
            StoreRequest::Query(request) => self.store.query(self.schema, request)?,
            StoreRequest::Scan(request) => self.store.scan(self.schema, request)?,
        };
        log_event(
            Event::QueryExecuted,
            &[
                ("entity", self.schema.entity()),
                ("path", self.path.kind().as_str()),
                ("request", self.request.kind()),
            ],
        );
        Ok(ResultProjection::new(results, self.shape))
    }

    pub fn single_result(&self) -> QueryResult<Option<T>> {
        self.execute()?.single_result()
    }

    pub fn result_list(&self) -> QueryResult<LazyList<T>> {
        self.execute()?.result_list()
    }

    pub fn exists(&self) -> QueryResult<bool> {
        self.execute()?.exists()
    }

    /// One page of results; `count` supplies the total for paged requests
    ///
    /// A paged request rejects a count that would scan without scan
    /// counting enabled, before the store is called.
    pub fn page(&self, count: &CountQuery<'_, T, S>, pageable: Pageable) -> QueryResult<Page<T>> {
        if pageable.is_paged() && !count.serves_pages {
            return Err(QueryError::unsupported(format!(
                "counting '{}' for a page requires a scan and scan counting is not enabled",
                self.schema.entity()
            )));
        }
        self.execute()?.paged_result(pageable, || count.count())
    }

    /// Deletes the single match and returns it
    pub fn delete(&self) -> QueryResult<T> {
        match self.single_result()? {
            Some(entity) => {
                self.store.delete(self.schema, &entity)?;
                Ok(entity)
            }
            None => Err(QueryError::EmptyResult { expected: 1 }),
        }
    }
}

/// Count query over entities of type `T`
pub struct CountQuery<'a, T, S: StoreOperations<T> + ?Sized> {
    store: &'a S,
    schema: &'a KeySchema,
    request: StoreRequest,
    serves_pages: bool,
    _entity: PhantomData<fn() -> T>,
}

impl<'a, T, S> CountQuery<'a, T, S>
where
    S: StoreOperations<T> + ?Sized,
{
    pub(crate) fn new(store: &'a S, schema: &'a KeySchema, request: StoreRequest, serves_pages: bool) -> Self {
        Self {
            store,
            schema,
            request,
            serves_pages,
            _entity: PhantomData,
        }
    }

    pub fn request(&self) -> &StoreRequest {
        &self.request
    }

    /// Calls the store; a key lookup counts as 0 or 1
    pub fn count(&self) -> QueryResult<u64> {
        let count = match &self.request {
            StoreRequest::Load(request) => u64::from(self.store.load(self.schema, request)?.is_some()),
            request => self.store.count(self.schema, request)?,
        };
        Ok(count)
    }
}
