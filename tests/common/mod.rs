//! Shared fixtures for integration tests
//!
//! `SpyStore` records every request it receives and counts how often its
//! result lists are iterated and how many elements are pulled.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use keyquery::criteria::{LoadRequest, QueryRequest, ScanRequest, StoreRequest};
use keyquery::result::LazyList;
use keyquery::schema::IndexDefinition;
use keyquery::store::{StoreError, StoreResult};
use keyquery::{KeySchema, StoreOperations};

// =============================================================================
// Entities and Schemas
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub user_name: String,
    pub playlist_name: String,
}

pub fn playlist(user_name: &str, playlist_name: &str) -> Playlist {
    Playlist {
        user_name: user_name.to_string(),
        playlist_name: playlist_name.to_string(),
    }
}

/// {partition: id}
pub fn user_schema() -> KeySchema {
    KeySchema::builder("User")
        .table("users")
        .partition_key("id")
        .build()
        .unwrap()
}

/// {partition: userName, sort: playlistName}
pub fn playlist_schema() -> KeySchema {
    KeySchema::builder("Playlist")
        .table("playlists")
        .partition_key("userName")
        .sort_key("playlistName")
        .attribute_name("userName", "user_name")
        .index(IndexDefinition::with_sort(
            "DisplayName-index",
            "displayName",
            "playlistName",
        ))
        .build()
        .unwrap()
}

/// {partition: id} plus Name-PostCode-index (name, postCode)
pub fn customer_schema() -> KeySchema {
    KeySchema::builder("Customer")
        .table("customers")
        .partition_key("id")
        .index(IndexDefinition::with_sort(
            "Name-PostCode-index",
            "name",
            "postCode",
        ))
        .build()
        .unwrap()
}

// =============================================================================
// Spy Store
// =============================================================================

pub struct SpyStore {
    items: Vec<Playlist>,
    count_result: u64,
    table_override: Option<String>,
    fail: bool,
    /// Iterator creations across all returned lists
    pub iterations: Rc<Cell<usize>>,
    /// Elements pulled across all returned lists
    pub pulled: Rc<Cell<usize>>,
    pub requests: RefCell<Vec<StoreRequest>>,
    pub deleted: RefCell<Vec<Playlist>>,
}

impl SpyStore {
    pub fn with_items(items: Vec<Playlist>) -> Self {
        Self {
            items,
            count_result: 0,
            table_override: None,
            fail: false,
            iterations: Rc::new(Cell::new(0)),
            pulled: Rc::new(Cell::new(0)),
            requests: RefCell::new(Vec::new()),
            deleted: RefCell::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::with_items(Vec::new())
    }

    pub fn failing() -> Self {
        let mut store = Self::empty();
        store.fail = true;
        store
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count_result = count;
        self
    }

    pub fn with_table_override(mut self, table: &str) -> Self {
        self.table_override = Some(table.to_string());
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<StoreRequest> {
        self.requests.borrow().last().cloned()
    }

    fn list(&self) -> LazyList<Playlist> {
        let items = self.items.clone();
        let iterations = Rc::clone(&self.iterations);
        let pulled = Rc::clone(&self.pulled);
        LazyList::new(move || {
            iterations.set(iterations.get() + 1);
            let pulled = Rc::clone(&pulled);
            items.clone().into_iter().map(move |item| {
                pulled.set(pulled.get() + 1);
                Ok(item)
            })
        })
    }

    fn check(&self) -> StoreResult<()> {
        if self.fail {
            Err(StoreError::new("provisioned throughput exceeded"))
        } else {
            Ok(())
        }
    }
}

impl StoreOperations<Playlist> for SpyStore {
    fn load(&self, _schema: &KeySchema, request: &LoadRequest) -> StoreResult<Option<Playlist>> {
        self.requests.borrow_mut().push(StoreRequest::Load(request.clone()));
        self.check()?;
        Ok(self.items.first().cloned())
    }

    fn query(&self, _schema: &KeySchema, request: &QueryRequest) -> StoreResult<LazyList<Playlist>> {
        self.requests.borrow_mut().push(StoreRequest::Query(request.clone()));
        self.check()?;
        Ok(self.list())
    }

    fn scan(&self, _schema: &KeySchema, request: &ScanRequest) -> StoreResult<LazyList<Playlist>> {
        self.requests.borrow_mut().push(StoreRequest::Scan(request.clone()));
        self.check()?;
        Ok(self.list())
    }

    fn count(&self, _schema: &KeySchema, request: &StoreRequest) -> StoreResult<u64> {
        self.requests.borrow_mut().push(request.clone());
        self.check()?;
        Ok(self.count_result)
    }

    fn delete(&self, _schema: &KeySchema, entity: &Playlist) -> StoreResult<()> {
        self.check()?;
        self.deleted.borrow_mut().push(entity.clone());
        Ok(())
    }

    fn overridden_table_name(&self, _schema: &KeySchema, default_name: &str) -> String {
        self.table_override
            .clone()
            .unwrap_or_else(|| default_name.to_string())
    }
}
