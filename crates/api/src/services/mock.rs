//! In-memory repository double for service tests.
//!
//! Rows inserted inside a transaction are staged in the transaction handle and
//! only become visible on commit, so tests can observe rollbacks.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use idm_core::paging::effective_filter;
use idm_core::types::DbId;
use idm_db::error::StoreError;
use idm_db::models::employee::{CreateEmployee, Employee};
use idm_db::models::role::{CreateRole, Role};
use idm_db::repositories::{EmployeeRepository, NamedRepository};

pub(crate) trait Row: Clone + Send + Sync + 'static {
    const ENTITY: &'static str;
    fn build(id: DbId, name: &str) -> Self;
    fn id(&self) -> DbId;
    fn name(&self) -> &str;
}

impl Row for Employee {
    const ENTITY: &'static str = "employee";

    fn build(id: DbId, name: &str) -> Self {
        Employee {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn id(&self) -> DbId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Row for Role {
    const ENTITY: &'static str = "role";

    fn build(id: DbId, name: &str) -> Self {
        Role {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn id(&self) -> DbId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

pub(crate) trait Named: Send + Sync + 'static {
    fn name(&self) -> &str;
}

impl Named for CreateEmployee {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for CreateRole {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Call counters, shareable with tests after the repo has been moved.
#[derive(Debug, Default)]
pub(crate) struct Calls {
    begins: AtomicUsize,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
    inserts: AtomicUsize,
    finds: AtomicUsize,
}

impl Calls {
    pub(crate) fn begins(&self) -> usize {
        self.begins.load(Ordering::SeqCst)
    }

    pub(crate) fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub(crate) fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }

    pub(crate) fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub(crate) fn finds(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }
}

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

pub(crate) struct MockRepo<E, C> {
    pub(crate) rows: Mutex<Vec<E>>,
    pub(crate) calls: Arc<Calls>,
    pub(crate) fail_insert: bool,
    pub(crate) panic_on_insert: bool,
    pub(crate) conflict_on_insert: bool,
    pub(crate) page_args: Mutex<Option<(i64, i64, String)>>,
    pub(crate) count_filter: Mutex<Option<String>>,
    pub(crate) _input: PhantomData<fn() -> C>,
}

impl<E, C> Default for MockRepo<E, C> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            calls: Arc::default(),
            fail_insert: false,
            panic_on_insert: false,
            conflict_on_insert: false,
            page_args: Mutex::new(None),
            count_filter: Mutex::new(None),
            _input: PhantomData,
        }
    }
}

impl<E: Row, C> MockRepo<E, C> {
    /// Seeded with one row per name, ids counting from 1.
    pub(crate) fn with(names: &[&str]) -> Self {
        let rows = names
            .iter()
            .enumerate()
            .map(|(i, name)| E::build(i as DbId + 1, name))
            .collect();
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.name().to_string())
            .collect()
    }

    pub(crate) fn last_page(&self) -> Option<(i64, i64, String)> {
        self.page_args.lock().unwrap().clone()
    }

    pub(crate) fn last_count_filter(&self) -> Option<String> {
        self.count_filter.lock().unwrap().clone()
    }

    fn next_id(&self, staged: &[E]) -> DbId {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .chain(staged)
            .map(Row::id)
            .max()
            .unwrap_or(0)
            + 1
    }

    fn matching(&self, text_filter: &str) -> Vec<E> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by_key(Row::id);
        match effective_filter(text_filter) {
            Some(filter) => {
                let needle = filter.to_lowercase();
                rows.into_iter()
                    .filter(|r| r.name().to_lowercase().contains(&needle))
                    .collect()
            }
            None => rows,
        }
    }
}

#[async_trait]
impl<E: Row, C: Named> NamedRepository for MockRepo<E, C> {
    type Entity = E;
    type Create = C;
    type Tx = Vec<E>;

    async fn create(&self, input: &C) -> Result<DbId, StoreError> {
        bump(&self.calls.inserts);
        let id = self.next_id(&[]);
        self.rows.lock().unwrap().push(E::build(id, input.name()));
        Ok(id)
    }

    async fn create_in_transaction(&self, tx: &mut Vec<E>, input: &C) -> Result<DbId, StoreError> {
        bump(&self.calls.inserts);
        if self.panic_on_insert {
            panic!("insert exploded");
        }
        if self.fail_insert {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        if self.conflict_on_insert {
            return Err(StoreError::AlreadyExists {
                constraint: "uq_role_name".to_string(),
            });
        }
        let id = self.next_id(tx);
        tx.push(E::build(id, input.name()));
        Ok(id)
    }

    async fn find_by_id(&self, id: DbId) -> Result<E, StoreError> {
        bump(&self.calls.finds);
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: E::ENTITY,
                id,
            })
    }

    async fn get_all(&self) -> Result<Vec<E>, StoreError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn find_by_ids(&self, ids: &[DbId]) -> Result<Vec<E>, StoreError> {
        if ids.is_empty() {
            return Err(StoreError::EmptyIds { entity: E::ENTITY });
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| ids.contains(&r.id()))
            .cloned()
            .collect())
    }

    async fn delete_by_id(&self, id: DbId) -> Result<(), StoreError> {
        self.rows.lock().unwrap().retain(|r| r.id() != id);
        Ok(())
    }

    async fn delete_by_ids(&self, ids: &[DbId]) -> Result<(), StoreError> {
        if ids.is_empty() {
            return Err(StoreError::EmptyIds { entity: E::ENTITY });
        }
        self.rows.lock().unwrap().retain(|r| !ids.contains(&r.id()));
        Ok(())
    }

    async fn find_by_name(&self, tx: &mut Vec<E>, name: &str) -> Result<bool, StoreError> {
        let committed = self.rows.lock().unwrap().iter().any(|r| r.name() == name);
        Ok(committed || tx.iter().any(|r| r.name() == name))
    }

    async fn begin_transaction(&self) -> Result<Vec<E>, StoreError> {
        bump(&self.calls.begins);
        Ok(Vec::new())
    }

    async fn commit(&self, tx: Vec<E>) -> Result<(), StoreError> {
        bump(&self.calls.commits);
        self.rows.lock().unwrap().extend(tx);
        Ok(())
    }

    async fn rollback(&self, _tx: Vec<E>) -> Result<(), StoreError> {
        bump(&self.calls.rollbacks);
        Ok(())
    }
}

#[async_trait]
impl<C: Named> EmployeeRepository for MockRepo<Employee, C> {
    async fn find_page(
        &self,
        offset: i64,
        limit: i64,
        text_filter: &str,
    ) -> Result<Vec<Employee>, StoreError> {
        *self.page_args.lock().unwrap() = Some((offset, limit, text_filter.to_string()));
        Ok(self
            .matching(text_filter)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_all(&self, text_filter: &str) -> Result<i64, StoreError> {
        *self.count_filter.lock().unwrap() = Some(text_filter.to_string());
        Ok(self.matching(text_filter).len() as i64)
    }
}
