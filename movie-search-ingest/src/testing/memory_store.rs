use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use movie_search_repository::{MovieStore, MovieTransaction, SchemaStatus, StoreError};
use movie_search_shared::{Movie, MovieSearchHit, MovieSearchPage, MovieSearchQuery};

#[derive(Default)]
struct State {
    rows: BTreeMap<String, Movie>,
    schema_ready: bool,
    fail_on_batch: Option<usize>,
    fail_on_commit: bool,
    batch_sizes: Vec<usize>,
    commits: usize,
    rollbacks: usize,
}

/// Movie store holding rows in a map, with transactional staging.
///
/// A transaction works on a private copy of the rows that replaces the
/// committed rows only on `commit`. Like PostgreSQL, an upsert batch that
/// repeats an id is rejected.
#[derive(Clone, Default)]
pub struct InMemoryMovieStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryMovieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose table already holds `movies`.
    pub fn with_rows(movies: impl IntoIterator<Item = Movie>) -> Self {
        let store = Self::new();
        store.lock().rows = movies.into_iter().map(|m| (m.id.clone(), m)).collect();
        store
    }

    /// Reject the n-th upsert batch (1-based) of every later transaction.
    pub fn fail_on_batch(&self, batch: usize) {
        self.lock().fail_on_batch = Some(batch);
    }

    pub fn fail_on_commit(&self) {
        self.lock().fail_on_commit = true;
    }

    /// Committed rows, ordered by id.
    pub fn rows(&self) -> Vec<Movie> {
        self.lock().rows.values().cloned().collect()
    }

    /// Sizes of every upsert batch executed, committed or not.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.lock().batch_sizes.clone()
    }

    pub fn commits(&self) -> usize {
        self.lock().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.lock().rollbacks
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("in-memory store lock poisoned")
    }
}

#[async_trait]
impl MovieStore for InMemoryMovieStore {
    async fn ensure_schema(&self) -> Result<SchemaStatus, StoreError> {
        let mut state = self.lock();
        let index_created = !state.schema_ready;
        state.schema_ready = true;

        Ok(SchemaStatus {
            table: "movies".to_string(),
            index: "movies_search_idx".to_string(),
            index_created,
        })
    }

    async fn begin(&self) -> Result<Box<dyn MovieTransaction>, StoreError> {
        let staged = self.lock().rows.clone();

        Ok(Box::new(InMemoryTransaction {
            store: self.clone(),
            staged,
            batches: 0,
        }))
    }

    async fn search(&self, query: &MovieSearchQuery) -> Result<MovieSearchPage, StoreError> {
        if query.is_blank() {
            return Err(StoreError::invalid_query("query text is required"));
        }

        let needle = query.query.to_lowercase();
        let state = self.lock();
        let matches: Vec<&Movie> = state
            .rows
            .values()
            .filter(|m| {
                m.title.to_lowercase().contains(&needle)
                    || m.plot
                        .as_deref()
                        .is_some_and(|p| p.to_lowercase().contains(&needle))
            })
            .collect();

        let results = matches
            .iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .map(|m| MovieSearchHit {
                id: m.id.clone(),
                title: m.title.clone(),
                year: m.year,
                genres: m.genres.clone(),
                rating: m.rating,
                directors: m.directors.clone(),
                actors: m.actors.clone(),
                highlight: m.plot.clone(),
                score: 1.0,
            })
            .collect();

        Ok(MovieSearchPage {
            results,
            total: matches.len() as i64,
            limit: query.limit,
            offset: query.offset,
        })
    }

    async fn get_movie(&self, id: &str) -> Result<Option<Movie>, StoreError> {
        Ok(self.lock().rows.get(id).cloned())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

struct InMemoryTransaction {
    store: InMemoryMovieStore,
    staged: BTreeMap<String, Movie>,
    batches: usize,
}

#[async_trait]
impl MovieTransaction for InMemoryTransaction {
    async fn delete_all(&mut self) -> Result<u64, StoreError> {
        let deleted = self.staged.len() as u64;
        self.staged.clear();
        Ok(deleted)
    }

    async fn upsert_batch(&mut self, movies: &[Movie]) -> Result<u64, StoreError> {
        self.batches += 1;

        let mut state = self.store.lock();
        state.batch_sizes.push(movies.len());

        if state.fail_on_batch == Some(self.batches) {
            return Err(StoreError::write(format!("batch {} rejected", self.batches)));
        }

        let mut seen = std::collections::HashSet::new();
        if let Some(repeated) = movies.iter().find(|m| !seen.insert(m.id.as_str())) {
            return Err(StoreError::write(format!(
                "ON CONFLICT DO UPDATE command cannot affect row a second time: {}",
                repeated.id
            )));
        }

        for movie in movies {
            self.staged.insert(movie.id.clone(), movie.clone());
        }

        Ok(movies.len() as u64)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let Self { store, staged, .. } = *self;
        let mut state = store.lock();
        if state.fail_on_commit {
            return Err(StoreError::transaction("commit rejected"));
        }

        state.rows = staged;
        state.commits += 1;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.store.lock().rollbacks += 1;
        Ok(())
    }
}
