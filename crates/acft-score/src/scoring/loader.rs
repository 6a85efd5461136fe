use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use super::error::ScoringError;
use super::event::{Event, Sex};
use super::table::StandardsTable;
use crate::config::TablesConfig;

/// Identifies one of the twelve standards tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableKey {
    pub event: Event,
    pub sex: Sex,
}

const RESOURCES: [(Event, Sex, &str); 12] = [
    (Event::Deadlift, Sex::Male, "DL_M.csv"),
    (Event::Deadlift, Sex::Female, "DL_F.csv"),
    (Event::StandingPowerThrow, Sex::Male, "SPT_M.csv"),
    (Event::StandingPowerThrow, Sex::Female, "SPT_F.csv"),
    (Event::HandReleasePushup, Sex::Male, "HRP_M.csv"),
    (Event::HandReleasePushup, Sex::Female, "HRP_F.csv"),
    (Event::SprintDragCarry, Sex::Male, "SDC_M.csv"),
    (Event::SprintDragCarry, Sex::Female, "SDC_F.csv"),
    (Event::Plank, Sex::Male, "PLK_M.csv"),
    (Event::Plank, Sex::Female, "PLK_F.csv"),
    (Event::TwoMileRun, Sex::Male, "2MR_M.csv"),
    (Event::TwoMileRun, Sex::Female, "2MR_F.csv"),
];

const EMBEDDED: [(&str, &str); 12] = [
    ("DL_M.csv", include_str!("../../tables/DL_M.csv")),
    ("DL_F.csv", include_str!("../../tables/DL_F.csv")),
    ("SPT_M.csv", include_str!("../../tables/SPT_M.csv")),
    ("SPT_F.csv", include_str!("../../tables/SPT_F.csv")),
    ("HRP_M.csv", include_str!("../../tables/HRP_M.csv")),
    ("HRP_F.csv", include_str!("../../tables/HRP_F.csv")),
    ("SDC_M.csv", include_str!("../../tables/SDC_M.csv")),
    ("SDC_F.csv", include_str!("../../tables/SDC_F.csv")),
    ("PLK_M.csv", include_str!("../../tables/PLK_M.csv")),
    ("PLK_F.csv", include_str!("../../tables/PLK_F.csv")),
    ("2MR_M.csv", include_str!("../../tables/2MR_M.csv")),
    ("2MR_F.csv", include_str!("../../tables/2MR_F.csv")),
];

impl TableKey {
    pub fn new(event: Event, sex: Sex) -> Self {
        Self { event, sex }
    }

    /// File name of the resource holding this table.
    pub fn resource(&self) -> &'static str {
        RESOURCES
            .iter()
            .find(|(event, sex, _)| *event == self.event && *sex == self.sex)
            .map(|(_, _, name)| *name)
            .unwrap_or_default()
    }

    pub fn all() -> impl Iterator<Item = TableKey> {
        RESOURCES
            .iter()
            .map(|(event, sex, _)| TableKey::new(*event, *sex))
    }
}

/// Materializes a standards table from wherever the tables are kept.
pub trait TableSource: Send + Sync {
    fn open(&self, key: TableKey) -> Result<StandardsTable, ScoringError>;
}

/// Resolves an event and sex to a ready-to-query table.
pub trait TableLoader: Send + Sync {
    fn load(&self, event: Event, sex: Sex) -> Result<Arc<StandardsTable>, ScoringError>;
}

/// The tables compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTables;

impl TableSource for EmbeddedTables {
    fn open(&self, key: TableKey) -> Result<StandardsTable, ScoringError> {
        let resource = key.resource();
        let contents = EMBEDDED
            .iter()
            .find(|(name, _)| *name == resource)
            .map(|(_, contents)| *contents)
            .ok_or_else(|| ScoringError::ResourceNotFound(resource.to_string()))?;
        StandardsTable::from_reader(key.event, key.sex, resource, Cursor::new(contents))
    }
}

/// Tables read from `<root>/<resource>` on each open.
#[derive(Debug, Clone)]
pub struct DirectoryTables {
    root: PathBuf,
}

impl DirectoryTables {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TableSource for DirectoryTables {
    fn open(&self, key: TableKey) -> Result<StandardsTable, ScoringError> {
        let resource = key.resource();
        let path = self.root.join(resource);
        let file = std::fs::File::open(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ScoringError::ResourceNotFound(path.display().to_string())
            } else {
                ScoringError::Io {
                    resource: path.display().to_string(),
                    source,
                }
            }
        })?;
        StandardsTable::from_reader(key.event, key.sex, resource, file)
    }
}

/// Source selection driven by [`TablesConfig`].
#[derive(Debug, Clone)]
pub enum StandardsSource {
    Embedded(EmbeddedTables),
    Directory(DirectoryTables),
}

impl StandardsSource {
    pub fn from_config(config: &TablesConfig) -> Self {
        match &config.directory {
            Some(directory) => Self::Directory(DirectoryTables::new(directory)),
            None => Self::Embedded(EmbeddedTables),
        }
    }
}

impl TableSource for StandardsSource {
    fn open(&self, key: TableKey) -> Result<StandardsTable, ScoringError> {
        match self {
            StandardsSource::Embedded(source) => source.open(key),
            StandardsSource::Directory(source) => source.open(key),
        }
    }
}

/// Loads each table at most once per key and shares it read-only afterwards.
///
/// Two callers racing on the first access may both parse the resource; only the first
/// result is published and both receive that same table.
pub struct CachedTableLoader<S> {
    source: S,
    cache: RwLock<HashMap<TableKey, Arc<StandardsTable>>>,
}

impl<S: TableSource> CachedTableLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Loads every table up front so that broken resources fail at startup.
    pub fn preload(&self) -> Result<usize, ScoringError> {
        let mut loaded = 0;
        for key in TableKey::all() {
            self.load(key.event, key.sex)?;
            loaded += 1;
        }
        Ok(loaded)
    }

    pub fn cached(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<S: TableSource> TableLoader for CachedTableLoader<S> {
    fn load(&self, event: Event, sex: Sex) -> Result<Arc<StandardsTable>, ScoringError> {
        let key = TableKey::new(event, sex);

        if let Some(table) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(self.source.open(key)?);
        let mut guard = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        let published = guard.entry(key).or_insert_with(|| {
            info!(resource = key.resource(), rows = table.len(), "standards table loaded");
            Arc::clone(&table)
        });
        if !Arc::ptr_eq(published, &table) {
            debug!(resource = key.resource(), "standards table already cached");
        }
        Ok(Arc::clone(published))
    }
}

impl<L: TableLoader + ?Sized> TableLoader for Arc<L> {
    fn load(&self, event: Event, sex: Sex) -> Result<Arc<StandardsTable>, ScoringError> {
        (**self).load(event, sex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::age::AgeBracket;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        opens: AtomicUsize,
    }

    impl TableSource for CountingSource {
        fn open(&self, key: TableKey) -> Result<StandardsTable, ScoringError> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            EmbeddedTables.open(key)
        }
    }

    #[test]
    fn every_key_maps_to_a_distinct_resource() {
        let mut names: Vec<_> = TableKey::all().map(|key| key.resource()).collect();
        assert_eq!(names.len(), 12);
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 12);
        assert_eq!(
            TableKey::new(Event::TwoMileRun, Sex::Female).resource(),
            "2MR_F.csv"
        );
    }

    #[test]
    fn embedded_tables_all_parse() {
        for key in TableKey::all() {
            let table = EmbeddedTables.open(key).expect("embedded table parses");
            assert_eq!(table.event(), key.event);
            assert_eq!(table.sex(), key.sex);
            assert_eq!(table.max_points(), 100);
            assert_eq!(table.min_points(), 0);
            for bracket in AgeBracket::ALL {
                let column = table.column(bracket).expect("bracket column present");
                assert_eq!(column.len(), table.len());
            }
        }
    }

    #[test]
    fn cache_opens_each_table_once() {
        let loader = CachedTableLoader::new(CountingSource {
            opens: AtomicUsize::new(0),
        });

        let first = loader.load(Event::Deadlift, Sex::Male).expect("loads");
        let second = loader.load(Event::Deadlift, Sex::Male).expect("loads");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.source.opens.load(Ordering::SeqCst), 1);

        loader.load(Event::Deadlift, Sex::Female).expect("loads");
        assert_eq!(loader.cached(), 2);
    }

    #[test]
    fn concurrent_first_access_publishes_one_table() {
        let loader = Arc::new(CachedTableLoader::new(EmbeddedTables));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let loader = Arc::clone(&loader);
                std::thread::spawn(move || loader.load(Event::Plank, Sex::Female).expect("loads"))
            })
            .collect();
        let tables: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().expect("thread completes"))
            .collect();

        assert!(tables.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
        assert_eq!(loader.cached(), 1);
    }

    #[test]
    fn preload_reads_all_twelve() {
        let loader = CachedTableLoader::new(EmbeddedTables);
        assert_eq!(loader.preload().expect("preload"), 12);
        assert_eq!(loader.cached(), 12);
    }

    #[test]
    fn directory_source_reports_missing_resources() {
        let source = DirectoryTables::new("./no-such-standards-dir");
        let err = source
            .open(TableKey::new(Event::Deadlift, Sex::Male))
            .expect_err("missing file");
        match err {
            ScoringError::ResourceNotFound(path) => assert!(path.ends_with("DL_M.csv")),
            other => panic!("expected missing resource, got {other:?}"),
        }
    }

    #[test]
    fn directory_source_reads_shipped_tables() {
        let source = DirectoryTables::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tables"));
        let table = source
            .open(TableKey::new(Event::SprintDragCarry, Sex::Male))
            .expect("table on disk");
        assert_eq!(table.len(), 21);
    }
}
