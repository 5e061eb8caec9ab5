//! Search path scanning: walk directories, classify folders, parse files.
//!
//! Parsing runs on a rayon pool; the resulting skeletons are merged into
//! the table sequentially in scan order, so ranks and candidate order are
//! deterministic regardless of worker scheduling.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::core::IStr;
use crate::parser::{FileKind, FileSkeleton, Member, MemberKind, ParseFailure, Visibility, is_valid_name, parse_source};
use crate::semantic::symbol_table::{PathKind, SymbolTable};
use crate::semantic::types::{BuildDiagnostic, SemanticError};

use super::parse_cache::{ParseCache, Signature};

// =============================================================================
// DIRECTORY PROVIDER
// =============================================================================

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

/// Source of directory listings and file contents.
///
/// Implementations must return listings in a stable order; candidate
/// order inside one directory follows it.
pub trait DirectoryProvider: Sync {
    fn list(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>>;
    fn read(&self, file: &Path) -> io::Result<String>;

    fn signature(&self, file: &Path) -> io::Result<Signature> {
        Signature::probe(file)
    }
}

/// The real filesystem, listings sorted by name.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsDirectoryProvider;

impl DirectoryProvider for FsDirectoryProvider {
    fn list(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            entries.push(DirEntryInfo {
                name: name.to_string(),
                is_dir: entry.file_type()?.is_dir(),
                path,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read(&self, file: &Path) -> io::Result<String> {
        std::fs::read_to_string(file)
    }
}

// =============================================================================
// SCAN PLAN
// =============================================================================

#[derive(Debug)]
struct EntryPlan {
    dir: PathBuf,
    kind: PathKind,
}

#[derive(Debug)]
enum JobPayload {
    /// A `.m` file parsed into a skeleton.
    Source,
    /// A file indexed without parsing (p-code).
    Opaque,
    /// An `@name` folder: definition file (when present) plus sibling
    /// method files.
    ClassFolder {
        has_main: bool,
        siblings: Vec<PathBuf>,
    },
}

#[derive(Debug)]
struct Job {
    plan: usize,
    qualified_name: String,
    /// For class folders this is the `@name/name.m` definition file.
    file: PathBuf,
    stem: String,
    payload: JobPayload,
}

enum Parsed {
    Skeleton(Arc<FileSkeleton>),
    /// A merged class folder; broken sibling files stay local as
    /// per-file failures and never drop the class itself.
    ClassFolder {
        skeleton: Arc<FileSkeleton>,
        sibling_failures: Vec<(PathBuf, ParseFailure)>,
    },
    Failed(ParseFailure),
    Cancelled,
}

/// Result of scanning a search path.
#[derive(Debug)]
pub struct ScanOutcome {
    pub table: SymbolTable,
    pub diagnostics: Vec<BuildDiagnostic>,
}

// =============================================================================
// SCANNER
// =============================================================================

/// Builds a [`SymbolTable`] from an ordered list of root directories.
pub struct Scanner<'a, P: DirectoryProvider> {
    provider: &'a P,
    cache: &'a ParseCache,
    cancel: Option<&'a CancellationToken>,
}

impl<'a, P: DirectoryProvider> Scanner<'a, P> {
    pub fn new(provider: &'a P, cache: &'a ParseCache) -> Self {
        Self {
            provider,
            cache,
            cancel: None,
        }
    }

    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(CancellationToken::is_cancelled)
    }

    /// Scan `roots` in order into a fresh table.
    ///
    /// Per-file problems become diagnostics; only unreadable directories
    /// abort the scan. If cancellation fires mid-scan the returned table
    /// is flagged incomplete.
    pub fn scan(&self, roots: &[PathBuf]) -> Result<ScanOutcome, SemanticError> {
        let mut plans = Vec::new();
        let mut jobs = Vec::new();
        let mut diagnostics = Vec::new();

        for root in roots {
            self.plan_dir(root, None, &mut plans, &mut jobs, &mut diagnostics)?;
        }
        debug!(
            "[SCAN] planned {} entries, {} files across {} roots",
            plans.len(),
            jobs.len(),
            roots.len()
        );

        // Parse in parallel; merge below stays in scan order.
        let parsed: Vec<Parsed> = jobs
            .par_iter()
            .map(|job| {
                if self.is_cancelled() {
                    return Parsed::Cancelled;
                }
                self.run_job(job)
            })
            .collect();

        let mut table = SymbolTable::new();
        let mut entry_ids = Vec::with_capacity(plans.len());
        for plan in &plans {
            entry_ids.push(table.push_entry(plan.dir.clone(), plan.kind.clone()));
        }

        for (job, result) in jobs.iter().zip(parsed) {
            match result {
                Parsed::Skeleton(skeleton) => {
                    trace!(
                        "[SCAN] indexing '{}' from {}",
                        job.qualified_name,
                        job.file.display()
                    );
                    table.insert(
                        &job.qualified_name,
                        job.file.clone(),
                        entry_ids[job.plan],
                        skeleton,
                    );
                }
                Parsed::ClassFolder {
                    skeleton,
                    sibling_failures,
                } => {
                    for (file, failure) in sibling_failures {
                        warn!("[SCAN] failed to parse {}: {}", file.display(), failure);
                        diagnostics.push(BuildDiagnostic::Parse { file, failure });
                    }
                    trace!(
                        "[SCAN] indexing class folder '{}' from {}",
                        job.qualified_name,
                        job.file.display()
                    );
                    table.insert(
                        &job.qualified_name,
                        job.file.clone(),
                        entry_ids[job.plan],
                        skeleton,
                    );
                }
                Parsed::Failed(failure) => {
                    warn!("[SCAN] failed to parse {}: {}", job.file.display(), failure);
                    diagnostics.push(BuildDiagnostic::Parse {
                        file: job.file.clone(),
                        failure,
                    });
                }
                Parsed::Cancelled => {
                    debug!("[SCAN] cancelled; table is partial");
                    table.mark_incomplete();
                    break;
                }
            }
        }
        if self.is_cancelled() {
            table.mark_incomplete();
        }

        Ok(ScanOutcome { table, diagnostics })
    }

    // =========================================================================
    // PLANNING
    // =========================================================================

    fn plan_dir(
        &self,
        dir: &Path,
        namespace: Option<&str>,
        plans: &mut Vec<EntryPlan>,
        jobs: &mut Vec<Job>,
        diagnostics: &mut Vec<BuildDiagnostic>,
    ) -> Result<(), SemanticError> {
        let entries = self.provider.list(dir).map_err(|source| SemanticError::Scan {
            path: dir.to_path_buf(),
            source,
        })?;

        let kind = match namespace {
            Some(prefix) => PathKind::Namespace {
                prefix: IStr::from(prefix),
            },
            None => PathKind::Plain,
        };
        let plan_index = plans.len();
        plans.push(EntryPlan {
            dir: dir.to_path_buf(),
            kind,
        });

        self.plan_files(&entries, plan_index, namespace, jobs, diagnostics)?;

        for entry in &entries {
            if !entry.is_dir {
                continue;
            }
            if entry.name == "private" {
                self.plan_private(&entry.path, dir, plans, jobs, diagnostics)?;
            } else if let Some(sub) = entry.name.strip_prefix('+') {
                if !is_valid_name(sub) {
                    continue;
                }
                let prefix = match namespace {
                    Some(parent) => format!("{parent}.{sub}"),
                    None => sub.to_string(),
                };
                self.plan_dir(&entry.path, Some(&prefix), plans, jobs, diagnostics)?;
            }
            // @name folders are handled with the files of their parent;
            // other subdirectories are not on the path and are skipped.
        }
        Ok(())
    }

    /// Plan the files of one directory (including its `@name` folders),
    /// attaching the jobs to `plan_index`.
    fn plan_files(
        &self,
        entries: &[DirEntryInfo],
        plan_index: usize,
        namespace: Option<&str>,
        jobs: &mut Vec<Job>,
        diagnostics: &mut Vec<BuildDiagnostic>,
    ) -> Result<(), SemanticError> {
        let qualify = |stem: &str| match namespace {
            Some(prefix) => format!("{prefix}.{stem}"),
            None => stem.to_string(),
        };
        let has_m_sibling = |stem: &str| {
            entries
                .iter()
                .any(|e| !e.is_dir && e.name == format!("{stem}.m"))
        };

        for entry in entries {
            if entry.is_dir {
                if let Some(class_name) = entry.name.strip_prefix('@') {
                    if !is_valid_name(class_name) {
                        continue;
                    }
                    self.plan_class_folder(
                        &entry.path,
                        class_name,
                        qualify(class_name),
                        plan_index,
                        jobs,
                        diagnostics,
                    )?;
                }
                continue;
            }

            let path = Path::new(&entry.name);
            let (Some(stem), Some(ext)) = (
                path.file_stem().and_then(|s| s.to_str()),
                path.extension().and_then(|s| s.to_str()),
            ) else {
                continue;
            };
            if !is_valid_name(stem) {
                continue;
            }
            match ext {
                "m" => jobs.push(Job {
                    plan: plan_index,
                    qualified_name: qualify(stem),
                    file: entry.path.clone(),
                    stem: stem.to_string(),
                    payload: JobPayload::Source,
                }),
                // A `.p` file shadows like a function; when the matching
                // `.m` source is present the richer skeleton wins and the
                // p-file is not indexed separately.
                "p" if !has_m_sibling(stem) => jobs.push(Job {
                    plan: plan_index,
                    qualified_name: qualify(stem),
                    file: entry.path.clone(),
                    stem: stem.to_string(),
                    payload: JobPayload::Opaque,
                }),
                _ => {}
            }
        }
        Ok(())
    }

    fn plan_private(
        &self,
        private_dir: &Path,
        parent: &Path,
        plans: &mut Vec<EntryPlan>,
        jobs: &mut Vec<Job>,
        diagnostics: &mut Vec<BuildDiagnostic>,
    ) -> Result<(), SemanticError> {
        let entries = self
            .provider
            .list(private_dir)
            .map_err(|source| SemanticError::Scan {
                path: private_dir.to_path_buf(),
                source,
            })?;
        let plan_index = plans.len();
        plans.push(EntryPlan {
            dir: private_dir.to_path_buf(),
            kind: PathKind::Private {
                parent: parent.to_path_buf(),
            },
        });
        // Private symbols are always unqualified, even inside namespaces.
        self.plan_files(&entries, plan_index, None, jobs, diagnostics)?;
        Ok(())
    }

    fn plan_class_folder(
        &self,
        class_dir: &Path,
        class_name: &str,
        qualified_name: String,
        plan_index: usize,
        jobs: &mut Vec<Job>,
        diagnostics: &mut Vec<BuildDiagnostic>,
    ) -> Result<(), SemanticError> {
        let entries = self
            .provider
            .list(class_dir)
            .map_err(|source| SemanticError::Scan {
                path: class_dir.to_path_buf(),
                source,
            })?;

        let main_name = format!("{class_name}.m");
        let has_main = entries.iter().any(|e| !e.is_dir && e.name == main_name);
        if !has_main {
            // The class still exists with its sibling methods; the missing
            // definition file is reported but does not drop the symbol.
            diagnostics.push(BuildDiagnostic::ClassFolderMissingMain {
                dir: class_dir.to_path_buf(),
            });
        }

        let siblings: Vec<PathBuf> = entries
            .iter()
            .filter(|e| {
                !e.is_dir
                    && e.name != main_name
                    && e.name.ends_with(".m")
                    && Path::new(&e.name)
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .is_some_and(is_valid_name)
            })
            .map(|e| e.path.clone())
            .collect();

        jobs.push(Job {
            plan: plan_index,
            qualified_name,
            file: class_dir.join(main_name),
            stem: class_name.to_string(),
            payload: JobPayload::ClassFolder { has_main, siblings },
        });
        Ok(())
    }

    // =========================================================================
    // PARSING
    // =========================================================================

    fn run_job(&self, job: &Job) -> Parsed {
        match &job.payload {
            JobPayload::Source => match self.parse_cached(&job.file, &job.stem) {
                Ok(skeleton) => Parsed::Skeleton(skeleton),
                Err(failure) => Parsed::Failed(failure),
            },
            JobPayload::Opaque => {
                Parsed::Skeleton(Arc::new(FileSkeleton::opaque_function(job.stem.as_str())))
            }
            JobPayload::ClassFolder { has_main, siblings } => {
                match self.parse_class_folder(job, *has_main, siblings) {
                    Ok((skeleton, sibling_failures)) => Parsed::ClassFolder {
                        skeleton,
                        sibling_failures,
                    },
                    Err(failure) => Parsed::Failed(failure),
                }
            }
        }
    }

    /// Parse one file through the cache.
    fn parse_cached(&self, file: &Path, stem: &str) -> Result<Arc<FileSkeleton>, ParseFailure> {
        let signature = self
            .provider
            .signature(file)
            .map_err(|e| ParseFailure::io(file.to_path_buf(), &e))?;
        if let Some(hit) = self.cache.get(file, &signature) {
            trace!("[SCAN] cache hit for {}", file.display());
            return Ok(hit);
        }
        let source = self
            .provider
            .read(file)
            .map_err(|e| ParseFailure::io(file.to_path_buf(), &e))?;
        let skeleton = Arc::new(parse_source(stem, &source)?);
        self.cache.insert(file, signature, Arc::clone(&skeleton));
        Ok(skeleton)
    }

    /// Merge an `@name` folder: the definition file's skeleton plus one
    /// public method per sibling function file.
    ///
    /// A sibling that fails to parse is returned as a per-file failure and
    /// excluded from the merge; only a broken definition file fails the
    /// class as a whole.
    fn parse_class_folder(
        &self,
        job: &Job,
        has_main: bool,
        siblings: &[PathBuf],
    ) -> Result<(Arc<FileSkeleton>, Vec<(PathBuf, ParseFailure)>), ParseFailure> {
        let mut merged = if has_main {
            FileSkeleton::clone(&*self.parse_cached(&job.file, &job.stem)?)
        } else {
            // Headless class folder: the class exists with sibling methods
            // only.
            FileSkeleton {
                name: SmolStr::from(job.stem.as_str()),
                declared_name: None,
                kind: FileKind::Classdef,
                superclasses: Vec::new(),
                members: Vec::new(),
                local_functions: Vec::new(),
            }
        };
        // A function-only definition file still defines a class folder
        // class; normalize the kind.
        merged.kind = FileKind::Classdef;

        let mut sibling_failures = Vec::new();
        for sibling in siblings {
            self.cache.record_dependent(sibling, &job.file);
            let Some(stem) = sibling.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let method = match self.parse_cached(sibling, stem) {
                Ok(method) => method,
                Err(failure) => {
                    sibling_failures.push((sibling.clone(), failure));
                    continue;
                }
            };
            let name = method
                .declared_name
                .clone()
                .unwrap_or_else(|| method.name.clone());
            if merged.member(&name).is_none() {
                merged.members.push(Member::new(
                    name,
                    MemberKind::Method,
                    Visibility::Public,
                ));
            }
        }
        Ok((Arc::new(merged), sibling_failures))
    }
}
