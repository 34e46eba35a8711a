use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use super::formats::is_supported_input;
use super::report::SkipReason;
use super::{CollisionPolicy, ConversionRequest};

/// Run-level failures raised before any conversion starts.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("input path does not exist: {0}")]
    InvalidInput(PathBuf),

    #[error("output directory cannot be created or is not writable: {path}")]
    UnwritableOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to scan input directory: {path}")]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One resolved (source, destination) pair queued for conversion.
///
/// `skip` is set for entries that are accounted for in the report but never
/// attempted (unsupported extension, oversize source).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub skip: Option<SkipReason>,
}

/// Turns a request into the concrete set of work items.
///
/// Fatal validation (input existence, output writability) happens in
/// [`PathResolver::new`]; item derivation happens lazily in [`PathResolver::iter`],
/// which can be called more than once. Directory entries are sorted by name
/// so enumeration order is deterministic.
///
/// Under [`CollisionPolicy::Rename`] each pass tracks the destinations it has
/// already handed out, so two sources sharing a stem (`a.jpg`, `a.png`) get
/// distinct names even when the items are materialized before any output is
/// written.
#[derive(Debug)]
pub struct PathResolver<'a> {
    request: &'a ConversionRequest,
    entries: Vec<PathBuf>,
    dest_dir: Option<PathBuf>,
    single_file: bool,
}

impl<'a> PathResolver<'a> {
    pub fn new(request: &'a ConversionRequest) -> Result<Self, ResolveError> {
        let input = &request.input_path;
        if !input.exists() {
            return Err(ResolveError::InvalidInput(input.clone()));
        }

        if input.is_file() {
            // An explicit output that is an existing directory means "put the
            // derived filename in there"; anything else is the literal
            // destination file.
            let dest_dir = match &request.output_path {
                Some(path) if path.is_dir() => Some(path.clone()),
                Some(_) => None,
                None => None,
            };
            return Ok(Self {
                request,
                entries: vec![input.clone()],
                dest_dir,
                single_file: true,
            });
        }

        let dest_dir = match &request.output_path {
            Some(path) => {
                ensure_writable_dir(path)?;
                path.clone()
            }
            None => input.clone(),
        };

        let mut entries = Vec::new();
        for entry in WalkDir::new(input).min_depth(1).max_depth(1).follow_links(false) {
            let entry = entry.map_err(|e| ResolveError::Scan {
                path: input.clone(),
                source: e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("directory walk failed")),
            })?;
            if entry.file_type().is_file() {
                entries.push(entry.into_path());
            }
        }
        entries.sort();

        Ok(Self {
            request,
            entries,
            dest_dir: Some(dest_dir),
            single_file: false,
        })
    }

    /// Number of work items this resolver will yield.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lazily derive work items in enumeration order. Restartable: each call
    /// starts a fresh pass with its own set of claimed destinations.
    pub fn iter(&self) -> impl Iterator<Item = WorkItem> + '_ {
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        self.entries.iter().map(move |source| {
            let item = self.derive_item(source, &claimed);
            // Skipped entries never write, so their placeholder destination
            // must not block a later item from taking the plain name.
            if item.skip.is_none() {
                claimed.insert(item.dest.clone());
            }
            item
        })
    }

    fn derive_item(&self, source: &Path, claimed: &HashSet<PathBuf>) -> WorkItem {
        // Directory scans filter by extension; a single file named explicitly
        // is always attempted and lets the decoder decide.
        if !self.single_file && !is_supported_input(source) {
            return WorkItem {
                source: source.to_path_buf(),
                dest: self.derived_destination(source, claimed),
                skip: Some(SkipReason::UnsupportedExtension),
            };
        }

        let skip = match (self.request.max_file_size, std::fs::metadata(source)) {
            (Some(limit), Ok(meta)) if meta.len() > limit => Some(SkipReason::FileTooLarge),
            // Unreadable metadata is left for the decode phase to classify.
            _ => None,
        };

        WorkItem {
            source: source.to_path_buf(),
            dest: self.destination_for(source, claimed),
            skip,
        }
    }

    fn destination_for(&self, source: &Path, claimed: &HashSet<PathBuf>) -> PathBuf {
        if self.single_file && self.dest_dir.is_none() {
            if let Some(explicit) = &self.request.output_path {
                return explicit.clone();
            }
        }
        self.derived_destination(source, claimed)
    }

    /// Destination from the source stem plus the target's canonical
    /// extension, honoring the collision policy. A name counts as taken when
    /// it exists on disk or was already claimed by an earlier item in this
    /// pass.
    fn derived_destination(&self, source: &Path, claimed: &HashSet<PathBuf>) -> PathBuf {
        let dir = match &self.dest_dir {
            Some(dir) => dir.clone(),
            None => source.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        let target_ext = self.request.target_format.canonical_extension();

        let candidate = dir.join(format!("{}.{}", stem, target_ext));
        match self.request.on_collision {
            CollisionPolicy::Overwrite => candidate,
            CollisionPolicy::Rename if !candidate.exists() && !claimed.contains(&candidate) => {
                candidate
            }
            CollisionPolicy::Rename => {
                unique_destination(&dir, stem, source, target_ext, claimed)
            }
        }
    }
}

/// Pick a non-colliding destination name: `stem_<origext>.<ext>`, then
/// `stem_<origext>_<n>.<ext>` with the first free counter.
fn unique_destination(
    dir: &Path,
    stem: &str,
    source: &Path,
    target_ext: &str,
    claimed: &HashSet<PathBuf>,
) -> PathBuf {
    let orig_ext = source
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| "orig".to_string());
    let tagged = format!("{}_{}", stem, orig_ext);

    let mut candidate = dir.join(format!("{}.{}", tagged, target_ext));
    let mut counter = 1;
    while candidate.exists() || claimed.contains(&candidate) {
        candidate = dir.join(format!("{}_{}.{}", tagged, counter, target_ext));
        counter += 1;
    }
    candidate
}

fn ensure_writable_dir(path: &Path) -> Result<(), ResolveError> {
    std::fs::create_dir_all(path).map_err(|source| ResolveError::UnwritableOutput {
        path: path.to_path_buf(),
        source,
    })?;

    let meta = std::fs::metadata(path).map_err(|source| ResolveError::UnwritableOutput {
        path: path.to_path_buf(),
        source,
    })?;
    if meta.permissions().readonly() {
        return Err(ResolveError::UnwritableOutput {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "directory is read-only"),
        });
    }
    Ok(())
}
