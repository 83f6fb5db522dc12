//! Per-file placement decisions.
//!
//! The classifier looks at a file name and the folder it currently sits in and
//! decides whether the file stays put or moves into a sibling folder named
//! after its extension token.
//!
//! # Examples
//!
//! ```
//! use ftorg::classifier::{Classifier, Decision, SkipReason};
//! use ftorg::FilterSet;
//! use std::path::Path;
//!
//! let filters = FilterSet::default();
//! let classifier = Classifier::new(&filters);
//!
//! let decision = classifier.classify(Path::new("/photos/JPG"), "beach.jpg");
//! assert_eq!(decision, Decision::Skip(SkipReason::AlreadyCorrect));
//!
//! match classifier.classify(Path::new("/photos"), "beach.jpg") {
//!     Decision::Move(plan) => assert!(plan.destination.ends_with("JPG/beach.jpg")),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```
use crate::filters::FilterSet;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

/// Why a file was left where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The file already sits in a folder named after its extension.
    AlreadyCorrect,
    /// The extension is on the exclude list.
    Excluded,
    /// An include list is set and the extension is not on it.
    NotIncluded,
}

impl SkipReason {
    /// Returns a human-readable description of this reason.
    pub fn description(&self) -> &'static str {
        match self {
            SkipReason::AlreadyCorrect => "already in the correct folder",
            SkipReason::Excluded => "excluded format",
            SkipReason::NotIncluded => "not in include list",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Where a file should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    /// Current location of the file.
    pub source: PathBuf,
    /// Extension folder next to the file, created on demand.
    pub target_folder: PathBuf,
    /// Final path of the file inside `target_folder`.
    pub destination: PathBuf,
}

/// Outcome of classifying one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Skip(SkipReason),
    Move(MovePlan),
}

impl Decision {
    pub fn is_move(&self) -> bool {
        matches!(self, Decision::Move(_))
    }
}

/// Returns the extension token of a file name.
///
/// This is the uppercased text after the last `.`. A name without any `.`
/// yields the whole name, so `README` maps to `README`.
///
/// ```
/// use ftorg::classifier::extension_token;
///
/// assert_eq!(extension_token("a.tar.gz"), "GZ");
/// assert_eq!(extension_token("README"), "README");
/// assert_eq!(extension_token("trailing."), "");
/// ```
pub fn extension_token(file_name: &str) -> String {
    file_name
        .rsplit('.')
        .next()
        .unwrap_or(file_name)
        .to_uppercase()
}

/// Applies the placement rules in a fixed order; the first matching rule wins.
pub struct Classifier<'a> {
    filters: &'a FilterSet,
}

impl<'a> Classifier<'a> {
    pub fn new(filters: &'a FilterSet) -> Self {
        Self { filters }
    }

    /// Classifies `file_name` living directly inside `folder`.
    ///
    /// The extension token comes from a lossy UTF-8 view of the name, while
    /// the planned paths keep the name exactly as given.
    pub fn classify(&self, folder: &Path, file_name: impl AsRef<OsStr>) -> Decision {
        let file_name = file_name.as_ref();
        let ext = extension_token(&file_name.to_string_lossy());

        if is_already_sorted(folder, &ext) {
            return Decision::Skip(SkipReason::AlreadyCorrect);
        }
        if self.filters.is_format_excluded(&ext) {
            return Decision::Skip(SkipReason::Excluded);
        }
        if !self.filters.is_format_includable(&ext) {
            return Decision::Skip(SkipReason::NotIncluded);
        }

        let target_folder = folder.join(&ext);
        Decision::Move(MovePlan {
            source: folder.join(file_name),
            destination: target_folder.join(file_name),
            target_folder,
        })
    }
}

/// The already-correct rule: the containing folder's name equals the
/// extension token, ignoring case. This is what makes repeated runs no-ops.
fn is_already_sorted(folder: &Path, ext: &str) -> bool {
    folder
        .file_name()
        .map(|name| name.to_string_lossy().to_uppercase() == ext)
        .unwrap_or(false)
}
