//! Per-category counts for plans and logs.

use crate::file_category::Category;
use crate::file_organizer::Move;
use std::collections::BTreeMap;
use std::path::Path;

/// Summary bucket for destinations outside every canonical directory.
pub const OTHER_LABEL: &str = "other";

impl Category {
    /// Recovers the category from a destination path by its parent directory.
    ///
    /// ```
    /// use tidyws::file_category::Category;
    /// use std::path::Path;
    ///
    /// assert_eq!(
    ///     Category::from_destination(Path::new("/w/tests/results/logs/a.log")),
    ///     Some(Category::TestResultsLogs)
    /// );
    /// assert_eq!(Category::from_destination(Path::new("/w/src/a.log")), None);
    /// ```
    pub fn from_destination(dst: &Path) -> Option<Category> {
        let parent = dst.parent()?;
        Category::ALL
            .into_iter()
            .find(|category| parent.ends_with(category.dest_dir()))
    }
}

/// Counts moves per category label, with unrecognized destinations under
/// [`OTHER_LABEL`].
pub fn summarize(moves: &[Move]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for mv in moves {
        let label = Category::from_destination(&mv.dst)
            .map(|c| c.label())
            .unwrap_or(OTHER_LABEL);
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}
