use std::path::Path;

use crate::materialize::Materializer;
use crate::paths::list_subdirectories;
use crate::Result;

/// Runs `strategy` once per immediate subdirectory of `dir`, so each
/// subfolder gets its own independent pool, and sums the counts.
pub fn for_each_subdirectory<F>(io: &Materializer, dir: &Path, mut strategy: F) -> Result<usize>
where
    F: FnMut(&Path) -> Result<usize>,
{
    let mut total = 0usize;
    for sub in list_subdirectories(io.input_root(), dir)? {
        let count = strategy(&sub)?;
        tracing::debug!(dir = %sub.display(), count, "subfolder done");
        total += count;
    }
    Ok(total)
}
