use std::ffi::OsString;
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::materialize::Materializer;
use crate::paths::collect_file_paths;
use crate::permute::shuffle;
use crate::Result;

fn is_companion(path: &Path, suffix: &str) -> bool {
    !suffix.is_empty()
        && path
            .file_name()
            .map_or(false, |name| name.to_string_lossy().ends_with(suffix))
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Whole-file shuffle for directories where a primary file (a texture) can
/// be followed by a companion named `<primary><suffix>` (its animation
/// metadata).
///
/// Companions are never shuffle targets themselves. Each primary is copied
/// to the next non-companion slot of the permutation, and its companion,
/// if present, is copied alongside it as `<destination><suffix>`. A
/// companion whose primary does not directly precede it in collection
/// order is dropped. Returns the number of primaries written.
pub fn shuffle_with_companions<R: Rng + ?Sized>(
    io: &Materializer,
    dir: &Path,
    suffix: &str,
    rng: &mut R,
) -> Result<usize> {
    let sources = collect_file_paths(io.input_root(), dir)?;
    let slots = shuffle(&sources, rng);
    let mut destinations = slots.iter().filter(|p| !is_companion(p, suffix));

    let mut primaries = 0usize;
    for (i, src) in sources.iter().enumerate() {
        if is_companion(src, suffix) {
            let paired = i > 0 && with_suffix(&sources[i - 1], suffix) == *src;
            if !paired {
                tracing::debug!(companion = %src.display(), "orphan companion dropped");
            }
            continue;
        }

        // Primaries and non-companion slots are the same set, so this never
        // runs dry.
        let Some(dest) = destinations.next() else {
            break;
        };
        io.copy_bytes(src, dest)?;

        let companion = with_suffix(src, suffix);
        if sources.get(i + 1) == Some(&companion) {
            io.copy_bytes(&companion, &with_suffix(dest, suffix))?;
        }

        primaries += 1;
    }

    Ok(primaries)
}
