use std::path::{Path, PathBuf};

use rand::Rng;
use serde_json::Value;

use crate::access::{extract_truthy, PropertyAccess};
use crate::materialize::Materializer;
use crate::paths::collect_file_paths;
use crate::permute::shuffle;
use crate::Result;

/// Parses every file under `dir`, keeping the documents for a second pass.
pub(crate) fn load_documents(io: &Materializer, dir: &Path) -> Result<Vec<(PathBuf, Value)>> {
    collect_file_paths(io.input_root(), dir)?
        .into_iter()
        .map(|rel| {
            let doc = io.read_json(&rel)?;
            Ok((rel, doc))
        })
        .collect()
}

/// Shuffles the values of each property in `names` across the files under
/// `dir`. Every name gets its own pool, filled from the files where the
/// property is truthy and drained back into exactly those files.
///
/// Only files that received at least one new value are written, so the
/// output acts as an overlay on the input tree. Returns that file count.
pub fn shuffle_properties<A, R>(
    io: &Materializer,
    dir: &Path,
    access: &A,
    names: &[&str],
    rng: &mut R,
) -> Result<usize>
where
    A: PropertyAccess + ?Sized,
    R: Rng + ?Sized,
{
    let mut documents = load_documents(io, dir)?;

    let mut pools: Vec<Vec<Value>> = names
        .iter()
        .map(|name| {
            let pool: Vec<Value> = documents
                .iter()
                .filter_map(|(_, doc)| extract_truthy(access, doc, name))
                .collect();
            shuffle(&pool, &mut *rng)
        })
        .collect();

    let mut changed = 0usize;
    for (rel, doc) in documents.iter_mut() {
        let mut touched = false;
        for (name, pool) in names.iter().zip(pools.iter_mut()) {
            if extract_truthy(access, doc, name).is_none() {
                continue;
            }
            if let Some(value) = pool.pop() {
                access.inject(doc, name, value);
                touched = true;
            }
        }

        if touched {
            io.write_json(rel, doc)?;
            changed += 1;
        }
    }

    tracing::debug!(dir = %dir.display(), ?names, changed, "shuffled properties");
    Ok(changed)
}
