use std::path::Path;

use rand::Rng;
use serde_json::Value;

use crate::access::MultiPropertyAccess;
use crate::materialize::Materializer;
use crate::permute::shuffle;
use crate::property::load_documents;
use crate::Result;

// One pool for the whole directory. Every file is written, changed or not.
pub fn cross_shuffle<A, R>(io: &Materializer, dir: &Path, access: &A, rng: &mut R) -> Result<usize>
where
    A: MultiPropertyAccess + ?Sized,
    R: Rng + ?Sized,
{
    let mut documents = load_documents(io, dir)?;

    let pool: Vec<Value> = documents
        .iter()
        .flat_map(|(_, doc)| access.extract_all(doc))
        .collect();
    let pooled = pool.len();
    let mut pool = shuffle(&pool, rng);

    for (rel, doc) in documents.iter_mut() {
        access.inject_all(doc, &mut pool);
        io.write_json(rel, doc)?;
    }

    if !pool.is_empty() {
        tracing::debug!(dir = %dir.display(), left = pool.len(), "cross shuffle pool not drained");
    }
    tracing::debug!(dir = %dir.display(), files = documents.len(), pooled, "cross shuffled");
    Ok(documents.len())
}
