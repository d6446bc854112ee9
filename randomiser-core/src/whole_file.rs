use std::path::Path;

use rand::Rng;
use serde_json::Value;

use crate::materialize::Materializer;
use crate::paths::collect_file_paths;
use crate::permute::shuffle;
use crate::Result;

pub type JsonTransform<'a> = &'a dyn Fn(Value) -> Value;

/// Writes the i-th collected file under `dir` to the i-th path of a
/// permutation of the same list. With a `transform` the content goes
/// through JSON, otherwise bytes are copied untouched.
pub fn shuffle_files<R: Rng + ?Sized>(
    io: &Materializer,
    dir: &Path,
    transform: Option<JsonTransform<'_>>,
    rng: &mut R,
) -> Result<usize> {
    let sources = collect_file_paths(io.input_root(), dir)?;
    let destinations = shuffle(&sources, rng);

    for (src, dest) in sources.iter().zip(&destinations) {
        match transform {
            Some(transform) => {
                let doc = io.read_json(src)?;
                io.write_json(dest, &transform(doc))?;
            }
            None => io.copy_bytes(src, dest)?,
        }
    }

    Ok(sources.len())
}
