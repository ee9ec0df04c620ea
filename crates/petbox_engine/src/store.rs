/* 📖 # Why a whole-collection store?

Every mutation anywhere in the system is a full decode → in-memory mutate →
full encode → overwrite cycle against a single backing file. There is no
partial update, no append log, no indexing and no caching across calls; every
read reflects the on-disk state at call time. This is intentional simplicity
for a single-file, single-collection dataset.

The store is generic and knows nothing about pets. The only capability the
record type exposes beyond serde is an integer identifier (the `Keyed` trait),
and even that exists for the repository's benefit, not the store's.
*/

use std::io::Write;
use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use petbox_base::pal::{FilePath, PalHandle};
use petbox_base::{PetboxError, PetboxResult};

/// Capability to extract the integer identifier from a record.
pub trait Keyed {
    fn id(&self) -> u64;
}

/// Sole read/write gateway to a single backing file holding an ordered
/// sequence of records encoded as a JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileStore<T> {
    pal: PalHandle,
    path: FilePath,
    _record: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a store over the given backing file. The file is not touched
    /// until the first read or write.
    pub fn new(pal: PalHandle, path: FilePath) -> Self {
        Self {
            pal,
            path,
            _record: PhantomData,
        }
    }

    /// The backing file path.
    pub fn path(&self) -> &FilePath {
        &self.path
    }

    /// Load and decode the entire backing file.
    ///
    /// A missing file is the first-use bootstrap case and yields an empty
    /// sequence. A file that exists but cannot be decoded is an error: corrupt
    /// data must never be silently treated as an empty collection.
    pub fn read(&self) -> PetboxResult<Vec<T>> {
        if !self.pal.file_exists(&self.path)? {
            debug!(path = %self.path, "backing file missing, treating as empty collection");
            return Ok(Vec::new());
        }

        let contents = self.pal.read_file_to_string(&self.path)?;
        serde_json::from_str(&contents).map_err(|e| {
            Box::new(PetboxError::decode(self.path.as_path().to_path_buf(), e))
        })
    }

    /// Encode the full sequence and overwrite the backing file in its entirety.
    ///
    /// Prior file content is fully replaced; a failure mid-write can leave the
    /// file truncated, which the next read reports as a decode error.
    pub fn write(&self, items: &[T]) -> PetboxResult<()> {
        let json = serde_json::to_string(items)
            .map_err(|e| Box::new(PetboxError::decode(self.path.as_path().to_path_buf(), e)))?;

        let mut writer = self.pal.create_file(&self.path)?;
        writer
            .write_all(json.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| Box::new(PetboxError::file(self.path.as_path().to_path_buf(), e)))?;
        debug!(path = %self.path, count = items.len(), "wrote collection snapshot");
        Ok(())
    }
}
