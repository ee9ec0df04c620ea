use std::io::{Read, Seek, Write};
use std::sync::Arc;

use crate::PetboxResult;

use super::file_path::FilePath;
use super::http::{HttpServerConfig, HttpServerHandle, HttpService};

/// Trait combining Read + Seek for file operations.
///
/// This enables returning opaque file handles that support both reading and
/// seeking, useful for different implementations (real files, in-memory buffers).
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/* 📖 # Why is Pal a trait instead of a struct?

Using a trait enables two key benefits:
1. **Testability**: MockPal implements Pal for fast, deterministic tests without
   filesystem side effects
2. **Flexibility**: Code depends on the abstraction, not the concrete implementation
*/

/// Platform Abstraction Layer (PAL) trait providing filesystem and HTTP server
/// operations.
///
/// Two implementations are provided:
/// - `RealPal`: Uses the real filesystem via `std::fs` and tiny_http
/// - `MockPal`: In-memory implementation for testing
pub trait Pal: std::fmt::Debug + Send + Sync + 'static {
    /// Check if a file exists at the given path.
    fn file_exists(&self, path: &FilePath) -> PetboxResult<bool>;

    /// Open a file for reading.
    fn read_file(&self, path: &FilePath) -> PetboxResult<Box<dyn ReadSeek + 'static>>;

    /// Read entire file contents as a UTF-8 string.
    ///
    /// Convenience method with a default implementation. Reads the file,
    /// validates UTF-8, and returns the string or an error.
    fn read_file_to_string(&self, path: &FilePath) -> PetboxResult<String> {
        let mut reader = self.read_file(path)?;
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents).map_err(|e| {
            Box::new(crate::PetboxError::file(
                path.as_path().to_path_buf(),
                e,
            ))
        })?;
        String::from_utf8(contents).map_err(|_e| crate::err!("File is not valid UTF-8: {}", path))
    }

    /// Create a new file, overwriting if it exists.
    fn create_file(&self, path: &FilePath) -> PetboxResult<Box<dyn Write>>;

    /// Start an HTTP server with the given service.
    ///
    /// Returns a handle to the running server. The server starts immediately
    /// and listens for connections. When the handle is dropped (or shutdown()
    /// is called), the server stops accepting new connections and shuts down.
    fn start_http_server(
        &self,
        service: Box<dyn HttpService>,
        config: HttpServerConfig,
    ) -> PetboxResult<HttpServerHandle>;
}

/* 📖 # Why use Arc<dyn Pal> with PalHandle?

Arc enables cheap cloning of the entire PAL implementation, allowing it to be
shared across multiple parts of the application. PalHandle wraps this for
ergonomic Deref access and Clone support, avoiding lifetime parameters.
*/

/// Handle to a PAL implementation, enabling shared ownership.
///
/// # Examples
///
/// ```no_run
/// use petbox_base::{PalHandle, RealPal};
///
/// let pal = PalHandle::new(RealPal::new(".".into()));
/// let pal_clone = pal.clone(); // Cheap clone, shares the same implementation
/// ```
#[derive(Debug, Clone)]
pub struct PalHandle(Arc<dyn Pal>);

impl PalHandle {
    /// Create a new PalHandle from a Pal implementation.
    pub fn new(pal: impl Pal + 'static) -> Self {
        Self(Arc::new(pal))
    }
}

impl std::ops::Deref for PalHandle {
    type Target = dyn Pal;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pal::mock::MockPal;

    #[test]
    fn test_pal_handle_clone() {
        let pal = PalHandle::new(MockPal::new());
        let _pal_clone = pal.clone();
    }

    #[test]
    fn test_pal_handle_deref() {
        let mock = MockPal::new();
        mock.add_file(FilePath::from("pets.json"), b"[]".to_vec());
        let pal = PalHandle::new(mock);

        assert!(pal.file_exists(&FilePath::from("pets.json")).unwrap());
        assert_eq!(
            pal.read_file_to_string(&FilePath::from("pets.json")).unwrap(),
            "[]"
        );
    }
}
