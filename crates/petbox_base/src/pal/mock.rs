use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU16, Ordering};

use crate::{PetboxError, PetboxResult};

use super::FilePath;
use super::http::{HttpRequest, HttpResponse, HttpServerConfig, HttpServerHandle, HttpService};
use super::traits::{Pal, ReadSeek};

/* 📖 # Why use HashMap for MockPal storage?

MockPal uses in-memory storage with Arc<Mutex<T>> for several reasons:
1. **Speed**: No filesystem I/O, deterministic and fast for unit tests
2. **Isolation**: No side effects on the real filesystem
3. **Control**: Easy to seed specific backing-file contents (e.g. a corrupt
   collection, or a pet with negative food)
4. **Thread-safe**: Mutex allows concurrent test execution
*/

/// In-memory PAL implementation for testing.
///
/// Stores file contents in a HashMap and registers HTTP services so requests
/// can be simulated without network I/O.
///
/// # Examples
///
/// ```
/// use petbox_base::{FilePath, MockPal, Pal};
///
/// let mock = MockPal::new();
/// mock.add_file(FilePath::from("pets.json"), b"[]".to_vec());
/// let content = mock.read_file_to_string(&FilePath::from("pets.json")).unwrap();
/// assert_eq!(content, "[]");
/// ```
#[derive(Debug, Clone)]
pub struct MockPal {
    files: Arc<Mutex<HashMap<FilePath, Vec<u8>>>>,
    http_servers: Arc<Mutex<HashMap<u16, HttpServerInfo>>>,
    next_port: Arc<AtomicU16>,
}

/// Information about a registered HTTP server.
#[derive(Debug)]
struct HttpServerInfo {
    service: Box<dyn HttpService>,
    _config: HttpServerConfig,
}

impl MockPal {
    /// Create a new empty MockPal.
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            http_servers: Arc::new(Mutex::new(HashMap::new())),
            next_port: Arc::new(AtomicU16::new(10000)),
        }
    }

    /// Add a file to the mock storage.
    pub fn add_file(&self, path: FilePath, content: Vec<u8>) {
        self.files.lock().unwrap().insert(path, content);
    }

    /// Simulate an HTTP request to a running server.
    ///
    /// Looks up the registered service for the given port and invokes it
    /// without making real network calls.
    pub fn simulate_request(
        &self,
        port: u16,
        request: HttpRequest,
    ) -> PetboxResult<HttpResponse> {
        let servers = self.http_servers.lock().unwrap();
        let server_info = servers
            .get(&port)
            .ok_or_else(|| crate::err!("No HTTP server registered on port {}", port))?;

        server_info.service.handle_request(request)
    }

    /// Get the number of registered HTTP servers.
    pub fn http_server_count(&self) -> usize {
        self.http_servers.lock().unwrap().len()
    }
}

impl Default for MockPal {
    fn default() -> Self {
        Self::new()
    }
}

impl Pal for MockPal {
    fn file_exists(&self, path: &FilePath) -> PetboxResult<bool> {
        let files = self.files.lock().unwrap();
        Ok(files.contains_key(path))
    }

    fn read_file(&self, path: &FilePath) -> PetboxResult<Box<dyn ReadSeek + 'static>> {
        let files = self.files.lock().unwrap();
        let content = files
            .get(path)
            .ok_or_else(|| {
                Box::new(PetboxError::file(
                    path.as_path().to_path_buf(),
                    std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("File not found: {}", path),
                    ),
                ))
            })?
            .clone();
        Ok(Box::new(Cursor::new(content)))
    }

    fn create_file(&self, path: &FilePath) -> PetboxResult<Box<dyn Write>> {
        // Return a writer that stores into the mock storage when dropped
        Ok(Box::new(MockFileWriter {
            path: path.clone(),
            files: Arc::clone(&self.files),
            buffer: Vec::new(),
        }))
    }

    fn start_http_server(
        &self,
        service: Box<dyn HttpService>,
        config: HttpServerConfig,
    ) -> PetboxResult<HttpServerHandle> {
        // Use the configured port if provided, otherwise auto-assign
        let port = match config.port {
            Some(p) => p,
            None => self.next_port.fetch_add(1, Ordering::SeqCst),
        };

        let server_info = HttpServerInfo {
            service,
            _config: config,
        };
        {
            let mut servers = self.http_servers.lock().unwrap();
            servers.insert(port, server_info);
        }

        Ok(HttpServerHandle::new(port))
    }
}

/// Helper struct for writing files to MockPal.
struct MockFileWriter {
    path: FilePath,
    files: Arc<Mutex<HashMap<FilePath, Vec<u8>>>>,
    buffer: Vec<u8>,
}

impl Write for MockFileWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Drop for MockFileWriter {
    fn drop(&mut self) {
        self.files
            .lock()
            .unwrap()
            .insert(self.path.clone(), self.buffer.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::http::HttpMethod;
    use crate::pal::Pal;

    #[test]
    fn test_file_exists_true() {
        let pal = MockPal::new();
        pal.add_file(FilePath::from("pets.json"), b"[]".to_vec());

        assert!(pal.file_exists(&FilePath::from("pets.json")).unwrap());
    }

    #[test]
    fn test_file_exists_false() {
        let pal = MockPal::new();

        assert!(!pal.file_exists(&FilePath::from("pets.json")).unwrap());
    }

    #[test]
    fn test_read_file() {
        let pal = MockPal::new();
        let content = b"[{\"id\":1}]".to_vec();
        pal.add_file(FilePath::from("pets.json"), content.clone());

        let result = pal
            .read_file_to_string(&FilePath::from("pets.json"))
            .unwrap();
        assert_eq!(result, String::from_utf8(content).unwrap());
    }

    #[test]
    fn test_read_file_not_found() {
        let pal = MockPal::new();

        let result = pal.read_file(&FilePath::from("missing.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_create_file() {
        let pal = MockPal::new();

        let mut writer = pal.create_file(&FilePath::from("new.json")).unwrap();
        writer.write_all(b"[]").unwrap();
        drop(writer);

        let content = pal.read_file_to_string(&FilePath::from("new.json")).unwrap();
        assert_eq!(content, "[]");
    }

    #[test]
    fn test_create_file_overwrites() {
        let pal = MockPal::new();
        pal.add_file(FilePath::from("pets.json"), b"old".to_vec());

        let mut writer = pal.create_file(&FilePath::from("pets.json")).unwrap();
        writer.write_all(b"new").unwrap();
        drop(writer);

        let content = pal
            .read_file_to_string(&FilePath::from("pets.json"))
            .unwrap();
        assert_eq!(content, "new");
    }

    #[derive(Debug)]
    struct TestHttpService;

    impl HttpService for TestHttpService {
        fn handle_request(&self, request: HttpRequest) -> PetboxResult<HttpResponse> {
            match request.path() {
                "/status" => Ok(HttpResponse::json("{\"status\": \"ok\"}")),
                "/echo" => {
                    if let Some(body) = request.body().as_string() {
                        Ok(HttpResponse::json(format!("{{\"echo\": \"{}\"}}", body)))
                    } else {
                        Ok(HttpResponse::bad_request().with_body("Invalid body"))
                    }
                }
                _ => Ok(HttpResponse::not_found()),
            }
        }
    }

    #[test]
    fn test_start_http_server_auto_port() {
        let pal = MockPal::new();
        let config = HttpServerConfig::new("127.0.0.1");

        let handle = pal
            .start_http_server(Box::new(TestHttpService), config)
            .unwrap();
        assert!(handle.port() >= 10000);
        assert_eq!(pal.http_server_count(), 1);
    }

    #[test]
    fn test_start_http_server_with_specific_port() {
        let pal = MockPal::new();
        let config = HttpServerConfig::new("127.0.0.1").with_port(8080);

        let handle = pal
            .start_http_server(Box::new(TestHttpService), config)
            .unwrap();
        assert_eq!(handle.port(), 8080);
    }

    #[test]
    fn test_simulate_request_success() {
        let pal = MockPal::new();
        let config = HttpServerConfig::new("127.0.0.1").with_port(8080);
        pal.start_http_server(Box::new(TestHttpService), config)
            .unwrap();

        let request = HttpRequest::new(HttpMethod::Get, "/status");
        let response = pal.simulate_request(8080, request).unwrap();

        assert_eq!(response.status().as_u16(), 200);
        assert!(response.body().as_string().unwrap().contains("ok"));
    }

    #[test]
    fn test_simulate_request_not_found_route() {
        let pal = MockPal::new();
        let config = HttpServerConfig::new("127.0.0.1").with_port(8080);
        pal.start_http_server(Box::new(TestHttpService), config)
            .unwrap();

        let request = HttpRequest::new(HttpMethod::Get, "/unknown");
        let response = pal.simulate_request(8080, request).unwrap();

        assert_eq!(response.status().as_u16(), 404);
    }

    #[test]
    fn test_simulate_request_with_body() {
        let pal = MockPal::new();
        let config = HttpServerConfig::new("127.0.0.1").with_port(8080);
        pal.start_http_server(Box::new(TestHttpService), config)
            .unwrap();

        let request = HttpRequest::new(HttpMethod::Post, "/echo").with_body("hello");
        let response = pal.simulate_request(8080, request).unwrap();

        assert_eq!(response.status().as_u16(), 200);
        let body = response.body().as_string().unwrap();
        assert!(body.contains("echo"));
        assert!(body.contains("hello"));
    }

    #[test]
    fn test_simulate_request_unregistered_port() {
        let pal = MockPal::new();
        let request = HttpRequest::new(HttpMethod::Get, "/status");

        let result = pal.simulate_request(9999, request);
        assert!(result.is_err());
    }
}
