use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, error, instrument, warn};

use crate::{PetboxError, PetboxResult};

use super::FilePath;
use super::http::{
    HttpMethod, HttpRequest, HttpResponse, HttpServerConfig, HttpServerHandle, HttpService,
    HttpStatusCode,
};
use super::traits::{Pal, ReadSeek};

/* 📖 # Why use std::fs and tiny_http instead of async crates?

Synchronous I/O is sufficient here: every request-triggered operation is a
self-contained read-decode / mutate / encode-write sequence with no shared
in-memory state, so an async runtime would add complexity without benefit.
tiny_http provides the thread-per-server loop that matches this model.
*/

/// Concrete PAL implementation using the real filesystem via std::fs and a
/// tiny_http server for HTTP.
///
/// All file paths are resolved relative to a configured base directory,
/// ensuring operations stay within intended boundaries.
#[derive(Debug)]
pub struct RealPal {
    base_dir: PathBuf,
}

impl RealPal {
    /// Create a new RealPal with the given base directory.
    ///
    /// # Arguments
    /// * `base_dir` - All paths will be resolved relative to this directory
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Resolve a FilePath to an absolute filesystem path.
    fn resolve_path(&self, path: &FilePath) -> PathBuf {
        self.base_dir.join(path.as_path())
    }
}

impl Pal for RealPal {
    #[instrument(skip(self), fields(path = %path))]
    fn file_exists(&self, path: &FilePath) -> PetboxResult<bool> {
        let resolved = self.resolve_path(path);
        let exists = resolved.exists();
        debug!(exists, resolved = %resolved.display(), "checked file existence");
        Ok(exists)
    }

    #[instrument(skip(self), fields(path = %path))]
    fn read_file(&self, path: &FilePath) -> PetboxResult<Box<dyn ReadSeek + 'static>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "opening file for reading");
        let file = fs::File::open(&resolved).map_err(|e| {
            debug!(error = %e, "failed to open file");
            Box::new(PetboxError::file(resolved, e))
        })?;
        Ok(Box::new(file))
    }

    #[instrument(skip(self), fields(path = %path))]
    fn create_file(&self, path: &FilePath) -> PetboxResult<Box<dyn Write>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "creating file");
        let file = fs::File::create(&resolved).map_err(|e| {
            debug!(error = %e, "failed to create file");
            Box::new(PetboxError::file(resolved, e))
        })?;
        Ok(Box::new(file))
    }

    #[instrument(skip(self, service))]
    fn start_http_server(
        &self,
        service: Box<dyn HttpService>,
        config: HttpServerConfig,
    ) -> PetboxResult<HttpServerHandle> {
        let address = config.address();
        let server = tiny_http::Server::http(address.as_str())
            .map_err(|e| crate::err!("Failed to bind HTTP server on {}: {}", address, e))?;

        let port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .unwrap_or(0);
        debug!(port, "HTTP server bound");

        let handle = HttpServerHandle::new(port);
        let shutdown = Arc::clone(handle.shutdown_flag());
        std::thread::spawn(move || server_loop(server, service, shutdown));

        Ok(handle)
    }
}

/// Accept loop for the tiny_http server. Polls with a timeout so the shutdown
/// flag is observed even when no requests arrive.
fn server_loop(server: tiny_http::Server, service: Box<dyn HttpService>, shutdown: Arc<AtomicBool>) {
    while !shutdown.load(Ordering::SeqCst) {
        match server.recv_timeout(Duration::from_millis(100)) {
            Ok(Some(request)) => handle_connection(request, service.as_ref()),
            Ok(None) => continue,
            Err(e) => {
                warn!(error = %e, "HTTP server accept failed, shutting down");
                break;
            }
        }
    }
    debug!("HTTP server loop exited");
}

/// Convert one tiny_http request, dispatch it to the service, and respond.
fn handle_connection(mut request: tiny_http::Request, service: &dyn HttpService) {
    let method_str = request.method().to_string();
    let Some(method) = HttpMethod::parse(&method_str) else {
        debug!(method = %method_str, "rejecting unsupported HTTP method");
        respond(request, HttpResponse::new(HttpStatusCode::MethodNotAllowed));
        return;
    };

    let path = request.url().to_string();

    let mut http_request = HttpRequest::new(method, path);
    for header in request.headers() {
        http_request = http_request.with_header(
            header.field.as_str().as_str(),
            header.value.as_str(),
        );
    }

    let mut body = Vec::new();
    if let Err(e) = request.as_reader().read_to_end(&mut body) {
        warn!(error = %e, "failed to read request body");
        respond(request, HttpResponse::bad_request());
        return;
    }
    if !body.is_empty() {
        http_request = http_request.with_body(body);
    }

    let response = match service.handle_request(http_request) {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "HTTP service returned an error");
            HttpResponse::internal_error()
        }
    };

    respond(request, response);
}

/// Send an HttpResponse back over the wire.
fn respond(request: tiny_http::Request, response: HttpResponse) {
    let status = response.status();
    let headers = response.headers().clone();
    let mut tiny_response = tiny_http::Response::from_data(response.into_body().into_bytes())
        .with_status_code(tiny_http::StatusCode(status.as_u16()));

    for (key, value) in headers.all() {
        if let Ok(header) = tiny_http::Header::from_bytes(key.as_bytes(), value.as_bytes()) {
            tiny_response.add_header(header);
        }
    }

    if let Err(e) = request.respond(tiny_response) {
        warn!(error = %e, "failed to send HTTP response");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pal::http::HttpStatusCode;
    use std::io::{BufRead, BufReader};
    use std::net::TcpStream;
    use tempfile::TempDir;

    fn setup_test_dir() -> (TempDir, RealPal) {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let pal = RealPal::new(temp_dir.path().to_path_buf());
        (temp_dir, pal)
    }

    #[test]
    fn test_file_exists_true() {
        let (temp_dir, pal) = setup_test_dir();
        fs::write(temp_dir.path().join("pets.json"), "[]").unwrap();

        assert!(pal.file_exists(&FilePath::from("pets.json")).unwrap());
    }

    #[test]
    fn test_file_exists_false() {
        let (_temp_dir, pal) = setup_test_dir();

        assert!(!pal.file_exists(&FilePath::from("missing.json")).unwrap());
    }

    #[test]
    fn test_read_file() {
        let (temp_dir, pal) = setup_test_dir();
        let content = "[{\"id\":1}]";
        fs::write(temp_dir.path().join("pets.json"), content).unwrap();

        let result = pal
            .read_file_to_string(&FilePath::from("pets.json"))
            .unwrap();
        assert_eq!(result, content);
    }

    #[test]
    fn test_read_file_not_found() {
        let (_temp_dir, pal) = setup_test_dir();

        let result = pal.read_file(&FilePath::from("missing.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_create_file() {
        let (temp_dir, pal) = setup_test_dir();

        let mut writer = pal.create_file(&FilePath::from("new.json")).unwrap();
        writer.write_all(b"[]").unwrap();
        drop(writer);

        let content = fs::read_to_string(temp_dir.path().join("new.json")).unwrap();
        assert_eq!(content, "[]");
    }

    #[test]
    fn test_create_file_overwrites() {
        let (temp_dir, pal) = setup_test_dir();
        fs::write(temp_dir.path().join("pets.json"), "old contents").unwrap();

        let mut writer = pal.create_file(&FilePath::from("pets.json")).unwrap();
        writer.write_all(b"[]").unwrap();
        drop(writer);

        let content = fs::read_to_string(temp_dir.path().join("pets.json")).unwrap();
        assert_eq!(content, "[]");
    }

    #[derive(Debug)]
    struct PingService;

    impl HttpService for PingService {
        fn handle_request(&self, request: HttpRequest) -> PetboxResult<HttpResponse> {
            match request.path() {
                "/ping" => Ok(HttpResponse::json("{\"pong\":true}")),
                _ => Ok(HttpResponse::not_found()),
            }
        }
    }

    #[test]
    fn test_http_server_round_trip() {
        let (_temp_dir, pal) = setup_test_dir();
        let config = HttpServerConfig::new("127.0.0.1");

        let handle = pal
            .start_http_server(Box::new(PingService), config)
            .unwrap();
        assert!(handle.port() > 0);

        let mut stream = TcpStream::connect(("127.0.0.1", handle.port())).unwrap();
        stream
            .write_all(b"GET /ping HTTP/1.0\r\nHost: 127.0.0.1\r\n\r\n")
            .unwrap();

        let mut reader = BufReader::new(stream);
        let mut status_line = String::new();
        reader.read_line(&mut status_line).unwrap();
        assert!(status_line.contains("200"), "got {status_line}");

        let mut rest = String::new();
        reader.read_to_string(&mut rest).unwrap();
        assert!(rest.contains("{\"pong\":true}"));
    }

    #[test]
    fn test_http_server_error_becomes_500() {
        #[derive(Debug)]
        struct FailingService;

        impl HttpService for FailingService {
            fn handle_request(&self, _request: HttpRequest) -> PetboxResult<HttpResponse> {
                Err(crate::err!("boom"))
            }
        }

        let (_temp_dir, pal) = setup_test_dir();
        let handle = pal
            .start_http_server(Box::new(FailingService), HttpServerConfig::new("127.0.0.1"))
            .unwrap();

        let mut stream = TcpStream::connect(("127.0.0.1", handle.port())).unwrap();
        stream
            .write_all(b"GET / HTTP/1.0\r\nHost: 127.0.0.1\r\n\r\n")
            .unwrap();

        let mut reader = BufReader::new(stream);
        let mut status_line = String::new();
        reader.read_line(&mut status_line).unwrap();
        assert!(
            status_line.contains(&HttpStatusCode::InternalServerError.as_u16().to_string()),
            "got {status_line}"
        );
    }
}
