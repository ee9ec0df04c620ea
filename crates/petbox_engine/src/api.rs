/* 📖 # Why a single unified API service?

ApiService is one HTTP service handling all pet endpoints. One service to
register, one handle to manage, shared error handling and response format,
and MockPal tests only need to register one service. Routing happens
internally on the request path:

- `POST /pets` -> create a pet
- `GET /pets` -> list pets
- `GET /pets/{id}` -> fetch one pet
- `POST /pets/{id}/food` -> feed a pet
- `POST /pets/{id}/age` -> age a pet
- all other paths -> HTTP 404
*/

/* 📖 # Why use serde for JSON serialization?

Manual JSON string construction with format!() is error-prone: manual escaping,
easy to malform, no compile-time validation. Structs with derive(Serialize)
define the schema and serde_json handles the rest. All API responses go
through this pattern, and all request bodies are parsed into derive(Deserialize)
types with `deny_unknown_fields` mirroring the request schema.
*/

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use petbox_base::PetboxResult;
use petbox_base::pal::http::{
    HttpMethod, HttpRequest, HttpResponse, HttpService, HttpStatusCode,
};

use crate::pet::Pet;
use crate::service::{PetError, PetService};

/// Request body for `POST /pets`. Unknown fields are rejected, matching the
/// closed request schema of the API.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreatePetRequest {
    name: String,
}

/// Error body shape shared by all failure responses.
#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

/// HTTP service exposing the pet API.
///
/// Expected domain conditions are mapped to status codes here: absence and
/// death become 404 with a descriptive message, malformed requests become
/// 400, and storage failures are logged and become a generic 500 — never a
/// 404. Every response carries permissive CORS headers.
#[derive(Debug, Clone)]
pub struct ApiService {
    service: PetService,
}

impl ApiService {
    pub fn new(service: PetService) -> Self {
        Self { service }
    }

    /// Serialize data to JSON and wrap it in a response with the given status.
    fn json_response<T: Serialize>(
        status: HttpStatusCode,
        data: &T,
    ) -> PetboxResult<HttpResponse> {
        serde_json::to_string(data)
            .map(|json| {
                HttpResponse::new(status)
                    .with_content_type("application/json")
                    .with_body(json)
            })
            .map_err(|e| petbox_base::err!("JSON serialization error: {}", e))
    }

    /// Build a `{"message": ...}` failure response.
    fn json_error(status: HttpStatusCode, message: impl Into<String>) -> PetboxResult<HttpResponse> {
        Self::json_response(
            status,
            &ErrorResponse {
                message: message.into(),
            },
        )
    }

    /// Map a domain error to its transport response.
    fn pet_error_response(err: PetError) -> PetboxResult<HttpResponse> {
        match &err {
            PetError::NotFound { .. } | PetError::Dead { .. } => {
                debug!(error = %err, "pet operation rejected");
                Self::json_error(HttpStatusCode::NotFound, err.to_string())
            }
            PetError::Storage(cause) => {
                // Infrastructure failures surface as 500, never as "not found"
                error!(error = %cause, "storage failure while handling request");
                Self::json_error(HttpStatusCode::InternalServerError, "Internal server error")
            }
        }
    }

    fn handle_create(&self, request: &HttpRequest) -> PetboxResult<HttpResponse> {
        let parsed: CreatePetRequest = match serde_json::from_slice(request.body().as_bytes()) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(error = %e, "rejecting malformed create request");
                return Self::json_error(
                    HttpStatusCode::BadRequest,
                    format!("Invalid request body: {}", e),
                );
            }
        };

        if parsed.name.trim().is_empty() {
            return Self::json_error(HttpStatusCode::BadRequest, "The name must not be empty");
        }

        match self.service.born(&parsed.name) {
            Ok(pet) => Self::json_response(HttpStatusCode::Created, &pet),
            Err(err) => Self::pet_error_response(err),
        }
    }

    fn handle_list(&self) -> PetboxResult<HttpResponse> {
        match self.service.list() {
            Ok(pets) => Self::json_response::<Vec<Pet>>(HttpStatusCode::Ok, &pets),
            Err(err) => Self::pet_error_response(err),
        }
    }

    fn handle_get(&self, raw_id: &str) -> PetboxResult<HttpResponse> {
        let Ok(id) = raw_id.parse::<u64>() else {
            return Self::invalid_id(raw_id);
        };
        match self.service.get_by_id(id) {
            Ok(pet) => Self::json_response(HttpStatusCode::Ok, &pet),
            Err(err) => Self::pet_error_response(err),
        }
    }

    fn handle_feed(&self, raw_id: &str) -> PetboxResult<HttpResponse> {
        let Ok(id) = raw_id.parse::<u64>() else {
            return Self::invalid_id(raw_id);
        };
        match self.service.feed(id) {
            Ok(pet) => Self::json_response(HttpStatusCode::Ok, &pet),
            Err(err) => Self::pet_error_response(err),
        }
    }

    fn handle_increase_age(&self, raw_id: &str) -> PetboxResult<HttpResponse> {
        let Ok(id) = raw_id.parse::<u64>() else {
            return Self::invalid_id(raw_id);
        };
        match self.service.increase_age(id) {
            Ok(pet) => Self::json_response(HttpStatusCode::Ok, &pet),
            Err(err) => Self::pet_error_response(err),
        }
    }

    fn invalid_id(raw_id: &str) -> PetboxResult<HttpResponse> {
        Self::json_error(
            HttpStatusCode::BadRequest,
            format!("The id must be a positive integer, got: {}", raw_id),
        )
    }

    /// CORS preflight; the API is fully open.
    fn preflight() -> HttpResponse {
        HttpResponse::no_content()
            .with_header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
            .with_header("Access-Control-Allow-Headers", "Content-Type")
    }

    fn with_cors(response: HttpResponse) -> HttpResponse {
        response.with_header("Access-Control-Allow-Origin", "*")
    }
}

impl HttpService for ApiService {
    fn handle_request(&self, request: HttpRequest) -> PetboxResult<HttpResponse> {
        debug!(method = %request.method(), path = request.path(), "handling request");

        if request.method() == &HttpMethod::Options {
            return Ok(Self::with_cors(Self::preflight()));
        }

        // Ignore any query string; no endpoint takes query parameters
        let path = request.path().split('?').next().unwrap_or("");
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let response = match (request.method(), segments.as_slice()) {
            (HttpMethod::Post, ["pets"]) => self.handle_create(&request),
            (HttpMethod::Get, ["pets"]) => self.handle_list(),
            (HttpMethod::Get, ["pets", raw_id]) => self.handle_get(raw_id),
            (HttpMethod::Post, ["pets", raw_id, "food"]) => self.handle_feed(raw_id),
            (HttpMethod::Post, ["pets", raw_id, "age"]) => self.handle_increase_age(raw_id),
            _ => Self::json_error(HttpStatusCode::NotFound, "Route not found"),
        }?;

        Ok(Self::with_cors(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::PetRepository;
    use crate::store::JsonFileStore;
    use petbox_base::MockPal;
    use petbox_base::pal::{FilePath, PalHandle};

    fn api_with(mock: &MockPal) -> ApiService {
        ApiService::new(PetService::new(PetRepository::new(JsonFileStore::new(
            PalHandle::new(mock.clone()),
            FilePath::from("pets.json"),
        ))))
    }

    fn post(path: &str, body: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Post, path)
            .with_header("Content-Type", "application/json")
            .with_body(body)
    }

    #[test]
    fn test_unknown_route_is_404() {
        let api = api_with(&MockPal::new());
        let response = api
            .handle_request(HttpRequest::new(HttpMethod::Get, "/gerbils"))
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::NotFound);
    }

    #[test]
    fn test_wrong_method_on_known_path_is_404() {
        let api = api_with(&MockPal::new());
        let response = api
            .handle_request(HttpRequest::new(HttpMethod::Delete, "/pets"))
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::NotFound);
    }

    #[test]
    fn test_options_preflight() {
        let api = api_with(&MockPal::new());
        let response = api
            .handle_request(HttpRequest::new(HttpMethod::Options, "/pets"))
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::NoContent);
        assert!(response.headers().contains("Access-Control-Allow-Methods"));
        assert_eq!(
            response.headers().get("Access-Control-Allow-Origin"),
            Some(&"*".to_string())
        );
    }

    #[test]
    fn test_every_response_has_cors_header() {
        let api = api_with(&MockPal::new());
        let response = api
            .handle_request(HttpRequest::new(HttpMethod::Get, "/pets"))
            .unwrap();
        assert_eq!(
            response.headers().get("Access-Control-Allow-Origin"),
            Some(&"*".to_string())
        );
    }

    #[test]
    fn test_create_rejects_unknown_fields() {
        let api = api_with(&MockPal::new());
        let response = api
            .handle_request(post("/pets", "{\"name\":\"Fluffy\",\"sneaky\":1}"))
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::BadRequest);
    }

    #[test]
    fn test_create_rejects_missing_name() {
        let api = api_with(&MockPal::new());
        let response = api.handle_request(post("/pets", "{}")).unwrap();
        assert_eq!(response.status(), HttpStatusCode::BadRequest);
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let api = api_with(&MockPal::new());
        let response = api.handle_request(post("/pets", "{\"name\":\"  \"}")).unwrap();
        assert_eq!(response.status(), HttpStatusCode::BadRequest);
    }

    #[test]
    fn test_create_rejects_non_json_body() {
        let api = api_with(&MockPal::new());
        let response = api.handle_request(post("/pets", "not json")).unwrap();
        assert_eq!(response.status(), HttpStatusCode::BadRequest);
    }

    #[test]
    fn test_non_numeric_id_is_400() {
        let api = api_with(&MockPal::new());
        for request in [
            HttpRequest::new(HttpMethod::Get, "/pets/invalid-id"),
            HttpRequest::new(HttpMethod::Post, "/pets/invalid-id/food"),
            HttpRequest::new(HttpMethod::Post, "/pets/invalid-id/age"),
            HttpRequest::new(HttpMethod::Get, "/pets/-1"),
        ] {
            let response = api.handle_request(request).unwrap();
            assert_eq!(response.status(), HttpStatusCode::BadRequest);
        }
    }

    #[test]
    fn test_query_string_is_ignored() {
        let api = api_with(&MockPal::new());
        let response = api
            .handle_request(HttpRequest::new(HttpMethod::Get, "/pets?verbose=1"))
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::Ok);
        assert_eq!(response.body().as_string().unwrap(), "[]");
    }

    #[test]
    fn test_storage_failure_maps_to_500_with_generic_message() {
        let mock = MockPal::new();
        mock.add_file(FilePath::from("pets.json"), b"corrupt".to_vec());
        let api = api_with(&mock);

        let response = api
            .handle_request(HttpRequest::new(HttpMethod::Get, "/pets/1"))
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::InternalServerError);
        assert_eq!(
            response.body().as_string().unwrap(),
            "{\"message\":\"Internal server error\"}"
        );
    }
}
