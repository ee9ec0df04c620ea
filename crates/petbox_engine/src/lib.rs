pub mod api;
pub mod config;
pub mod pet;
pub mod repository;
pub mod service;
pub mod store;

pub use api::ApiService;
pub use config::{Config, load_config};
pub use pet::Pet;
pub use repository::PetRepository;
pub use service::{PetError, PetService};
pub use store::{JsonFileStore, Keyed};
