/* 📖 # Why is the CLI minimal and hardcoded?

No argument parsing, no clap. The workflow is:
1. Change to the directory that should hold the data file
2. Ensure `petbox.toml` exists
3. Run `petbox`

Exit codes:
- 0: never (the server runs until killed)
- 1: startup error (config missing or unparseable, bind failed)
*/

use std::env;
use std::process;

use petbox_base::pal::http::HttpServerConfig;
use petbox_base::logging::init_tracing;
use petbox_base::{FilePath, PalHandle, RealPal};
use petbox_engine::{ApiService, JsonFileStore, PetRepository, PetService, load_config};

fn main() {
    init_tracing().unwrap();

    let current_dir = env::current_dir().unwrap_or_else(|e| {
        eprintln!("Error: Failed to get current directory: {}", e);
        process::exit(1);
    });

    let pal = PalHandle::new(RealPal::new(current_dir));

    let config = match load_config(&pal, &FilePath::from("petbox.toml")) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config from petbox.toml: {}", e);
            process::exit(1);
        }
    };

    let store = JsonFileStore::new(pal.clone(), FilePath::from(config.data_file.clone()));
    let service = PetService::new(PetRepository::new(store));
    let api = ApiService::new(service);

    let mut server_config = HttpServerConfig::new(config.host.clone());
    if let Some(port) = config.port {
        server_config = server_config.with_port(port);
    }

    let handle = match pal.start_http_server(Box::new(api), server_config) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Error: Failed to start HTTP server: {}", e);
            process::exit(1);
        }
    };

    println!(
        "petbox listening on http://{} (data file: {})",
        handle.address(&config.host),
        config.data_file
    );

    // The server runs on its own thread; keep the handle alive until killed.
    loop {
        std::thread::park();
    }
}
