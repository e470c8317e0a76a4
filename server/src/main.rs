use server::config::{EnvVar, Opts, get_or_create_config};
use server::global_var::{ENV_VAR, LOGGER, LOGGER_CELL};
use server::interface::ApiListener;
use server::registry::{init_registry, init_working_dir};

fn print_version_and_exit() -> ! {
    println!(
        "graph-registry {} (commit {} {}, built {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_COMMIT"),
        env!("GIT_STATE"),
        env!("BUILD_TIME"),
    );
    std::process::exit(0);
}

#[tokio::main]
async fn main() {
    let opts = Opts::from_args();
    if opts.version {
        print_version_and_exit();
    }
    if opts.debug {
        // DEBUG_MODE is read lazily, so setting the env var here is enough.
        unsafe {
            std::env::set_var("DEBUG_MODE", "1");
        }
    }

    let config_path = opts.config.as_ref().and_then(|p| p.to_str());
    let config = match get_or_create_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    let env_var = match EnvVar::from_config(&config) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    let _ = ENV_VAR.set(env_var);

    let working_dir = ENV_VAR.get().unwrap().get_working_dir().to_string();
    let (logger, logger_task) = match init_working_dir(&working_dir).await {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Failed to initialize working dir '{}': {}", working_dir, e);
            std::process::exit(1);
        }
    };
    let _ = LOGGER_CELL.set(logger);

    if let Err(e) = init_registry().await {
        eprintln!("Failed to initialize the graph registry: {}", e);
        std::process::exit(1);
    }

    let listener = match ApiListener::bind().await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind the registry API: {}", e);
            std::process::exit(1);
        }
    };
    let port = ENV_VAR.get().unwrap().get_api_port();
    let handle = listener.into_task();
    LOGGER.info(format!("graph registry serving on port {}", port));
    println!("graph registry serving on port {}", port);

    let _ = tokio::signal::ctrl_c().await;
    println!("shutting down...");
    let _ = handle.shutdown().await;
    if let Some(l) = LOGGER_CELL.get() {
        l.shutdown().await;
    }
    let _ = logger_task.await;
}
