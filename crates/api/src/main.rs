use std::process::ExitCode;
use std::sync::Arc;

use raxel_api::bootstrap::Bootstrap;
use raxel_api::routes;
use raxel_core::config::{ConfigurationRegistry, ProcessEnv};
use raxel_db::{DatabaseConnection, PostgresConnection};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing();

    // --- Startup ---
    let mut bootstrap = Bootstrap::new(
        ConfigurationRegistry::new(),
        routes::api_route_table(),
        |databases| Arc::new(PostgresConnection::main(databases)) as Arc<dyn DatabaseConnection>,
    );

    let server = match bootstrap.run(&ProcessEnv).await {
        Ok(server) => server,
        Err(err) => {
            tracing::error!(
                source = "WebService",
                error = %err,
                "The web service could not be initialized."
            );
            return ExitCode::FAILURE;
        }
    };

    // --- Serve until signalled ---
    match server.wait().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(source = "WebService", error = %err, "Server stopped with an error");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` filters; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "raxel_api=debug,raxel_db=debug,raxel_core=debug,tower_http=info".into()
    });

    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
