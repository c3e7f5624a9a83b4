use ledger_recalc::{api, config::Config, db::init_db, Recalculator, Repository, TracingNotifier};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match init_db(&config.database_path).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    let repo = Arc::new(Repository::new(pool));
    match repo.count_transactions().await {
        Ok(counts) => tracing::info!(
            subaccounts = counts.len(),
            transactions = counts.iter().map(|(_, n)| n).sum::<i64>(),
            "Ledger loaded"
        ),
        Err(e) => tracing::warn!(error = %e, "Could not count ledger rows"),
    }

    let recalculator =
        Arc::new(Recalculator::new(repo).with_concurrency(config.recalc_concurrency));
    let state = api::AppState::new(recalculator, config.clone(), Arc::new(TracingNotifier));
    let app = api::create_router(state);

    let addr = SocketAddr::new(config.bind_addr, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        %addr,
        mode = %config.recalc_mode,
        tolerance = %config.drift_tolerance,
        "Ledger recalculation service listening"
    );

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
