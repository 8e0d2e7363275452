//! bacprep server binary.

use clap::Parser;

use bacprep_core::store::{MemStore, StudyStore};
use bacprep_providers::{create_model, ProviderConfig};
use bacprep_server::{create_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "bacprep-server", version, about = "Bacalaureat exam-prep backend")]
struct Args {
    /// The address to bind to.
    #[arg(short, long, env = "BACPREP_ADDRESS", default_value = "127.0.0.1:3000")]
    address: String,

    /// Load the demo fixture set at startup.
    #[arg(long)]
    seed_demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bacprep=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let model = create_model(&ProviderConfig::from_env());

    let mut store = MemStore::new();
    if args.seed_demo {
        store.initialize_demo_data();
    }

    let state = AppState::new(Box::new(store), model);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&args.address).await?;
    tracing::info!(address = %args.address, "bacprep server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
