use clap::Parser;
use object_router::config::{Mode, Options};
use object_router::routing::input::open_requests;
use object_router::routing::router::ObjectRouter;
use object_router::storage::handlers::worker_app;
use object_router::storage::memory::WorkerStore;
use std::sync::Arc;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries result lines, logs go to stderr.
    tracing_subscriber::fmt()
        // .with_max_level(tracing::Level::DEBUG)
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let opts = Options::parse();

    match opts.mode {
        Mode::Worker => run_worker(&opts).await,
        Mode::Router => run_router(&opts).await,
    }
}

async fn run_worker(opts: &Options) -> anyhow::Result<()> {
    let config = opts.worker_config();
    tracing::info!("Run worker {} on {}", config.worker_id, config.bind_addr);

    let store = Arc::new(WorkerStore::new(config.worker_id));
    let app = worker_app(store);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn run_router(opts: &Options) -> anyhow::Result<()> {
    let (config, file) = opts.router_config()?;
    let requests = open_requests(&file)?;

    let (sink, mut lines) = mpsc::unbounded_channel::<String>();
    let printer = tokio::spawn(async move {
        let mut out = BufWriter::new(tokio::io::stdout());
        while let Some(line) = lines.recv().await {
            out.write_all(line.as_bytes()).await?;
            out.write_all(b"\n").await?;
        }
        out.flush().await
    });

    let mut router = ObjectRouter::new(&config, sink)?;
    let report = router.run(requests).await;
    // Dropping the router closes the sink so the printer can finish.
    drop(router);
    printer.await??;

    let report = report?;
    for load in &report.loads {
        tracing::info!("Bucket id: {}, bytes: {}", load.bucket, load.load_bytes);
    }
    if !report.failures.is_empty() {
        let unconfirmed = report.unconfirmed_request_ids();
        tracing::warn!(
            "{} batches failed, {} requests unconfirmed: {}",
            report.failures.len(),
            unconfirmed.len(),
            unconfirmed.join(",")
        );
    }
    tracing::info!(
        "Routed {} requests in {} flushes, {} results confirmed",
        report.processed,
        report.flushes,
        report.confirmed
    );
    tracing::info!("{:?}", report.elapsed);

    Ok(())
}
