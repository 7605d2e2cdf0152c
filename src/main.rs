use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use flowerbed::{
    config::{GardenConfig, GardenLoader},
    snapshot::SnapshotWriter,
    web::{self, WebServerConfig},
    Garden,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Procedural pixel flower generator")]
struct Cli {
    /// Path to the garden preset YAML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the preset seed
    #[arg(long)]
    seed: Option<u64>,

    /// Number of flowers per batch
    #[arg(long)]
    count: Option<usize>,

    /// How many consecutive batches to write
    #[arg(long, default_value_t = 1)]
    batches: u64,

    /// Directory for rendered batches
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Print the compact JSON of each batch instead of writing files
    #[arg(long)]
    json: bool,

    /// Serve the gallery instead of writing files
    #[arg(long)]
    serve: bool,

    /// List the batches already written for this garden
    #[arg(long)]
    list: bool,

    /// Re-render a previously written batch directory into the output dir
    #[arg(long, value_name = "BATCH_DIR")]
    rerender: Option<PathBuf>,

    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut garden = match &cli.config {
        Some(path) => GardenLoader::new(".").load(path)?,
        None => GardenConfig::default(),
    };
    if let Some(seed) = cli.seed {
        garden.seed = seed;
    }
    if let Some(count) = cli.count {
        garden.batch_size = count;
    }
    if let Some(dir) = cli.out_dir {
        garden.output_dir = dir;
    }
    if let Some(host) = cli.host {
        garden.web.host = host;
    }
    if let Some(port) = cli.port {
        garden.web.port = port;
    }
    garden.validate()?;

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&garden.logging.level)),
        )
        .init();

    if cli.serve {
        return web::run(WebServerConfig {
            garden_name: garden.name,
            seed: garden.seed,
            batch_size: garden.batch_size,
            display_scale: garden.display_scale,
            host: garden.web.host,
            port: garden.web.port,
        })
        .await;
    }

    let writer = SnapshotWriter::new(&garden.output_dir, garden.display_scale);

    if cli.list {
        for dir in writer.list_batches(&garden.name)? {
            let metadata = writer
                .load_metadata(&dir)
                .with_context(|| format!("Failed to read {}", dir.display()))?;
            println!(
                "{}\tseed {}\tbatch {}\t{} flowers\t{}",
                dir.display(),
                metadata.seed,
                metadata.serial,
                metadata.flower_count,
                metadata.timestamp
            );
        }
        return Ok(());
    }

    if let Some(source) = &cli.rerender {
        let (metadata, batch) = writer
            .load_batch(source)
            .with_context(|| format!("Failed to load batch from {}", source.display()))?;
        let dir = writer.write(&metadata.garden, metadata.seed, &batch)?;
        info!(from = %source.display(), to = %dir.display(), "re-rendered batch");
        return Ok(());
    }

    let mut flowers = Garden::new(garden.seed, garden.batch_size);
    for round in 0..cli.batches {
        if round > 0 {
            flowers.regenerate();
        }
        let batch = flowers.current();
        if cli.json {
            println!("{}", batch.to_json()?);
        } else {
            writer.write(&garden.name, garden.seed, batch)?;
        }
    }

    info!(
        garden = %garden.name,
        seed = garden.seed,
        batches = cli.batches,
        "done"
    );
    Ok(())
}
