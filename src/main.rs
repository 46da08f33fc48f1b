// src/main.rs

use anyhow::Context;
use clap::Parser;
use docs2index::{
    CommandLineInput, DirectoryReader, Embedder, HttpEmbeddingClient, IngestionPipeline,
    MemoryVectorStore, PlatformHttpClient, RunConfig, RunOptions, SentenceSplitter, Transform,
};
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    Config,
};
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .build(Root::builder().appender("stdout").build(log_level))?;

    log4rs::init_config(config)?;
    Ok(())
}

/// The transform list for this run: split, then embed when an embeddings
/// backend is configured.
fn build_transforms(config: &RunConfig) -> Vec<Arc<dyn Transform>> {
    let mut transforms: Vec<Arc<dyn Transform>> = vec![Arc::new(SentenceSplitter::new(
        config.chunk_size,
        config.chunk_overlap,
    ))];

    match HttpEmbeddingClient::from_env() {
        Ok(client) => transforms.push(Arc::new(Embedder::new(Arc::new(client)))),
        Err(e) => log::warn!("running without an embedding step: {}", e),
    }

    transforms
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();
    setup_logging(cli.verbose).map_err(|e| anyhow::anyhow!("failed to set up logging: {}", e))?;

    let config = RunConfig::resolve(cli).context("invalid configuration")?;
    let reader = DirectoryReader::new(&config.input_dir).recursive(true);
    let transforms = build_transforms(&config);
    let store = Arc::new(MemoryVectorStore::new(config.collection.clone()));

    let mut builder = IngestionPipeline::builder()
        .name(config.pipeline_name.clone())
        .platform_config(config.platform.clone())
        .transforms(transforms)
        .reader(Arc::new(reader));
    if !config.remote {
        builder = builder.sink(store.clone());
    }
    let mut pipeline = builder.build().context("failed to build pipeline")?;

    if config.remote {
        let client =
            PlatformHttpClient::new(&config.platform).context("failed to build platform client")?;
        let execution_id = pipeline
            .run_remote(&client, &config.project_name)
            .await
            .context("remote execution failed")?;
        println!("{}", execution_id);
    } else {
        let options = RunOptions {
            show_progress: config.show_progress,
            ..RunOptions::default()
        };
        let nodes = pipeline
            .run_local(&options)
            .await
            .context("local run failed")?;
        log::info!(
            "processed {} nodes, {} stored in collection '{}'",
            nodes.len(),
            store.len(),
            config.collection
        );
    }

    Ok(())
}
