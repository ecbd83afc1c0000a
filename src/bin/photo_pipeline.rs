//! Runs HDR tone mapping and then pastes a masked image into the result with
//! Poisson editing, writing every stage to the output directory.

use rust_cv_photo::{init_thread_pool, run_poisson_editing, run_tone_mapping, PipelineConfig};
use std::env;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        println!("Usage: {} [config.json]", args[0]);
        return Ok(());
    }

    let config = match args.get(1) {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    let threads = init_thread_pool(config.threads)?;
    tracing::info!(
        threads,
        "writing results to {}",
        config.output_dir.display()
    );

    let tone_mapped = run_tone_mapping(&config)?;
    run_poisson_editing(&config, &tone_mapped)?;

    tracing::info!("All done!");
    Ok(())
}
