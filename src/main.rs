// src/main.rs

use n8n_launcher::{cli, console, logging, run};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let code = match run_main().await {
        Ok(code) => code,
        Err(err) => {
            console::error(&format!("Startup failed: {err:#}"));
            1
        }
    };
    std::process::exit(code);
}

async fn run_main() -> anyhow::Result<i32> {
    cli::parse();
    logging::init_logging()?;
    Ok(run().await?)
}
