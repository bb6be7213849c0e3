use lib::availability::availability_client::{JsonFileStore, RestClient};
use lib::availability::models;
use lib::availability::run_tool::run;

use clap::Parser;
use figment::{
    providers::{Env, Format, Json},
    Figment,
};
use log::{error, info};
use models::{Args, Config};

#[tokio::main]
async fn main() {
    /* Setup logging */
    env_logger::builder()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .init();

    /* Get all the required resources */
    let args = Args::parse();
    let config: Config = match Figment::new()
        .merge(Json::file(&args.config_json_path))
        .merge(Env::prefixed("AVAIL_"))
        .extract()
    {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to read configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        "Read config.json from {}",
        std::path::absolute(&args.config_json_path)
            .map(|path| path.display().to_string())
            .unwrap_or_else(|_| args.config_json_path.display().to_string())
    );

    /* Local file store when asked for, the REST API otherwise */
    let result = match &args.intervals_json_path {
        Some(path) => run(JsonFileStore::new(path.clone()), &args, config).await,
        None if config.api_base_url.is_empty() => {
            error!("api_base_url is not configured and no --intervals-json-path was given");
            std::process::exit(1);
        }
        None => {
            let client = RestClient::new(reqwest::Client::new(), &config);
            run(client, &args, config).await
        }
    };

    match result {
        Ok(report) => info!(
            "Done: {} pending interval(s), {} saved, {} publish change(s)",
            report.pending.len(),
            report.saved.as_ref().map_or(0, Vec::len),
            report.toggled.len()
        ),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
