use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Result;
use clap::Parser;
use dotenv::{dotenv, var};
use std::sync::Arc;
use std::time::Duration;
use tickerboard_web::{cli::Cli, cors, routes};
use tickerboard_yahoo::{MarketData, YahooConfig, YahooFinance};
use tracing::{info, trace, Level};

fn preprocess(trace_level: Level) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(trace_level)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // .env first, so clap can read flags from the environment
    dotenv().ok();
    let cli = Cli::parse();
    preprocess(cli.trace.into())?;
    trace!("Command line input recorded: {cli:#?}");

    // upstream client, shared by every worker
    let mut config = YahooConfig {
        timeout: Duration::from_secs(cli.timeout),
        ..Default::default()
    };
    if let Ok(user_agent) = var("USER_AGENT") {
        config.user_agent = user_agent;
    }
    let upstream: Arc<dyn MarketData> = Arc::new(YahooFinance::new(config)?);
    let upstream = web::Data::from(upstream);
    let watchlist = web::Data::new(cli.tickers);

    info!(
        "Serving {} tickers on http://{}:{}",
        watchlist.len(),
        cli.host,
        cli.port
    );

    // run server
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(cors())
            .app_data(watchlist.clone())
            .app_data(upstream.clone())
            .configure(routes)
    })
    .bind((cli.host.as_str(), cli.port))?
    .run()
    .await?;

    Ok(())
}
