use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hdhomerun_epg::{
    config::Config,
    ingestor::SchedulerService,
    services::EpgExportService,
    sources::{GuideSource, HdHomeRunClient},
    web::WebServer,
};

#[derive(Parser)]
#[command(name = "hdhomerun-epg")]
#[command(version)]
#[command(about = "Extracts the HDHomeRun guide to XMLTV and serves it over HTTP")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract the guide once and write the XMLTV file
    Fetch {
        /// HDHomeRun host name or IP address
        #[arg(long, value_name = "HOST")]
        host: Option<String>,

        /// Output XMLTV file
        #[arg(long, value_name = "FILE")]
        filename: Option<PathBuf>,

        /// Days of guide data to fetch
        #[arg(long)]
        days: Option<u32>,

        /// Hours between windowed guide requests
        #[arg(long)]
        hours: Option<u32>,

        /// Extraction logging detail (overrides --log-level)
        #[arg(long, value_enum)]
        debug: Option<DebugMode>,
    },
    /// Serve the XMLTV file and refresh it on a schedule
    Serve {
        /// Listening IP address
        #[arg(short = 'H', long, value_name = "IP")]
        host: Option<String>,

        /// Listening port
        #[arg(short, long, value_name = "PORT")]
        port: Option<u16>,

        /// HDHomeRun host name or IP address
        #[arg(long, value_name = "HOST")]
        device_host: Option<String>,

        /// Only serve the existing file, never fetch
        #[arg(long)]
        no_schedule: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DebugMode {
    On,
    Full,
    Off,
}

impl DebugMode {
    fn log_level(self) -> &'static str {
        match self {
            DebugMode::On => "info",
            DebugMode::Full => "debug",
            DebugMode::Off => "warn",
        }
    }
}

fn init_logging(level: &str) {
    let log_filter = if level == "trace" {
        format!("hdhomerun_epg={},tower_http=trace", level)
    } else {
        format!("hdhomerun_epg={}", level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match &cli.command {
        Command::Fetch {
            debug: Some(mode), ..
        } => mode.log_level().to_string(),
        _ => cli.log_level.clone(),
    };
    init_logging(&level);

    info!("Starting HDHomeRun EPG v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    match cli.command {
        Command::Fetch {
            host,
            filename,
            days,
            hours,
            ..
        } => {
            if let Some(host) = host {
                config.device.host = host;
            }
            if let Some(filename) = filename {
                config.output.path = filename;
            }
            if let Some(days) = days {
                config.guide.days = days;
            }
            if let Some(hours) = hours {
                config.guide.hours_increment = hours;
            }
            config.validate()?;
            fetch(Arc::new(config)).await
        }
        Command::Serve {
            host,
            port,
            device_host,
            no_schedule,
        } => {
            if let Some(host) = host {
                config.web.host = host;
            }
            if let Some(port) = port {
                config.web.port = port;
            }
            if let Some(device_host) = device_host {
                config.device.host = device_host;
            }
            config.validate()?;
            serve(Arc::new(config), !no_schedule).await
        }
    }
}

async fn fetch(config: Arc<Config>) -> Result<()> {
    let source: Arc<dyn GuideSource> = Arc::new(HdHomeRunClient::new(
        &config.device,
        config.guide.synopsis_length,
    )?);
    let export = EpgExportService::new(config, source);

    let summary = export.run().await?;
    info!(
        "Wrote {} channels and {} programmes ({} bytes) to {}",
        summary.channels,
        summary.programmes,
        summary.bytes,
        summary.path.display()
    );
    Ok(())
}

async fn serve(config: Arc<Config>, schedule: bool) -> Result<()> {
    if schedule {
        let source: Arc<dyn GuideSource> = Arc::new(HdHomeRunClient::new(
            &config.device,
            config.guide.synopsis_length,
        )?);
        let export = Arc::new(EpgExportService::new(config.clone(), source));
        let scheduler = SchedulerService::new(export, &config.schedule)?;

        tokio::spawn(async move {
            if let Err(e) = scheduler.start().await {
                error!("Scheduler service failed: {}", e);
            }
        });
    } else {
        info!("Scheduling disabled, serving {}", config.output.path.display());
    }

    let lineup_source: Arc<dyn GuideSource> = Arc::new(HdHomeRunClient::with_timeout(
        &config.device,
        config.guide.synopsis_length,
        config.device.lineup_timeout(),
    )?);
    let web_server = WebServer::new(config, lineup_source)?;

    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );
    web_server.serve().await?;

    Ok(())
}
