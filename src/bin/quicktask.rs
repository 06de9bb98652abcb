use anyhow::{Context, Result};
use chrono::Local;
use quicktask::cli::{self, Command};
use quicktask::config::Config;
use quicktask::context::{AppContext, StandardContext};
use quicktask::controller::{ai_client_from_config, smart_parse};
use simplelog::{
    ColorChoice, CombinedLogger, LevelFilter, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::env;
use std::fs::File;

fn init_logging(ctx: &dyn AppContext) {
    let log_config = simplelog::Config::default();
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn,
        log_config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(path) = ctx.get_log_file_path()
        && let Ok(file) = File::create(&path)
    {
        loggers.push(WriteLogger::new(LevelFilter::Debug, log_config, file));
    }
    // Only fails if a logger is already installed.
    let _ = CombinedLogger::init(loggers);
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let cli = cli::parse_args(&args)?;
    let ctx = StandardContext::new(cli.root.clone());
    init_logging(&ctx);

    match cli.command {
        Command::Help => cli::print_help("quicktask"),
        Command::Config => {
            let path = Config::get_path_string(&ctx)?;
            if ctx.get_config_file_path()?.exists() {
                // Surface syntax errors early.
                Config::load(&ctx)?;
            } else {
                Config::default()
                    .save(&ctx)
                    .context("Failed to write default config")?;
                log::info!("Wrote default config to {}", path);
            }
            println!("{}", path);
        }
        Command::Parse {
            text,
            use_ai,
            now,
            json,
        } => {
            let config = Config::load_or_default(&ctx)?;
            // The one place the real clock is read.
            let now = now.unwrap_or_else(|| Local::now().naive_local());
            let ai = if use_ai {
                ai_client_from_config(&Config {
                    use_ai: true,
                    ..config
                })
            } else {
                ai_client_from_config(&config)
            };
            let parsed = smart_parse(&text, now, ai.as_ref()).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&parsed)?);
            } else {
                println!("{}", cli::render_parsed(&parsed, now));
            }
        }
    }
    Ok(())
}
