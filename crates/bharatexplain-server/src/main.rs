//! BharatExplain — explains Bharat topics with category checks and autocomplete.

use std::path::PathBuf;
use std::sync::Arc;

use bharatexplain_classify::{SuggestionIndex, ValidationOutcome, Validator};
use bharatexplain_core::{ExplainConfig, TopicCategory};
use bharatexplain_server::{build_router, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn resolve_data_dir() -> PathBuf {
    std::env::var("BHARATEXPLAIN_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()));
            if let Some(dir) = exe_dir {
                let parent_data = dir.join("../data");
                if parent_data.exists() {
                    return parent_data;
                }
            }
            PathBuf::from("data")
        })
}

fn parse_category(arg: Option<&String>) -> anyhow::Result<TopicCategory> {
    let arg = arg.ok_or_else(|| anyhow::anyhow!("missing category"))?;
    Ok(arg.parse()?)
}

fn print_help() {
    println!("BharatExplain — complex Bharat topics, simplified");
    println!();
    println!("Usage: bharatexplain [command]");
    println!();
    println!("Commands:");
    println!("  (none)                       Start the server");
    println!("  validate <category> <topic>  Check a topic against a category");
    println!("  suggest <category> [text]    List autocomplete suggestions");
    println!("  help                         Show this help message");
    println!();
    println!("Categories: Exams, Laws, Policies, Tech, Tourism, Chatbot");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "validate" => {
                let category = parse_category(args.get(2))?;
                let topic = args[3.min(args.len())..].join(" ");
                match Validator::builtin().validate(&topic, category) {
                    ValidationOutcome::Valid => println!("valid"),
                    ValidationOutcome::Mismatch { message, .. } => {
                        println!("{}", message);
                        std::process::exit(2);
                    }
                }
                return Ok(());
            }
            "suggest" => {
                let category = parse_category(args.get(2))?;
                let partial = args[3.min(args.len())..].join(" ");
                let config = ExplainConfig::from_env(resolve_data_dir())?;
                for suggestion in SuggestionIndex::from_config(&config).suggest(category, &partial) {
                    println!("{}", suggestion);
                }
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'bharatexplain help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    // Normal server startup
    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = ExplainConfig::from_env(&data_dir)?;
    let port = config.port;

    let state = Arc::new(AppState::new(config));
    match state.resolve_target() {
        Some(target) => info!("Using {} ({})", target.provider, target.model),
        None => info!("No LLM provider configured; validation and suggestions only"),
    }

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("BharatExplain server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
