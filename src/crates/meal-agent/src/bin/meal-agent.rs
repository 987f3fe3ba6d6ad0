//! meal-agent - CLI entry point

use anyhow::{Context, Result};
use catalog::{extract_tags, item::normalize_tag, Catalog, MenuItem, SearchFilter};
use clap::{Parser, Subcommand};
use meal_agent::config::{AgentConfig, ConfigLoader, LlmProviderKind};
use meal_agent::logging::init_tracing;
use meal_agent::{prompt, MealAgent};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

const GREETING: &str = "Olá! Como posso ajudá-lo a encontrar uma refeição hoje?";

const DEMO_REQUESTS: [&str; 6] = [
    "Quero um prato apimentado, que tenha proteína",
    "Prato sem lactose de até R$55",
    "Refeição saudável com proteína, arroz e legumes",
    "Pratos veganos de até R$40",
    "Quero um almoço prático, sou intolerante a lactose",
    "Quero o prato mais barato",
];

/// Meal recommendation assistant
#[derive(Parser, Debug)]
#[command(name = "meal-agent")]
#[command(version)]
#[command(about = "Recommends dishes from a menu catalog", long_about = None)]
struct Args {
    /// Explicit configuration file (applied last)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Catalog file (overrides config)
    #[arg(long, global = true, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Use the built-in offline model
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer a single request
    Chat {
        /// The request, e.g. "Pratos veganos de até R$40"
        #[arg(value_name = "TEXT")]
        text: String,

        /// Print the decision trace to stderr
        #[arg(short, long)]
        verbose: bool,
    },
    /// Interactive session; type "sair" to quit
    Repl,
    /// Run the demonstration requests
    Demo,
    /// List the catalog tag vocabulary
    Tags,
    /// Query the catalog directly, without a model
    Search {
        /// Maximum price
        #[arg(long)]
        budget: Option<f64>,

        /// Required tag (repeatable)
        #[arg(long = "include", value_name = "TAG")]
        include: Vec<String>,

        /// Excluded tag (repeatable)
        #[arg(long = "exclude", value_name = "TAG")]
        exclude: Vec<String>,

        /// Ingredient hint; any one must match (repeatable)
        #[arg(long = "keyword", value_name = "WORD")]
        keyword: Vec<String>,
    },
    /// Show the catalog price range
    Range,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    let dotenv = dotenvy::dotenv();

    let args = Args::parse();
    let config = load_config(&args).await?;

    init_tracing(&config.logging);
    if let Ok(path) = dotenv {
        debug!(path = %path.display(), "Loaded .env");
    }
    info!(catalog = %config.catalog.path.display(), "Starting meal-agent");

    match args.command {
        Command::Chat { text, verbose } => {
            let agent = build_agent(&config)?;
            if verbose {
                match agent.run_turn(&text).await {
                    Ok(report) => {
                        eprintln!("{}", serde_json::to_string_pretty(&report)?);
                        println!("{}", report.reply);
                    }
                    Err(e) => {
                        eprintln!("error: {}", e);
                        println!("{}", prompt::apology(&e));
                    }
                }
            } else {
                println!("{}", agent.chat(&text).await);
            }
        }
        Command::Repl => {
            let agent = build_agent(&config)?;
            run_repl(&agent).await?;
        }
        Command::Demo => {
            let agent = build_agent(&config)?;
            if agent.is_offline() {
                println!("Modo demonstração: respostas geradas localmente, sem consultar a API.\n");
            }
            for request in DEMO_REQUESTS {
                println!("=== {} ===", request);
                println!("{}\n", agent.get_recommendation(request).await);
            }
        }
        Command::Tags => {
            let catalog = Catalog::load(&config.catalog.path);
            for tag in extract_tags(&catalog) {
                println!("{}", tag);
            }
        }
        Command::Search {
            budget,
            include,
            exclude,
            keyword,
        } => {
            let catalog = Catalog::load(&config.catalog.path);
            let filter = SearchFilter {
                budget,
                include_tags: include.iter().map(|t| normalize_tag(t)).collect(),
                exclude_tags: exclude.iter().map(|t| normalize_tag(t)).collect(),
                required_keywords: keyword,
            };

            let items = catalog
                .try_search(&filter)
                .context("Invalid search filter")?;
            if items.is_empty() {
                println!("Nenhum prato encontrado.");
            }
            for item in items {
                println!("{}", format_item(item));
            }
        }
        Command::Range => {
            let catalog = Catalog::load(&config.catalog.path);
            let range = catalog.price_range();
            println!("Pratos:  {}", range.total_items);
            println!("Mínimo:  R$ {:.2}", range.min_price);
            println!("Máximo:  R$ {:.2}", range.max_price);
            println!("Média:   R$ {:.2}", range.avg_price);
        }
    }

    Ok(())
}

/// Load layered configuration and apply command-line overrides.
async fn load_config(args: &Args) -> Result<AgentConfig> {
    let mut config = ConfigLoader::new()
        .load_with_override(args.config.as_deref())
        .await
        .context("Failed to load configuration")?;

    if let Some(path) = &args.catalog {
        config.catalog.path = path.clone();
    }
    if args.offline {
        config.llm.provider = LlmProviderKind::Offline;
    }

    Ok(config)
}

fn build_agent(config: &AgentConfig) -> Result<MealAgent> {
    MealAgent::from_config(config)
        .context("Could not start the agent (use --offline to run without an API key)")
}

async fn run_repl(agent: &MealAgent) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout.write_all(format!("{}\n", GREETING).as_bytes()).await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let request = line.trim();
        if request.is_empty() {
            continue;
        }
        if request.eq_ignore_ascii_case("sair") {
            break;
        }

        let reply = agent.chat(request).await;
        stdout.write_all(format!("{}\n\n", reply).as_bytes()).await?;
    }

    Ok(())
}

fn format_item(item: &MenuItem) -> String {
    let tags: Vec<&str> = item.tags().iter().map(String::as_str).collect();
    format!(
        "{:<32} R$ {:>7.2}  [{}]",
        item.name(),
        item.price(),
        tags.join(", ")
    )
}
