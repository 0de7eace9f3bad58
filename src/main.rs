use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::Level;
use webwaddle::{AppBuilder, AppDependencies, Result};

/// Search the web and summarize the results with an LLM
#[derive(Debug, Parser)]
#[command(name = "webwaddle", version, about)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Chat model to use instead of the configured one
    #[arg(long, global = true, env = "WEBWADDLE_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search for a query and print a cited summary
    Search {
        query: String,

        #[command(flatten)]
        search: SearchArgs,

        /// Print the summary as it is generated
        #[arg(long)]
        stream: bool,
    },

    /// Expand a question into several searches and summarize them together
    Research {
        question: String,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Let the model decide whether to search before answering
    Ask {
        question: String,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Print the parsed search results as JSON
    Results {
        query: String,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Print the search queries generated for a question
    Queries { question: String },
}

#[derive(Debug, Args, Default)]
struct SearchArgs {
    /// Maximum number of search results to use
    #[arg(short = 'n', long)]
    max_results: Option<usize>,

    /// Keep the engine's snippets instead of fetching fuller text per result
    #[arg(long)]
    no_enrich: bool,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn builder(model: Option<String>, search: &SearchArgs) -> AppBuilder {
    AppBuilder::new()
        .with_model(model)
        .with_max_results(search.max_results)
        .with_enrich_snippets(search.no_enrich.then_some(false))
}

async fn stream_search(deps: &AppDependencies, query: &str) -> Result<()> {
    let results = deps.waddle.run_search(query).await?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let waddle = Arc::clone(&deps.waddle);
    let question = query.to_string();
    let task = tokio::spawn(async move { waddle.stream_summary(&results, &question, tx).await });

    let mut stdout = std::io::stdout();
    while let Some(chunk) = rx.recv().await {
        print!("{}", chunk);
        stdout.flush()?;
    }
    println!();

    match task.await {
        Ok(result) => result,
        Err(e) => Err(webwaddle::WebWaddleError::LlmError(format!(
            "summary task failed: {}",
            e
        ))),
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Search {
            query,
            search,
            stream,
        } => {
            let deps = builder(cli.model, &search).build()?;
            if stream {
                stream_search(&deps, &query).await?;
            } else {
                println!("{}", deps.waddle.answer(&query).await?);
            }
        }
        Command::Research { question, search } => {
            let deps = builder(cli.model, &search).build()?;
            println!("{}", deps.waddle.research(&question).await?);
        }
        Command::Ask { question, search } => {
            let deps = builder(cli.model, &search).build()?;
            println!("{}", deps.search_agent().answer(&question).await?);
        }
        Command::Results { query, search } => {
            let deps = builder(cli.model, &search).allow_missing_key(true).build()?;
            let results = deps.waddle.run_search(&query).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::Queries { question } => {
            let deps = builder(cli.model, &SearchArgs::default()).build()?;
            for query in deps.waddle.expand_queries(&question).await? {
                println!("{}", query);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!("webwaddle {}", webwaddle::version::version_string());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}
