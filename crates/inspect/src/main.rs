use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use kdom_gate::{ContentType, Resolver};
use kdom_inspect::{InspectConfig, Mode, inspect, load_json};

#[derive(Parser)]
#[command(
    name = "kdom-inspect",
    about = "Show what a user may do with a K-Dom page, post or comment"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the capability result.
    Resolve(InputArgs),
    /// Print the result with the rules that matched.
    Explain(InputArgs),
    /// Print the actions the user may take.
    Actions(InputArgs),
}

#[derive(Args)]
struct InputArgs {
    /// Acting user JSON (`{"id": 5, "globalRole": "user", "isAuthenticated": true}`). Omit for a guest.
    #[arg(long)]
    user: Option<PathBuf>,

    /// Raw content item JSON as returned by the REST API.
    #[arg(long)]
    resource: PathBuf,

    /// Content type of the resource: page, post or comment.
    #[arg(long = "type", default_value = "page")]
    content_type: String,
}

fn main() -> ExitCode {
    kdom_observability::init();

    let cli = Cli::parse();
    let (mode, args) = match cli.command {
        Command::Resolve(args) => (Mode::Resolve, args),
        Command::Explain(args) => (Mode::Explain, args),
        Command::Actions(args) => (Mode::Actions, args),
    };

    match run(mode, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "inspection failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(mode: Mode, args: &InputArgs) -> anyhow::Result<()> {
    let config = InspectConfig::from_env()?;
    let resolver = Resolver::new(config.policy);

    let content_type: ContentType = args
        .content_type
        .parse()
        .context("invalid --type")?;
    let user = args.user.as_deref().map(load_json).transpose()?;
    let resource = load_json(&args.resource)?;

    let output = inspect(&resolver, mode, user.as_ref(), &resource, content_type)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
