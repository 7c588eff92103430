use clap::Parser;
use log::{error, info};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use kitchen_import::{
    parse_recipe_markdown, ImportError, ImportOutcome, IngredientPolicy, MemoryStore,
    RecipeImporter,
};

#[derive(Parser)]
#[command(
    name = "kitchen-import",
    version,
    about = "Import markdown recipes into the kitchen manager"
)]
struct Cli {
    /// Recipe file to import, or `-` for stdin
    input: PathBuf,

    /// Parse and print the recipes without importing them
    #[arg(long)]
    check: bool,

    /// Import into an in-memory store instead of the configured backend
    #[arg(long)]
    dry_run: bool,

    /// Ingredient policy: `linked` creates missing inventory rows, `unlinked` stores names only
    #[arg(long)]
    policy: Option<IngredientPolicy>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, ImportError> {
    let text = if cli.input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        tokio::fs::read_to_string(&cli.input).await?
    };

    if cli.check {
        let recipes = parse_recipe_markdown(&text);
        if cli.json {
            println!("{}", to_json(&recipes)?);
        } else {
            for recipe in &recipes {
                println!("{}", recipe.to_markdown());
            }
            println!("{} recipe(s) parsed", recipes.len());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut builder = RecipeImporter::builder().text(text);
    if let Some(policy) = cli.policy {
        builder = builder.policy(policy);
    }
    if cli.dry_run {
        info!("Dry run: importing into memory store");
        // Config still comes from kitchen.toml / KITCHEN__*; a bad one fails the run
        builder = builder.store(Arc::new(MemoryStore::new()));
    }

    let summary = match builder.build().await? {
        ImportOutcome::Imported(summary) => summary,
        ImportOutcome::Parsed(_) => {
            return Err(ImportError::BuilderError(
                "Builder returned parsed recipes for an import run".to_string(),
            ))
        }
    };

    if cli.json {
        println!("{}", to_json(&summary)?);
    } else {
        for result in &summary.results {
            let status = if result.success { "ok" } else { "FAILED" };
            println!("[{}] {}", status, result.recipe_name);
            for warning in &result.warnings {
                println!("    warning: {}", warning);
            }
            if let Some(error) = &result.error {
                println!("    error: {}", error);
            }
        }
        println!(
            "{} imported, {} failed",
            summary.succeeded, summary.failed
        );
    }

    Ok(if summary.is_complete_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ImportError> {
    Ok(serde_json::to_string_pretty(value)?)
}
