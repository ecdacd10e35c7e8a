use crate::cli::{Commands, OutputArgs};
use clap::Parser;
use hana_ddl::{
    generate_container_script, generate_script_from_json, generate_view_script, split_statements, CatalogSnapshot,
    ForeignKeyPlacement, Result, ScriptOptions,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    run(cli).await?;

    Ok(())
}

#[instrument(skip_all)]
async fn run(cli: cli::Cli) -> Result<()> {
    match cli.command {
        Commands::Generate {
            input,
            output,
            inline_foreign_keys,
            no_indexes,
        } => {
            let model = tokio::fs::read_to_string(&input.path).await?;
            let options = ScriptOptions {
                foreign_key_placement: if inline_foreign_keys {
                    ForeignKeyPlacement::Inline
                } else {
                    ForeignKeyPlacement::AlterStatements
                },
                include_indexes: !no_indexes,
                ..Default::default()
            };

            let script = generate_script_from_json(&model, &options)?;
            write_output(&output, &script).await?;
        }
        Commands::GenerateView { input, output, schema } => {
            let view = tokio::fs::read_to_string(&input.path).await?;
            let script = generate_view_script(&view, schema.as_deref())?;
            write_output(&output, &script).await?;
        }
        Commands::GenerateSchema { input, output } => {
            let model = tokio::fs::read_to_string(&input.path).await?;
            let script = generate_container_script(&model)?;
            write_output(&output, &script).await?;
        }
        Commands::Split { input } => {
            let script = tokio::fs::read_to_string(&input.path).await?;
            for statement in split_statements(&script) {
                println!("{statement};\n");
            }
        }
        Commands::Reconstruct { input, output } => {
            let snapshot = tokio::fs::read_to_string(&input.path).await?;
            let snapshot: CatalogSnapshot = serde_json::from_str(&snapshot)?;
            write_output(&output, &snapshot.get_script()).await?;
        }
    }

    Ok(())
}

async fn write_output(output: &OutputArgs, script: &str) -> Result<()> {
    match &output.output {
        Some(path) => {
            tokio::fs::write(path, script).await?;
            info!(path = %path, "Script written");
        }
        None => println!("{script}"),
    }

    Ok(())
}
