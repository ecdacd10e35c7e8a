use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about)]
#[command(propagate_version = true)]
/// Generates SAP HANA Cloud DDL scripts from data model files, and rebuilds DDL from catalog snapshots.
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate the full script of a model: schema, tables, indexes, views and relationships
    Generate {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Put foreign keys inside CREATE TABLE instead of separate ALTER TABLE statements
        #[arg(long, env = "HANA_DDL_INLINE_FOREIGN_KEYS")]
        inline_foreign_keys: bool,

        /// Leave CREATE INDEX statements out of the script
        #[arg(long)]
        no_indexes: bool,
    },
    /// Generate the CREATE VIEW statement of a single view entity
    GenerateView {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// The schema the view is created in
        #[arg(long, env = "HANA_DDL_SCHEMA")]
        schema: Option<String>,
    },
    /// Generate the CREATE SCHEMA statement of a model's container
    GenerateSchema {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the statements of a script the way they are sent to the database when it is applied
    Split {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Rebuild DDL from a catalog snapshot file
    Reconstruct {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// The file to read
    #[arg(long)]
    pub path: String,
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Write the script to this file instead of stdout
    #[arg(long)]
    pub output: Option<String>,
}

#[test]
fn verify_cli() {
    use clap::CommandFactory;
    Cli::command().debug_assert()
}
