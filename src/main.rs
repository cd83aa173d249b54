use amcolor::core::log::init_logging;
use amcolor::core::RecordField;
use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Field {
    Json,
    Primary,
    Secondary,
    Name,
    Amc,
    Logo,
}

impl From<Field> for RecordField {
    fn from(field: Field) -> RecordField {
        match field {
            Field::Json => RecordField::Json,
            Field::Primary => RecordField::Primary,
            Field::Secondary => RecordField::Secondary,
            Field::Name => RecordField::Name,
            Field::Amc => RecordField::Amc,
            Field::Logo => RecordField::Logo,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Resolve ISINs to their AMC colors and logo
    Lookup {
        /// One or more 12-character ISINs
        #[arg(required = true)]
        isins: Vec<String>,
        /// Print a single field per ISIN instead of a table
        #[arg(short, long, value_enum)]
        field: Option<Field>,
    },
    /// Detect the AMC for a fund name
    Detect {
        /// Fund display name
        fund_name: String,
    },
    /// Print the generated color pair for a name
    Color {
        /// AMC or label name
        name: String,
    },
    /// Serve the HTTP API
    Serve {
        /// Address to bind, overrides the configured one
        #[arg(short, long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config_path = cli.config_path.as_deref();
    let result = match cli.command {
        Some(Commands::Setup) => amcolor::cli::setup::setup(),
        Some(Commands::Color { name }) => {
            println!("{}", amcolor::cli::detect::color_output(&name));
            Ok(())
        }
        Some(Commands::Lookup { isins, field }) => {
            let command = amcolor::AppCommand::Lookup {
                isins,
                field: field.map(RecordField::from),
            };
            amcolor::run_command(command, config_path).await
        }
        Some(Commands::Detect { fund_name }) => {
            amcolor::run_command(amcolor::AppCommand::Detect { fund_name }, config_path).await
        }
        Some(Commands::Serve { bind }) => {
            amcolor::run_command(amcolor::AppCommand::Serve { bind }, config_path).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
