//! Command-line interface implementation for Sprout.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

use crate::context::ProjectValues;
use crate::project::ProjectRequest;

/// Command-line arguments structure for Sprout.
#[derive(Parser, Debug)]
#[command(author, version, about = "Sprout: bootstrap a new Python application", long_about = None)]
pub struct Cli {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project from the template
    New(NewArgs),

    /// Show or change the saved settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Print the current settings
    Show,
    /// Answer questions to update the settings
    Change,
}

/// Arguments for `sprout new`.
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Directory to create, relative to the current directory ('.' for the current one)
    #[arg(value_name = "LOCATION")]
    pub location: String,

    /// Human readable application name
    #[arg(long)]
    pub name: Option<String>,

    /// Python package name (no dashes, dots or spaces), or '-' for a standalone script
    #[arg(long)]
    pub package_name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// License for the generated LICENSE.txt, or 'None'
    #[arg(long)]
    pub license: Option<String>,

    #[arg(long)]
    pub homepage: Option<String>,

    #[arg(long)]
    pub repository: Option<String>,

    /// Template directory to use on top of the bundled template
    #[arg(long, value_name = "DIR")]
    pub template: Option<PathBuf>,

    /// Do not create a git repository
    #[arg(long)]
    pub no_git: bool,

    /// Leave out the tests directory
    #[arg(long)]
    pub no_tests: bool,

    /// Accept defaults for everything not given on the command line
    #[arg(short, long)]
    pub yes: bool,
}

impl From<NewArgs> for ProjectRequest {
    fn from(args: NewArgs) -> Self {
        ProjectRequest {
            location: args.location,
            values: ProjectValues {
                name: args.name,
                package_name: args.package_name,
                description: args.description,
                author: args.author,
                email: args.email,
                license: args.license,
                homepage: args.homepage,
                repository: args.repository,
            },
            template_dir: args.template,
            git: !args.no_git,
            tests: !args.no_tests,
            accept_defaults: args.yes,
        }
    }
}

/// Parses command line arguments and returns the Cli structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Cli {
    match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if matches!(
                e.kind(),
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::MissingSubcommand
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                let _ = Cli::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
