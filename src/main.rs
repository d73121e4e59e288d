//! Sprout's main application entry point.
//! Parses arguments, loads settings and dispatches to project creation or
//! settings management.

use std::path::PathBuf;

use sprout::{
    cli::{get_args, Command, ConfigCommand, NewArgs},
    command::SystemRunner,
    config::{change_settings, default_config_path, load_settings, save_settings},
    constants::EXIT_VCS_ERROR,
    error::{default_error_handler, Error, Result},
    project::{Outcome, ProjectInitializer, ProjectRequest, VcsStatus},
    prompt::{DefaultsPrompter, DialoguerPrompter, Prompter},
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Warn
        })
        .init();

    let result = match args.command {
        Command::New(new_args) => run_new(new_args),
        Command::Config(config_command) => run_config(config_command),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => default_error_handler(err),
    }
}

fn settings_path() -> Result<PathBuf> {
    default_config_path()
        .ok_or_else(|| Error::ConfigError("cannot determine the configuration directory".into()))
}

/// Creates the project and returns the process exit code.
fn run_new(args: NewArgs) -> Result<i32> {
    let settings = load_settings(settings_path()?)?;
    let request = ProjectRequest::from(args);
    let prompt: Box<dyn Prompter> = if request.accept_defaults {
        Box::new(DefaultsPrompter)
    } else {
        Box::new(DialoguerPrompter::new())
    };

    let base_dir = std::env::current_dir()?;
    let initializer = ProjectInitializer::new(base_dir, &settings, &*prompt, SystemRunner);
    let outcome = initializer.run(&request)?;

    match &outcome.vcs {
        VcsStatus::Committed => println!("Created Git repository with the initial commit."),
        VcsStatus::Skipped => {}
        VcsStatus::Failed { error, .. } => {
            eprintln!("Warning: the project was generated but version control failed: {error}");
            eprintln!("Run 'git init' in {} to set it up manually.", outcome.project_dir.display());
        }
    }
    print_next_steps(&outcome, &request.location);

    Ok(if outcome.is_complete() { 0 } else { EXIT_VCS_ERROR })
}

fn print_next_steps(outcome: &Outcome, location: &str) {
    println!("\nProject created successfully.\n");
    println!("Next steps:\n");
    let mut step = 1;
    if location != "." {
        println!("    {step}) Change to the project directory:\n        'cd {location}'");
        step += 1;
    }
    println!("    {step}) Install the dependencies (creates a virtual environment):");
    println!("        'poetry install'");
    println!("    {}) Install the pre-commit hooks:", step + 1);
    println!("        'poetry run pre-commit install'");
    println!("    {}) Run the application:", step + 2);
    println!(
        "        'poetry run {}'",
        outcome.context.get(sprout::context::PROJECT_SLUG).unwrap_or(location)
    );
    println!("\nSee the README.md file for more information.");
}

fn run_config(command: ConfigCommand) -> Result<i32> {
    let path = settings_path()?;
    let settings = load_settings(&path)?;
    match command {
        ConfigCommand::Show => {
            println!("Settings from {}\n", path.display());
            let rows = settings.rows();
            let padding = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
            for (key, value) in rows {
                println!("{key:>padding$} : {value}");
            }
        }
        ConfigCommand::Change => {
            let updated = change_settings(&DialoguerPrompter::new(), settings)?;
            save_settings(&path, &updated)?;
            println!("Settings saved to {}", path.display());
        }
    }
    Ok(0)
}
