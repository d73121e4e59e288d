//! Project creation.
//! Validates the target, resolves the template context, materializes the
//! template and records the result in a fresh git repository.

use crate::command::CommandRunner;
use crate::config::Settings;
use crate::constants::{
    INITIAL_COMMIT_MESSAGE, LICENSE_FILE, MAIN_FILE, PACKAGE_DIR, STANDALONE_PACKAGE, TESTS_DIR,
};
use crate::context::{
    default_repository, is_valid_package_name, sanitize, title, ContextBuilder, ProjectValues,
    TemplateContext, AUTHOR, EMAIL, LICENSE, PACKAGE_NAME,
};
use crate::error::{Error, Result, VcsError};
use crate::license::{license_template, validate_license, LICENSE_NAMES};
use crate::loader::load_template;
use crate::processor::{ensure_output_dir, Processor, Written};
use crate::prompt::Prompter;
use crate::renderer::TokenRenderer;
use crate::tree::Node;
use crate::vcs::{Git, Identity};
use chrono::NaiveDate;
use log::{debug, warn};
use std::path::{Component, Path, PathBuf};

/// Steps of a single project creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Copying,
    VersionControlInit,
    Committing,
    Done,
    Failed,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Validating => "validating",
            Stage::Copying => "copying",
            Stage::VersionControlInit => "initializing version control",
            Stage::Committing => "committing",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Everything the user asked for.
#[derive(Debug, Clone)]
pub struct ProjectRequest {
    /// Directory name relative to the base directory, or `.` for the base itself.
    pub location: String,
    pub values: ProjectValues,
    /// Template directory overlaid on (or replacing) the bundled template.
    pub template_dir: Option<PathBuf>,
    pub git: bool,
    pub tests: bool,
    /// Skip prompts and the final confirmation.
    pub accept_defaults: bool,
}

impl ProjectRequest {
    pub fn new<S: Into<String>>(location: S) -> Self {
        Self {
            location: location.into(),
            values: ProjectValues::default(),
            template_dir: None,
            git: true,
            tests: true,
            accept_defaults: true,
        }
    }
}

/// Result of the version-control steps.
#[derive(Debug)]
pub enum VcsStatus {
    Committed,
    Skipped,
    /// Files were generated but the repository was not created.
    Failed { stage: Stage, error: VcsError },
}

/// A created project.
#[derive(Debug)]
pub struct Outcome {
    pub project_dir: PathBuf,
    pub context: TemplateContext,
    pub files: Vec<Written>,
    pub vcs: VcsStatus,
}

impl Outcome {
    /// Whether everything, including the initial commit, succeeded.
    pub fn is_complete(&self) -> bool {
        !matches!(self.vcs, VcsStatus::Failed { .. })
    }
}

/// Runs project creation from validation to the initial commit.
pub struct ProjectInitializer<'a, R: CommandRunner> {
    base_dir: PathBuf,
    settings: &'a Settings,
    prompt: &'a dyn Prompter,
    runner: R,
    git_program: Option<String>,
    today: NaiveDate,
    engine: TokenRenderer,
}

impl<'a, R: CommandRunner> ProjectInitializer<'a, R> {
    pub fn new<P: Into<PathBuf>>(
        base_dir: P,
        settings: &'a Settings,
        prompt: &'a dyn Prompter,
        runner: R,
    ) -> Self {
        Self {
            base_dir: base_dir.into(),
            settings,
            prompt,
            runner,
            git_program: None,
            today: chrono::Local::now().date_naive(),
            engine: TokenRenderer::new(),
        }
    }

    /// Uses `program` instead of searching `PATH` for git.
    pub fn git_program<S: Into<String>>(mut self, program: S) -> Self {
        self.git_program = Some(program.into());
        self
    }

    /// Fixes the date used for the `year` and `date` placeholders.
    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Creates one project.
    ///
    /// # Arguments
    /// * `request` - Location, values and options for the new project
    ///
    /// # Returns
    /// * `Result<Outcome>` - The project directory, its context, the written
    ///   entries and the version-control status
    ///
    /// # Errors
    /// * `Error::InvalidLocation` / `Error::OutputDirectoryNotEmpty` before anything is written
    /// * `Error::ValidationError` / `Error::UnknownLicense` for unusable values
    /// * `Error::Aborted` if the summary is not confirmed
    /// * `Error::WriteError` if copying fails part way through
    ///
    /// Version-control failures are not errors; they are reported in [`Outcome::vcs`].
    pub fn run(&self, request: &ProjectRequest) -> Result<Outcome> {
        let mut stage = Stage::Validating;
        debug!("Stage: {}", stage);
        match self.execute(request, &mut stage) {
            Ok(outcome) => {
                debug!("Stage: {}", Stage::Done);
                Ok(outcome)
            }
            Err(err) => {
                debug!("Stage: {} (while {})", Stage::Failed, stage);
                Err(err)
            }
        }
    }

    fn execute(&self, request: &ProjectRequest, stage: &mut Stage) -> Result<Outcome> {
        validate_location(&request.location)?;
        let project_dir = if request.location == "." {
            self.base_dir.clone()
        } else {
            self.base_dir.join(&request.location)
        };
        ensure_output_dir(&project_dir)?;
        println!("Creating a new project at {}", project_dir.display());

        let slug = project_slug(&project_dir, &request.location);
        let values = self.resolve_values(&slug, request)?;
        let context = ContextBuilder::new(slug, self.today).values(values).build();

        if !request.accept_defaults {
            print_summary(&context);
            if !self.prompt.confirm(false, "Is this correct?", true)? {
                return Err(Error::Aborted);
            }
        }

        advance(stage, Stage::Copying);
        let tree = self.build_tree(request, &context)?;
        let files = Processor::new(&self.engine, &context).materialize(&tree, &project_dir)?;
        println!("Generated {} entries in {}", files.len(), project_dir.display());

        let vcs = if request.git {
            self.commit(&project_dir, &context, stage)
        } else {
            VcsStatus::Skipped
        };

        Ok(Outcome { project_dir, context, files, vcs })
    }

    /// Asks for, or defaults, every value the command line left open.
    fn resolve_values(&self, slug: &str, request: &ProjectRequest) -> Result<ProjectValues> {
        let given = &request.values;

        let name = self.ask(request, &given.name, "Name of the Application?", || title(slug))?;
        let package_name = self.package_name(request, slug)?;
        let (homepage, repository) = if package_name == STANDALONE_PACKAGE {
            debug!("Standalone script, not asking for homepage or repository");
            (given.homepage.clone(), given.repository.clone())
        } else {
            let homepage = self.ask(request, &given.homepage, "Homepage URL?", String::new)?;
            let repository = self.ask(request, &given.repository, "Repository URL?", || {
                default_repository(&package_name)
            })?;
            (Some(homepage), Some(repository))
        };
        let description = self.ask(
            request,
            &given.description,
            "Description of the Application?",
            String::new,
        )?;
        let author = self.ask(request, &given.author, "Author Name?", || self.detect(AUTHOR))?;
        let email = self.ask(request, &given.email, "Author Email?", || self.detect(EMAIL))?;

        let license = match &given.license {
            Some(license) => validate_license(license)?.to_string(),
            None => {
                let default = validate_license(&self.settings.default_license)?;
                if request.accept_defaults {
                    default.to_string()
                } else {
                    let start = LICENSE_NAMES.iter().position(|l| *l == default).unwrap_or(0);
                    let index = self.prompt.select("Application License?", &LICENSE_NAMES, start)?;
                    LICENSE_NAMES.get(index).copied().unwrap_or(default).to_string()
                }
            }
        };

        Ok(ProjectValues {
            name: Some(name),
            package_name: Some(package_name),
            description: Some(description),
            author: Some(author),
            email: Some(email),
            license: Some(license),
            homepage,
            repository,
        })
    }

    /// A given value, the default when prompts are off, or the user's answer.
    /// `default` is only computed when the value is missing.
    fn ask<F>(
        &self,
        request: &ProjectRequest,
        value: &Option<String>,
        question: &str,
        default: F,
    ) -> Result<String>
    where
        F: FnOnce() -> String,
    {
        match value {
            Some(value) => Ok(value.clone()),
            None if request.accept_defaults => Ok(default()),
            None => self.prompt.text(question, &default()),
        }
    }

    /// Package name for the project. `-` selects the standalone script layout.
    /// Interactive answers are asked again until they are valid.
    fn package_name(&self, request: &ProjectRequest, slug: &str) -> Result<String> {
        let acceptable = |name: &str| name == STANDALONE_PACKAGE || is_valid_package_name(name);
        let invalid = |name: &str| {
            Error::ValidationError(format!(
                "package name '{name}' cannot contain dashes, dots or spaces"
            ))
        };

        if let Some(name) = &request.values.package_name {
            return if acceptable(name.as_str()) {
                Ok(name.clone())
            } else {
                Err(invalid(name.as_str()))
            };
        }
        let default = sanitize(slug);
        if request.accept_defaults {
            return if acceptable(default.as_str()) {
                Ok(default)
            } else {
                Err(invalid(default.as_str()))
            };
        }
        loop {
            let name = self
                .prompt
                .text("Package Name? (Use '-' for standalone script)", &default)?;
            if acceptable(name.as_str()) {
                return Ok(name);
            }
            println!("Package name '{name}' cannot contain dashes, dots or spaces, please try again.");
        }
    }

    /// Default author name or email: settings, then git, then the environment.
    fn detect(&self, token: &str) -> String {
        let (configured, git_key) = match token {
            AUTHOR => (&self.settings.author_name, "user.name"),
            _ => (&self.settings.author_email, "user.email"),
        };
        if !configured.is_empty() {
            return configured.clone();
        }
        if let Some(value) = self.git().ok().and_then(|git| git.config_value(git_key)) {
            return value;
        }
        if token == AUTHOR {
            for var in ["USER", "USERNAME"] {
                if let Ok(user) = std::env::var(var) {
                    return user;
                }
            }
        }
        String::new()
    }

    fn build_tree(&self, request: &ProjectRequest, context: &TemplateContext) -> Result<Node> {
        let custom = match &request.template_dir {
            Some(dir) => Some(dir.clone()),
            None => self.settings.template_folder.clone().filter(|dir| {
                let exists = dir.is_dir();
                if !exists {
                    warn!("Template folder '{}' does not exist, ignoring it", dir.display());
                }
                exists
            }),
        };
        let mut tree = load_template(self.settings.use_default_template, custom.as_deref())?;

        if !request.tests {
            debug!("Leaving out '{}'", TESTS_DIR);
            tree.remove(TESTS_DIR);
        }
        if context.get(PACKAGE_NAME) == Some(STANDALONE_PACKAGE) {
            debug!("Moving '{}' to the project root", MAIN_FILE);
            if let Some(package) = tree.remove(PACKAGE_DIR) {
                if let Some(main) = package.get(MAIN_FILE) {
                    tree.insert(MAIN_FILE, main.clone());
                }
            }
        }
        let license = context.get(LICENSE).unwrap_or_default();
        if let Some(text) = license_template(license)? {
            tree.insert(LICENSE_FILE, Node::file(text));
        }
        Ok(tree)
    }

    fn commit(
        &self,
        project_dir: &Path,
        context: &TemplateContext,
        stage: &mut Stage,
    ) -> VcsStatus {
        advance(stage, Stage::VersionControlInit);
        println!("Creating Git repository ...");
        let result = self.git().and_then(|git| {
            git.init(project_dir)?;
            advance(stage, Stage::Committing);
            let identity = Identity {
                name: context.get(AUTHOR).unwrap_or_default().to_string(),
                email: context.get(EMAIL).unwrap_or_default().to_string(),
            };
            git.commit_all(project_dir, INITIAL_COMMIT_MESSAGE, &identity)
        });
        match result {
            Ok(()) => VcsStatus::Committed,
            Err(error) => {
                warn!("Version control failed while {}: {}", stage, error);
                VcsStatus::Failed { stage: *stage, error }
            }
        }
    }

    fn git(&self) -> std::result::Result<Git<&R>, VcsError> {
        match &self.git_program {
            Some(program) => Ok(Git::with_program(&self.runner, program.as_str())),
            None => Git::locate(&self.runner),
        }
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug!("Stage: {} -> {}", stage, next);
    *stage = next;
}

/// The location must be `.` or one plain directory name.
///
/// # Errors
/// * `Error::InvalidLocation` naming the reason
pub fn validate_location(location: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidLocation {
        location: location.to_string(),
        reason: reason.to_string(),
    };
    if location.trim().is_empty() {
        return Err(invalid("the name is empty"));
    }
    if location == "." {
        return Ok(());
    }
    let mut components = Path::new(location).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => {}
        (Some(Component::ParentDir), None) => {
            return Err(invalid("it must not refer to the parent directory"))
        }
        _ => {
            return Err(invalid(
                "it must be a single directory name, relative to the current directory",
            ))
        }
    }
    if location.contains(['/', '\\']) || location.contains('\0') {
        return Err(invalid("it must not contain path separators"));
    }
    Ok(())
}

fn project_slug(project_dir: &Path, location: &str) -> String {
    project_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| location.to_string())
}

fn print_summary(context: &TemplateContext) {
    println!("\nCreating a New Python app with the below settings:\n");
    let padding = context.iter().map(|(key, _)| key.len()).max().unwrap_or(0) + 3;
    for (key, value) in context.iter() {
        println!("{:>padding$} : {}", title(key), value);
    }
    println!();
}
