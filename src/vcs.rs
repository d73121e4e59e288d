//! Git repository creation for generated projects.
use crate::command::{CommandOutput, CommandRunner, ExternalCommand};
use crate::error::VcsError;
use log::debug;
use std::path::Path;

/// Who the initial commit is attributed to. Empty fields are left to git's
/// own configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

/// Thin wrapper over the `git` binary.
pub struct Git<R: CommandRunner> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> Git<R> {
    /// Finds `git` in `PATH`.
    pub fn locate(runner: R) -> Result<Self, VcsError> {
        let program = which::which("git").map_err(|_| VcsError::Unavailable)?;
        debug!("Using git at '{}'", program.display());
        Ok(Self::with_program(runner, program.to_string_lossy()))
    }

    pub fn with_program<S: Into<String>>(runner: R, program: S) -> Self {
        Self { runner, program: program.into() }
    }

    /// Runs `git init` in `dir`.
    ///
    /// # Errors
    /// * `VcsError::Spawn` if git cannot be started
    /// * `VcsError::CommandFailed` with git's stderr on a non-zero exit
    pub fn init<P: AsRef<Path>>(&self, dir: P) -> Result<(), VcsError> {
        self.exec(self.command(["init"]).current_dir(dir)).map(|_| ())
    }

    /// Stages everything in `dir` and records one commit.
    ///
    /// # Arguments
    /// * `dir` - Repository working tree
    /// * `message` - Commit message
    /// * `identity` - Author and committer; empty fields fall back to git's configuration
    ///
    /// # Errors
    /// * `VcsError::Spawn` / `VcsError::CommandFailed` from `add` or `commit`
    pub fn commit_all<P: AsRef<Path>>(
        &self,
        dir: P,
        message: &str,
        identity: &Identity,
    ) -> Result<(), VcsError> {
        let dir = dir.as_ref();
        self.exec(self.command(["add", "-A"]).current_dir(dir))?;

        let mut commit = self.command(["commit", "--quiet", "-m", message]).current_dir(dir);
        if !identity.name.is_empty() {
            commit = commit
                .env("GIT_AUTHOR_NAME", identity.name.as_str())
                .env("GIT_COMMITTER_NAME", identity.name.as_str());
        }
        if !identity.email.is_empty() {
            commit = commit
                .env("GIT_AUTHOR_EMAIL", identity.email.as_str())
                .env("GIT_COMMITTER_EMAIL", identity.email.as_str());
        }
        self.exec(commit).map(|_| ())
    }

    /// Reads a global git setting such as `user.name`; `None` when unset.
    pub fn config_value(&self, key: &str) -> Option<String> {
        let output = self.exec(self.command(["config", "--get", key])).ok()?;
        let value = output.stdout.trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    fn command<const N: usize>(&self, args: [&str; N]) -> ExternalCommand {
        ExternalCommand::new(self.program.as_str()).args(args)
    }

    fn exec(&self, command: ExternalCommand) -> Result<CommandOutput, VcsError> {
        let subcommand = command.args.join(" ");
        let output = self
            .runner
            .run(&command)
            .map_err(|source| VcsError::Spawn { command: subcommand.clone(), source })?;
        if !output.success() {
            return Err(VcsError::CommandFailed {
                command: subcommand,
                status: output.status(),
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io;

    /// Records commands; fails the subcommand named in `fail_on`.
    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<ExternalCommand>>,
        fail_on: Option<&'static str>,
        stdout: &'static str,
    }

    impl CommandRunner for Recorder {
        fn run(&self, command: &ExternalCommand) -> io::Result<CommandOutput> {
            self.calls.borrow_mut().push(command.clone());
            let failed = self.fail_on.is_some_and(|sub| command.args[0] == sub);
            Ok(CommandOutput {
                code: Some(if failed { 1 } else { 0 }),
                stdout: self.stdout.to_string(),
                stderr: if failed { "boom\n".to_string() } else { String::new() },
            })
        }
    }

    #[test]
    fn test_init_and_commit_sequence() {
        let recorder = Recorder::default();
        let git = Git::with_program(&recorder, "git");
        let identity = Identity { name: "Ada".into(), email: String::new() };

        git.init("/tmp/demo").unwrap();
        git.commit_all("/tmp/demo", "Initial Commit", &identity).unwrap();

        let calls = recorder.calls.borrow();
        let lines: Vec<String> = calls.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            ["git init", "git add -A", "git commit --quiet -m Initial Commit"]
        );
        assert!(calls.iter().all(|c| c.cwd.as_deref() == Some(Path::new("/tmp/demo"))));
        assert_eq!(
            calls[2].env,
            [
                ("GIT_AUTHOR_NAME".to_string(), "Ada".to_string()),
                ("GIT_COMMITTER_NAME".to_string(), "Ada".to_string()),
            ]
        );
    }

    #[test]
    fn test_failure_reports_stderr() {
        let recorder = Recorder { fail_on: Some("commit"), ..Default::default() };
        let git = Git::with_program(&recorder, "git");
        let err = git.commit_all("/tmp/demo", "msg", &Identity::default()).unwrap_err();
        match err {
            VcsError::CommandFailed { command, status, stderr } => {
                assert!(command.starts_with("commit"));
                assert_eq!(status, "status 1");
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_config_value() {
        let recorder = Recorder { stdout: "Ada Lovelace\n", ..Default::default() };
        let git = Git::with_program(&recorder, "git");
        assert_eq!(git.config_value("user.name").as_deref(), Some("Ada Lovelace"));

        let empty = Recorder::default();
        assert_eq!(Git::with_program(&empty, "git").config_value("user.name"), None);
    }
}
