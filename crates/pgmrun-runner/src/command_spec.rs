use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use tokio::process::Command as TokioCommand;

// ============================================================================
// CommandSpec - argv-style command description
// ============================================================================

/// Specification for an external command.
///
/// Arguments are stored as `Vec<OsString>`, never as a shell string. Drivers build
/// specs argument by argument, so a data path such as `runs/my data/alarm.train`
/// reaches the tool as one argument.
///
/// # Example
///
/// ```rust
/// use pgmrun_runner::CommandSpec;
/// use std::ffi::OsString;
///
/// let cmd = CommandSpec::new("libra")
///     .arg("mscore")
///     .args(["-m", "alarm-cl.bn", "-i", "alarm.test"]);
///
/// assert_eq!(cmd.program, OsString::from("libra"));
/// assert_eq!(cmd.args.len(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    /// The program to execute
    pub program: OsString,
    /// Arguments as discrete elements (NOT shell strings)
    pub args: Vec<OsString>,
    /// Optional working directory
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Create a new `CommandSpec` for the given program.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Split a textual command line on whitespace.
    ///
    /// The first token is the program, the rest are arguments. There is no quoting or
    /// escaping: `"a b"` is two tokens. An empty or blank line yields a spec with an
    /// empty program, which the runner reports as
    /// [`FailureCause::EmptyCommand`](crate::FailureCause::EmptyCommand).
    ///
    /// ```rust
    /// use pgmrun_runner::CommandSpec;
    ///
    /// let cmd = CommandSpec::from_command_line("mkdir  out -p");
    /// assert_eq!(cmd.program, "mkdir");
    /// assert_eq!(cmd.args, ["out", "-p"]);
    /// ```
    #[must_use]
    pub fn from_command_line(line: &str) -> Self {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some(program) => Self::new(program).args(tokens),
            None => Self::default(),
        }
    }

    /// Add a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add several arguments in order.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory for the command.
    #[must_use]
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// True when there is no program to run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.program.is_empty()
    }

    /// Convert into a `std::process::Command` using argv-style argument passing.
    ///
    /// Standard streams are left at their defaults; the runner wires them.
    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Convert into a `tokio::process::Command`, as used by the native runner.
    #[must_use]
    pub fn to_tokio_command(&self) -> TokioCommand {
        let mut cmd = TokioCommand::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
