//! Command-line runtime for `vedit`.
//!
//! [`run`] parses arguments, loads configuration, resolves the target and
//! the editor, picks a checker, and drives one edit session. Everything the
//! user sees goes to the error stream; standard output only carries `--help`
//! and `--version`.

use std::env;
use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use tracing::debug;
use vedit_checkers::{Shellcheck, SupplementaryCheck, ValidatorRegistry};
use vedit_config::Config;
use vedit_filetype::Classifier;
use vedit_session::{
    EditSession, EditorLauncher, InterruptFlag, ProcessEditor, Prompter,
    SessionOutcome, StreamReporter, TerminalPrompter, resolve_editor, resolve_target,
    select_checker,
};

mod cli;
mod config;
mod errors;
mod telemetry;

use cli::Cli;
use config::{ConfigLoader, OrthoConfigLoader, command_arguments, split_config_arguments};
use errors::AppError;

const CLI_TARGET: &str = "vedit_cli";

/// Runs `vedit` with the given arguments and streams.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let interrupt = InterruptFlag::new();
    let mut prompter = TerminalPrompter::stdio(interrupt.clone());
    let runtime = Runtime {
        loader: &OrthoConfigLoader,
        launcher: &ProcessEditor,
        interrupt,
        install_signals: true,
        editor_env: env::var("EDITOR").ok(),
    };
    runtime.run(args, stdout, stderr, &mut prompter)
}

/// Collaborators for one run, substituted in tests.
struct Runtime<'a, L: ConfigLoader> {
    loader: &'a L,
    launcher: &'a dyn EditorLauncher,
    interrupt: InterruptFlag,
    install_signals: bool,
    editor_env: Option<String>,
}

impl<L: ConfigLoader> Runtime<'_, L> {
    fn run<I, W, E>(
        &self,
        args: I,
        stdout: &mut W,
        stderr: &mut E,
        prompter: &mut dyn Prompter,
    ) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
        W: Write,
        E: Write,
    {
        match self.execute(args, stderr, prompter) {
            Ok(code) => code,
            Err(AppError::CliUsage(error)) if !error.use_stderr() => {
                write_or_log(stdout, &error.to_string());
                ExitCode::SUCCESS
            }
            Err(error) => {
                write_or_log(stderr, &format!("{error}\n"));
                ExitCode::FAILURE
            }
        }
    }

    fn execute<I, E>(
        &self,
        args: I,
        stderr: &mut E,
        prompter: &mut dyn Prompter,
    ) -> Result<ExitCode, AppError>
    where
        I: IntoIterator<Item = OsString>,
        E: Write,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);
        let cli = Cli::try_parse_with_listing(command_arguments(&args, &split))
            .map_err(AppError::CliUsage)?;
        let Some(filename) = cli.filename.as_deref() else {
            write_or_log(stderr, &cli::command().render_help().to_string());
            return Ok(ExitCode::FAILURE);
        };

        let config = self.loader.load(&split.config_arguments)?;
        config.validate()?;
        telemetry::initialise(&config)?;
        if self.install_signals {
            self.interrupt.install().map_err(AppError::Signals)?;
        }

        self.edit(filename, &cli, &config, prompter, stderr)
    }

    fn edit<E: Write>(
        &self,
        filename: &str,
        cli: &Cli,
        config: &Config,
        prompter: &mut dyn Prompter,
        stderr: &mut E,
    ) -> Result<ExitCode, AppError> {
        let Some(target) = resolve_target(filename, prompter)? else {
            if self.interrupt.is_raised() {
                write_or_log(stderr, &format!("Interrupted; {filename} is unchanged.\n"));
                return Ok(ExitCode::FAILURE);
            }
            debug!(target: CLI_TARGET, filename, "user declined");
            return Ok(ExitCode::SUCCESS);
        };
        let editor = resolve_editor(config.editor(), self.editor_env.as_deref())?;
        let registry = ValidatorRegistry::builtin()?;
        let checker = select_checker(&registry, &Classifier::new(), target.path(), cli.validate());
        let shellcheck = Shellcheck::new(config.shellcheck_severity(), config.shellcheck_shell());
        let supplementary = cli
            .shellcheck
            .then_some(&shellcheck as &dyn SupplementaryCheck);

        let mut reporter = StreamReporter::new(stderr);
        let outcome = EditSession::new(target, &editor, self.launcher)
            .with_checker(checker)
            .with_supplementary(supplementary)
            .with_line(cli.line)
            .with_interrupt(self.interrupt.clone())
            .run(prompter, &mut reporter)?;
        Ok(exit_code(outcome))
    }
}

/// Success only when the target was written.
const fn exit_code(outcome: SessionOutcome) -> ExitCode {
    if outcome.committed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Writes `text`; a closed stream is logged rather than fatal.
fn write_or_log<W: Write>(stream: &mut W, text: &str) {
    if let Err(error) = stream.write_all(text.as_bytes()).and_then(|()| stream.flush()) {
        debug!(target: CLI_TARGET, error = %error, "could not write to stream");
    }
}
