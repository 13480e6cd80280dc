//! Interactive shell over one submission controller.
//!
//! Submissions run on a background task so the shell keeps reading
//! commands; their outcomes come back over a channel and are applied
//! between commands.

use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use dealview_core::{
    PlainStyle, Report, Style, Tab, TextRenderer, Tier, TracingObserver, ViewObserver,
};
use dealview_runtime::{AnalysisTransport, SubmissionController, SubmissionState, SubmitOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::style::AnsiStyle;

const HELP: &str = "\
Commands:
  submit <deal id>   run an analysis for a deal
  tab <name>         context, knowledge, gaps or debug
  tier <name>        conservative, moderate or aggressive
  rationale          show or hide the tier rationale
  debug              show or hide the debug trace
  show               print the current report or status
  reset              clear the current result
  help               print this help
  quit               leave the shell";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Submit(String),
    Tab(Tab),
    Tier(Tier),
    Rationale,
    Debug,
    Show,
    Reset,
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "submit" | "run" => {
                if rest.is_empty() {
                    Err("usage: submit <deal id>".to_string())
                } else {
                    Ok(ShellCommand::Submit(rest.to_string()))
                }
            }
            "tab" => rest
                .parse()
                .map(ShellCommand::Tab)
                .map_err(|e| e.to_string()),
            "tier" => rest
                .parse()
                .map(ShellCommand::Tier)
                .map_err(|e| e.to_string()),
            "rationale" => Ok(ShellCommand::Rationale),
            "debug" => Ok(ShellCommand::Debug),
            "show" => Ok(ShellCommand::Show),
            "reset" | "clear" => Ok(ShellCommand::Reset),
            "help" | "?" => Ok(ShellCommand::Help),
            "quit" | "exit" => Ok(ShellCommand::Quit),
            other => Err(format!("unknown command '{}', try 'help'", other)),
        }
    }
}

/// Whether the shell keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A finished background submission, tagged with the ticket it was
/// spawned under.
#[derive(Debug)]
pub struct Completion {
    pub ticket: u64,
    pub outcome: SubmitOutcome,
}

/// A submission the shell has spawned and not yet heard back from.
#[derive(Debug, Clone)]
struct Pending {
    ticket: u64,
    deal_id: String,
}

/// Shell state: the controller, the report for the current result, and
/// where output goes.
pub struct Shell<T, W> {
    controller: Arc<SubmissionController<T>>,
    observer: Arc<dyn ViewObserver>,
    report: Option<Report>,
    color: bool,
    out: W,
    completions: mpsc::UnboundedSender<Completion>,
    pending: Option<Pending>,
    next_ticket: u64,
}

impl<T, W> Shell<T, W>
where
    T: AnalysisTransport + 'static,
    W: Write,
{
    pub fn new(
        controller: Arc<SubmissionController<T>>,
        color: bool,
        out: W,
    ) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (completions, receiver) = mpsc::unbounded_channel();
        let shell = Self {
            controller,
            observer: Arc::new(TracingObserver),
            report: None,
            color,
            out,
            completions,
            pending: None,
            next_ticket: 0,
        };
        (shell, receiver)
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// True from the moment a submission is spawned until its completion
    /// is applied.
    pub fn is_running(&self) -> bool {
        self.pending.is_some() || self.controller.state().is_submitting()
    }

    pub fn prompt(&mut self) -> Result<()> {
        if self.is_running() {
            write!(self.out, "Running... > ")?;
        } else {
            write!(self.out, "dealview> ")?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Parse and run one input line.
    pub fn handle_line(&mut self, line: &str) -> Result<Flow> {
        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }
        match line.parse::<ShellCommand>() {
            Ok(command) => self.execute(command),
            Err(message) => {
                writeln!(self.out, "{}", message)?;
                Ok(Flow::Continue)
            }
        }
    }

    pub fn execute(&mut self, command: ShellCommand) -> Result<Flow> {
        match command {
            ShellCommand::Submit(deal_id) => self.submit(deal_id)?,
            ShellCommand::Tab(tab) => {
                if let Some(report) = self.report.as_mut() {
                    report.select_tab(tab);
                }
                self.show()?;
            }
            ShellCommand::Tier(tier) => {
                if let Some(report) = self.report.as_mut() {
                    report.select_tier(tier);
                }
                self.show()?;
            }
            ShellCommand::Rationale => {
                let toggled = self.report.as_mut().map(Report::toggle_rationale);
                match toggled {
                    Some(Err(error)) => writeln!(self.out, "{}", error)?,
                    _ => self.show()?,
                }
            }
            ShellCommand::Debug => {
                if let Some(report) = self.report.as_mut() {
                    report.toggle_debug();
                }
                self.show()?;
            }
            ShellCommand::Show => self.show()?,
            ShellCommand::Reset => {
                self.controller.reset();
                self.pending = None;
                self.report = None;
                writeln!(self.out, "Cleared.")?;
            }
            ShellCommand::Help => writeln!(self.out, "{}", HELP)?,
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn submit(&mut self, deal_id: String) -> Result<()> {
        if self.is_running() {
            writeln!(self.out, "A submission is already running.")?;
            return Ok(());
        }

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.pending = Some(Pending {
            ticket,
            deal_id: deal_id.clone(),
        });
        self.report = None;

        let controller = Arc::clone(&self.controller);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let outcome = controller.submit(&deal_id).await;
            // The receiver is gone only when the shell has exited.
            let _ = completions.send(Completion { ticket, outcome });
        });

        writeln!(self.out, "Running...")?;
        Ok(())
    }

    /// Apply a finished submission.
    ///
    /// Only the completion for the pending ticket ends the running state.
    /// Completions from before a `reset` carry an older ticket.
    pub fn complete(&mut self, completion: Completion) -> Result<()> {
        let Completion { ticket, outcome } = completion;
        if self.pending.as_ref().is_some_and(|p| p.ticket == ticket) {
            self.pending = None;
        }

        match outcome {
            SubmitOutcome::Applied(SubmissionState::Success { result, .. }) => {
                self.report = Some(Report::with_observer(result, self.observer.clone()));
                self.show()?;
            }
            SubmitOutcome::Applied(SubmissionState::Failure { message, .. }) => {
                self.report = None;
                writeln!(self.out, "{}", message)?;
            }
            SubmitOutcome::Applied(_) | SubmitOutcome::Discarded => {}
            SubmitOutcome::Rejected(reason) => {
                writeln!(self.out, "Submission rejected: {}", reason.as_str())?;
            }
        }
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        if let Some(report) = &self.report {
            let style: &dyn Style = if self.color { &AnsiStyle } else { &PlainStyle };
            let text = TextRenderer::new(style).render(&report.render());
            write!(self.out, "{}", text)?;
            return Ok(());
        }

        if let Some(pending) = &self.pending {
            writeln!(self.out, "Running analysis for {}...", pending.deal_id)?;
            return Ok(());
        }

        match self.controller.state() {
            SubmissionState::Submitting { deal_id, .. } => {
                writeln!(self.out, "Running analysis for {}...", deal_id)?
            }
            SubmissionState::Failure { message, .. } => writeln!(self.out, "{}", message)?,
            _ => writeln!(self.out, "No analysis loaded. Use 'submit <deal id>'.")?,
        }
        Ok(())
    }
}

/// Read commands from stdin until `quit` or end of input.
pub async fn run<T>(controller: Arc<SubmissionController<T>>, color: bool) -> Result<()>
where
    T: AnalysisTransport + 'static,
{
    let (mut shell, mut completions) = Shell::new(controller, color, std::io::stdout());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    writeln!(std::io::stdout(), "Type 'help' for commands.")?;
    shell.prompt()?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if shell.handle_line(&line)? == Flow::Quit {
                    break;
                }
            }
            Some(completion) = completions.recv() => {
                writeln!(std::io::stdout())?;
                shell.complete(completion)?;
            }
        }
        shell.prompt()?;
    }

    Ok(())
}
