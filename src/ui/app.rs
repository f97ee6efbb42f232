use std::fs;
use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::client::HttpDebuggerServer;
use crate::config::Config;
use crate::controller::{
    CapturedTest, ControllerError, ControllerSettings, DebugController, StepOutcome,
};
use crate::editor::console::{render_table, render_vertex};
use crate::editor::{marshal_scenario, ConsoleEditor};
use crate::session::Mode;
use crate::ui::command::Command;

/// Superstep change still waiting on the server
type Navigation = Pin<Box<dyn Future<Output = Result<StepOutcome, ControllerError>>>>;

/// Line-oriented debugger console
///
/// Superstep changes run in the background while the console keeps reading
/// input, so `exit` or another step can be issued during a slow fetch.
pub struct App<W: Write = io::Stdout> {
    controller: DebugController,
    /// Where captured tests are saved
    captures_dir: PathBuf,
    out: W,
    /// Superstep changes in flight
    navigation: FuturesUnordered<Navigation>,
    /// Whether the app should quit
    should_quit: bool,
}

impl App<io::Stdout> {
    /// Console talking to the configured debugger server over HTTP
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let server = HttpDebuggerServer::new(&config.server.root, config.server_timeout())?;
        let controller = DebugController::new(
            Arc::new(server),
            Arc::new(ConsoleEditor::stdout()),
            ControllerSettings::from_config(&config),
        );
        tracing::info!(server = %config.server.root, "Console started");
        Ok(Self::with_controller(controller, config.captures_dir(), io::stdout()))
    }

    /// Run the console on stdin until `quit` or end of input
    pub async fn run(&mut self, initial_job: Option<String>) -> anyhow::Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        self.run_with_input(stdin, initial_job).await
    }
}

impl<W: Write> App<W> {
    pub fn with_controller(controller: DebugController, captures_dir: PathBuf, out: W) -> Self {
        Self {
            controller,
            captures_dir,
            out,
            navigation: FuturesUnordered::new(),
            should_quit: false,
        }
    }

    pub fn controller(&self) -> &DebugController {
        &self.controller
    }

    /// Consume the app and return its output writer
    pub fn into_output(self) -> W {
        self.out
    }

    /// Read commands from `input` until `quit` or end of input.
    ///
    /// With `initial_job` set, a debug session for it is started before the
    /// first prompt. At end of input, superstep changes still in flight are
    /// awaited; `quit` abandons them.
    pub async fn run_with_input<R: AsyncBufRead + Unpin>(
        &mut self,
        input: R,
        initial_job: Option<String>,
    ) -> anyhow::Result<()> {
        writeln!(
            self.out,
            "graft {} - type 'help' for commands",
            env!("CARGO_PKG_VERSION")
        )?;

        if let Some(job_id) = initial_job {
            self.execute(Command::Start(job_id)).await?;
        }

        let mut lines = input.lines();
        self.prompt()?;
        loop {
            tokio::select! {
                // Progress in-flight changes first so a command's
                // synchronous part runs before the next line is read
                biased;

                Some(result) = self.navigation.next(), if !self.navigation.is_empty() => {
                    self.report(result.map(drop))?;
                    self.prompt()?;
                }

                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    match Command::parse(&line) {
                        Ok(Some(command)) => self.execute(command).await?,
                        Ok(None) => {}
                        Err(e) => writeln!(self.out, "{e}")?,
                    }
                    if self.should_quit {
                        return Ok(());
                    }
                    self.prompt()?;
                }
            }
        }

        while let Some(result) = self.navigation.next().await {
            self.report(result.map(drop))?;
        }
        Ok(())
    }

    fn prompt(&mut self) -> io::Result<()> {
        let session = self.controller.session();
        match (session.mode, &session.job_id) {
            (Mode::Debug, Some(job_id)) => {
                write!(self.out, "[{job_id} @ {}]> ", session.current_superstep)?
            }
            _ => write!(self.out, "[edit]> ")?,
        }
        self.out.flush()
    }

    /// Run one command. Only output failures are returned as errors.
    ///
    /// Superstep changes are queued and report their result when they
    /// finish; everything else completes before this returns.
    pub async fn execute(&mut self, command: Command) -> anyhow::Result<()> {
        tracing::debug!(?command, "Executing command");
        let controller = self.controller.clone();
        let result = match command {
            Command::Start(job_id) => {
                self.navigate(async move { controller.start_debug_session(&job_id).await });
                Ok(())
            }
            Command::Next => {
                self.navigate(async move { controller.step_forward().await });
                Ok(())
            }
            Command::Prev => {
                self.navigate(async move { controller.step_backward().await });
                Ok(())
            }
            Command::Retry => {
                self.navigate(async move { controller.retry_current_superstep().await });
                Ok(())
            }
            Command::Exit => {
                self.controller.exit_debug_session();
                Ok(())
            }
            Command::CaptureVertex(vertex_id) => {
                match self.controller.capture_vertex_scenario(&vertex_id).await {
                    Ok(captured) => return self.save_capture(&captured),
                    Err(e) => Err(e),
                }
            }
            Command::CaptureMaster => match self.controller.capture_master_scenario().await {
                Ok(captured) => return self.save_capture(&captured),
                Err(e) => Err(e),
            },
            Command::Show => return self.show_scenario(),
            Command::Vertex(vertex_id) => return self.show_vertex(&vertex_id),
            Command::Status => return self.show_status(),
            Command::Help => {
                writeln!(self.out, "Commands:\n{}", Command::help_text())?;
                Ok(())
            }
            Command::Quit => {
                self.should_quit = true;
                Ok(())
            }
        };
        self.report(result)
    }

    fn navigate(
        &mut self,
        change: impl Future<Output = Result<StepOutcome, ControllerError>> + 'static,
    ) {
        self.navigation.push(Box::pin(change));
    }

    fn report(&mut self, result: Result<(), ControllerError>) -> anyhow::Result<()> {
        if let Err(err) = result {
            tracing::debug!(error = %err, "Command failed");
            // The editor already printed a notice for these
            if !err.is_reported() {
                writeln!(self.out, "[error] {}", err.user_message())?;
            }
        }
        Ok(())
    }

    fn save_capture(&mut self, captured: &CapturedTest) -> anyhow::Result<()> {
        let path = self.captures_dir.join(&captured.filename);
        let saved = fs::create_dir_all(&self.captures_dir)
            .and_then(|_| fs::write(&path, &captured.code));
        match saved {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Saved captured test");
                writeln!(self.out, "Saved {}", path.display())?;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to save captured test");
                writeln!(self.out, "[error] Failed to save {}: {e}", path.display())?;
            }
        }
        Ok(())
    }

    fn show_scenario(&mut self) -> anyhow::Result<()> {
        match self.controller.current_scenario() {
            Some(scenario) => writeln!(self.out, "{}", render_table(&marshal_scenario(&scenario)))?,
            None => writeln!(self.out, "No scenario loaded")?,
        }
        Ok(())
    }

    fn show_vertex(&mut self, vertex_id: &str) -> anyhow::Result<()> {
        let scenario = self.controller.current_scenario().map(|s| marshal_scenario(&s));
        match scenario.as_ref().and_then(|s| s.get(vertex_id)) {
            Some(vertex) => writeln!(self.out, "{}", render_vertex(vertex))?,
            None => writeln!(self.out, "Vertex {vertex_id} is not in the current scenario")?,
        }
        Ok(())
    }

    fn show_status(&mut self) -> anyhow::Result<()> {
        let session = self.controller.session();
        match &session.job_id {
            Some(job_id) => writeln!(
                self.out,
                "{}, job {job_id}, superstep {} of {}, cached {:?}",
                session.mode.display_name(),
                session.current_superstep,
                session.max_superstep,
                self.controller.cached_steps()
            )?,
            None => writeln!(self.out, "{}, no job", session.mode.display_name())?,
        }
        Ok(())
    }
}
