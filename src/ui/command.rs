//! Console commands
//!
//! Each line typed at the prompt parses into one [`Command`].

/// All console commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Enter debug mode for a job
    Start(String),
    /// Step to the next superstep
    Next,
    /// Step to the previous superstep
    Prev,
    /// Request the current superstep again
    Retry,
    /// Leave debug mode
    Exit,
    /// Capture a unit test for one vertex at the current superstep
    CaptureVertex(String),
    /// Capture a unit test for the master compute at the current superstep
    CaptureMaster,
    /// Print the scenario of the current superstep
    Show,
    /// Print one vertex of the current scenario in detail
    Vertex(String),
    /// Print mode, job and superstep
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands.")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
}

impl Command {
    /// Parse one input line; blank lines parse to `None`
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("start" | "fetch" | "debug", [job_id]) => Command::Start(job_id.to_string()),
            ("start" | "fetch" | "debug", _) => return Err(ParseError::Usage("start <job-id>")),
            ("next" | "n", []) => Command::Next,
            ("prev" | "p", []) => Command::Prev,
            ("retry" | "r", []) => Command::Retry,
            ("exit" | "edit", []) => Command::Exit,
            ("capture", ["vertex", vertex_id]) => Command::CaptureVertex(vertex_id.to_string()),
            ("capture", ["master"]) => Command::CaptureMaster,
            ("capture", _) => {
                return Err(ParseError::Usage("capture vertex <vertex-id> | capture master"))
            }
            ("show", []) => Command::Show,
            ("vertex" | "v", [vertex_id]) => Command::Vertex(vertex_id.to_string()),
            ("vertex" | "v", _) => return Err(ParseError::Usage("vertex <vertex-id>")),
            ("status", []) => Command::Status,
            ("help" | "h" | "?", _) => Command::Help,
            ("quit" | "q", []) => Command::Quit,
            _ => return Err(ParseError::Unknown(line.trim().to_string())),
        };
        Ok(Some(command))
    }

    pub fn usage(&self) -> &'static str {
        match self {
            Command::Start(_) => "start <job-id>",
            Command::Next => "next",
            Command::Prev => "prev",
            Command::Retry => "retry",
            Command::Exit => "exit",
            Command::CaptureVertex(_) => "capture vertex <vertex-id>",
            Command::CaptureMaster => "capture master",
            Command::Show => "show",
            Command::Vertex(_) => "vertex <vertex-id>",
            Command::Status => "status",
            Command::Help => "help",
            Command::Quit => "quit",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::Start(_) => "Debug a job, starting at superstep 0",
            Command::Next => "Go to the next superstep",
            Command::Prev => "Go to the previous superstep",
            Command::Retry => "Fetch the current superstep again",
            Command::Exit => "Return to edit mode",
            Command::CaptureVertex(_) => "Save a unit test for a vertex",
            Command::CaptureMaster => "Save a unit test for the master compute",
            Command::Show => "Print the current scenario",
            Command::Vertex(_) => "Print one vertex in detail",
            Command::Status => "Print mode, job and superstep",
            Command::Help => "Show this help",
            Command::Quit => "Quit",
        }
    }

    /// One entry per command, in help order
    pub fn all() -> Vec<Command> {
        vec![
            Command::Start(String::new()),
            Command::Next,
            Command::Prev,
            Command::Retry,
            Command::Exit,
            Command::CaptureVertex(String::new()),
            Command::CaptureMaster,
            Command::Show,
            Command::Vertex(String::new()),
            Command::Status,
            Command::Help,
            Command::Quit,
        ]
    }

    pub fn help_text() -> String {
        let entries = Self::all();
        let width = entries
            .iter()
            .map(|command| command.usage().len())
            .max()
            .unwrap_or(0);
        entries
            .iter()
            .map(|command| format!("  {:<width$}  {}", command.usage(), command.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
