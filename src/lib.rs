pub mod client;
pub mod config;
pub mod controller;
pub mod editor;
pub mod scenario;
pub mod session;
pub mod ui;
pub mod util;

pub use client::{ClientError, DebuggerServer, HttpDebuggerServer, RetryPolicy};
pub use config::Config;
pub use controller::{ControllerError, ControllerSettings, DebugController, StepOutcome};
pub use editor::{EditorAdapter, Notice};
pub use scenario::{Delta, Scenario, VertexRecord};
pub use session::{Mode, Session, StateCache};
pub use ui::App;
