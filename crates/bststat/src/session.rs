//! Menu-driven operator session.
//!
//! The session is an explicit state machine. Each call to
//! [`InteractiveSession::step`] performs one transition and reads at most
//! one line of input.

use std::io::{BufRead, Write};

use sonic_sai::{BstGateway, DiagShell, PortNumber};
use tracing::{debug, info, warn};

use crate::clear::StatsClearOperator;
use crate::collector::StatsSnapshotCollector;
use crate::error::{BstError, Result};
use crate::input::{read_numeric, NumericInput};
use crate::render;

/// Operation requested from the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Display,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    MainMenu,
    AwaitPort(Intent),
    Dispatching(Intent, PortNumber),
    Done,
}

/// Menu choices.
const CHOICE_DISPLAY: u32 = 1;
const CHOICE_CLEAR: u32 = 2;
const CHOICE_SHELL: u32 = 9;
const CHOICE_QUIT: u32 = 0;

/// One operator session against one device.
pub struct InteractiveSession<'a, D: BstGateway + DiagShell + ?Sized> {
    device: &'a mut D,
    state: SessionState,
}

impl<'a, D: BstGateway + DiagShell + ?Sized> InteractiveSession<'a, D> {
    pub fn new(device: &'a mut D) -> Self {
        Self {
            device,
            state: SessionState::MainMenu,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Runs the session until the operator quits or input ends.
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> Result<()> {
        while self.state != SessionState::Done {
            self.step(input, out)?;
        }
        Ok(())
    }

    /// Performs one transition and returns the new state.
    ///
    /// # Errors
    ///
    /// Only console I/O errors end the session early. Device failures are
    /// reported on `out` and the session returns to the menu.
    pub fn step<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> Result<SessionState> {
        let next = match self.state {
            SessionState::MainMenu => self.main_menu(input, out)?,
            SessionState::AwaitPort(intent) => self.await_port(intent, input, out)?,
            SessionState::Dispatching(intent, port) => self.dispatch(intent, port, out)?,
            SessionState::Done => SessionState::Done,
        };
        debug!(from = ?self.state, to = ?next, "Session transition");
        self.state = next;
        Ok(next)
    }

    fn main_menu<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> Result<SessionState> {
        render::write_menu(out)?;

        Ok(match read_numeric(input)? {
            NumericInput::Value(CHOICE_DISPLAY) => SessionState::AwaitPort(Intent::Display),
            NumericInput::Value(CHOICE_CLEAR) => SessionState::AwaitPort(Intent::Clear),
            NumericInput::Value(CHOICE_SHELL) => {
                info!("Launching diagnostic shell");
                if let Err(e) = self.device.launch_shell(input, out) {
                    warn!(rc = e.code(), "Diagnostic shell failed: {}", e);
                    render::write_error(out, "launch the diagnostic shell", &e)?;
                }
                SessionState::MainMenu
            }
            NumericInput::Value(CHOICE_QUIT) | NumericInput::Eof => {
                render::write_exit(out)?;
                SessionState::Done
            }
            NumericInput::Value(_) | NumericInput::Invalid => {
                render::write_invalid_option(out)?;
                SessionState::MainMenu
            }
        })
    }

    fn await_port<R: BufRead, W: Write>(
        &mut self,
        intent: Intent,
        input: &mut R,
        out: &mut W,
    ) -> Result<SessionState> {
        render::write_port_prompt(out)?;

        Ok(match read_numeric(input)? {
            NumericInput::Value(port) => SessionState::Dispatching(intent, PortNumber::new(port)),
            NumericInput::Invalid => {
                render::write_invalid_option(out)?;
                SessionState::MainMenu
            }
            NumericInput::Eof => {
                render::write_exit(out)?;
                SessionState::Done
            }
        })
    }

    fn dispatch<W: Write>(&mut self, intent: Intent, port: PortNumber, out: &mut W) -> Result<SessionState> {
        info!(?intent, port = port.get(), "Dispatching BST request");

        let outcome = match intent {
            Intent::Display => StatsSnapshotCollector::new(&mut *self.device)
                .collect(port)
                .and_then(|snapshot| Ok(render::write_snapshot(out, &snapshot)?)),
            Intent::Clear => StatsClearOperator::new(&mut *self.device)
                .clear(port)
                .and_then(|result| Ok(render::write_clear_result(out, &result)?)),
        };

        match outcome {
            Ok(()) => {}
            Err(BstError::PortResolution { port, source }) => {
                render::write_error(out, &format!("resolve port {}", port), &source)?;
            }
            Err(e) => return Err(e),
        }
        Ok(SessionState::MainMenu)
    }
}
