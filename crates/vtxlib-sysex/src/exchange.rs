//! Response handlers for request/response exchanges.
//!
//! The device answers most requests with a single message, but some
//! operations span several (a mode query followed by a program dump).
//! A [`ResponseHandler`] is fed decoded messages one at a time and says
//! whether it is still waiting or done; the IO loop keeps the exchange
//! open until the handler completes or the deadline passes.

use vtxlib_core::error::{Error, Result};
use vtxlib_core::types::{DeviceMode, Program, ProgramSlot};

use crate::message::Message;

/// Outcome of feeding one message to a handler.
#[derive(Debug)]
pub enum Step<T> {
    /// The handler needs further messages.
    NeedMore,
    /// The exchange is complete.
    Complete(T),
}

/// Consumes the device's replies to one exchange.
///
/// Handlers are strict: a message of the wrong kind fails the exchange
/// rather than being skipped, since replies arrive in submission order
/// and a mismatch means the conversation has desynchronized.
pub trait ResponseHandler: Send {
    type Output: Send;

    fn on_message(&mut self, msg: Message) -> Result<Step<Self::Output>>;
}

fn unexpected(wanted: &str, got: &Message) -> Error {
    Error::InvalidMessage(format!("expected {wanted}, got {}", got.kind()))
}

/// Expects a single acknowledgement.
#[derive(Debug, Default)]
pub struct ExpectAck;

impl ResponseHandler for ExpectAck {
    type Output = ();

    fn on_message(&mut self, msg: Message) -> Result<Step<()>> {
        match msg {
            Message::Ack => Ok(Step::Complete(())),
            other => Err(unexpected("acknowledgement", &other)),
        }
    }
}

/// Expects a mode response.
#[derive(Debug, Default)]
pub struct ExpectMode;

impl ResponseHandler for ExpectMode {
    type Output = DeviceMode;

    fn on_message(&mut self, msg: Message) -> Result<Step<DeviceMode>> {
        match msg {
            Message::CurrentModeResponse(mode) => Ok(Step::Complete(mode)),
            other => Err(unexpected("mode response", &other)),
        }
    }
}

/// Expects a dump of the edit buffer.
#[derive(Debug, Default)]
pub struct ExpectCurrentProgram;

impl ResponseHandler for ExpectCurrentProgram {
    type Output = Program;

    fn on_message(&mut self, msg: Message) -> Result<Step<Program>> {
        match msg {
            Message::CurrentProgramData(program) => Ok(Step::Complete(program)),
            other => Err(unexpected("current program data", &other)),
        }
    }
}

/// Expects a dump of a stored slot, and checks it is the slot asked for.
#[derive(Debug)]
pub struct ExpectProgramData {
    pub slot: ProgramSlot,
}

impl ResponseHandler for ExpectProgramData {
    type Output = Program;

    fn on_message(&mut self, msg: Message) -> Result<Step<Program>> {
        match msg {
            Message::ProgramData(slot, program) if slot == self.slot => {
                Ok(Step::Complete(program))
            }
            Message::ProgramData(slot, _) => Err(Error::InvalidMessage(format!(
                "program data for slot {slot}, expected {}",
                self.slot
            ))),
            other => Err(unexpected("program data", &other)),
        }
    }
}

/// Runs two handlers back to back over one exchange.
///
/// Used when two requests go out together and the replies arrive in
/// order, e.g. a mode query followed by an edit buffer dump.
#[derive(Debug)]
pub struct Pair<A: ResponseHandler, B: ResponseHandler> {
    first: A,
    second: B,
    first_output: Option<A::Output>,
}

impl<A: ResponseHandler, B: ResponseHandler> Pair<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Pair {
            first,
            second,
            first_output: None,
        }
    }
}

impl<A: ResponseHandler, B: ResponseHandler> ResponseHandler for Pair<A, B> {
    type Output = (A::Output, B::Output);

    fn on_message(&mut self, msg: Message) -> Result<Step<Self::Output>> {
        if self.first_output.is_none() {
            match self.first.on_message(msg)? {
                Step::NeedMore => return Ok(Step::NeedMore),
                Step::Complete(out) => {
                    self.first_output = Some(out);
                    return Ok(Step::NeedMore);
                }
            }
        }
        match self.second.on_message(msg)? {
            Step::NeedMore => Ok(Step::NeedMore),
            Step::Complete(out) => {
                // first_output is Some once the first handler completed
                let first = self
                    .first_output
                    .take()
                    .ok_or_else(|| Error::InvalidMessage("pair handler out of order".into()))?;
                Ok(Step::Complete((first, out)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::sample_program;
    use vtxlib_core::types::DeviceMode;

    #[test]
    fn ack_completes_on_ack() {
        let mut h = ExpectAck;
        assert!(matches!(h.on_message(Message::Ack), Ok(Step::Complete(()))));
    }

    #[test]
    fn ack_rejects_other_kinds() {
        let mut h = ExpectAck;
        match h.on_message(Message::CurrentModeRequest) {
            Err(Error::InvalidMessage(msg)) => {
                assert!(msg.contains("acknowledgement"), "unexpected: {msg}");
            }
            other => panic!("expected InvalidMessage, got {other:?}"),
        }
    }

    #[test]
    fn mode_handler_returns_the_mode() {
        let mut h = ExpectMode;
        match h.on_message(Message::CurrentModeResponse(DeviceMode::Manual)) {
            Ok(Step::Complete(mode)) => assert_eq!(mode, DeviceMode::Manual),
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn program_data_checks_the_slot() {
        let mut h = ExpectProgramData {
            slot: ProgramSlot::A2,
        };
        let wrong = Message::ProgramData(ProgramSlot::B1, sample_program());
        assert!(h.on_message(wrong).is_err());

        let mut h = ExpectProgramData {
            slot: ProgramSlot::A2,
        };
        let right = Message::ProgramData(ProgramSlot::A2, sample_program());
        assert!(matches!(h.on_message(right), Ok(Step::Complete(_))));
    }

    #[test]
    fn pair_runs_handlers_in_order() {
        let mut h = Pair::new(ExpectMode, ExpectCurrentProgram);
        assert!(matches!(
            h.on_message(Message::CurrentModeResponse(DeviceMode::Preset)),
            Ok(Step::NeedMore)
        ));
        match h.on_message(Message::CurrentProgramData(sample_program())) {
            Ok(Step::Complete((mode, program))) => {
                assert_eq!(mode, DeviceMode::Preset);
                assert_eq!(program, sample_program());
            }
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn pair_fails_if_replies_arrive_out_of_order() {
        let mut h = Pair::new(ExpectMode, ExpectCurrentProgram);
        assert!(h.on_message(Message::CurrentProgramData(sample_program())).is_err());
    }
}
