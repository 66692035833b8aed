//! IO task types and implementation for the device I/O architecture.
//!
//! This module defines the request/response protocol between device
//! methods and the single IO task that owns the transport, plus the IO
//! task loop itself.
//!
//! The IO task handles: queued request/response exchanges (one in
//! flight at a time), device error interception, per-exchange
//! deadlines, abandoned-caller cleanup, and unsolicited panel event
//! emission while idle.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use vtxlib_core::error::{Error, Result};
use vtxlib_core::events::DeviceEvent;
use vtxlib_core::transport::{MANUFACTURER_KORG, SysexFrame, Transport};

use crate::exchange::{ResponseHandler, Step};
use crate::message::Message;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Whether an exchange wants more messages or has finished.
pub(crate) enum Outcome {
    InProgress,
    Finished,
}

/// A queued exchange, type-erased so the IO task can hold a mix of
/// handler output types.
pub(crate) trait PendingExchange: Send {
    /// Take the encoded payloads to transmit. Called once, at promotion.
    fn take_outbound(&mut self) -> Vec<Vec<u8>>;

    /// Feed one decoded message to the handler.
    fn on_message(&mut self, msg: Message) -> Outcome;

    /// Fail the exchange, delivering `err` to the caller.
    fn fail(&mut self, err: Error);

    /// True when the caller stopped waiting for the reply.
    fn is_abandoned(&self) -> bool;

    /// Instant after which the exchange times out.
    fn deadline(&self) -> Instant;
}

/// A concrete exchange: outbound payloads plus the handler consuming
/// the replies.
struct Exchange<H: ResponseHandler> {
    outbound: Vec<Vec<u8>>,
    handler: H,
    reply: Option<oneshot::Sender<Result<H::Output>>>,
    deadline: Instant,
}

impl<H: ResponseHandler> PendingExchange for Exchange<H> {
    fn take_outbound(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.outbound)
    }

    fn on_message(&mut self, msg: Message) -> Outcome {
        match self.handler.on_message(msg) {
            Ok(Step::NeedMore) => Outcome::InProgress,
            Ok(Step::Complete(output)) => {
                if let Some(reply) = self.reply.take() {
                    let _ = reply.send(Ok(output));
                }
                Outcome::Finished
            }
            Err(e) => {
                if let Some(reply) = self.reply.take() {
                    let _ = reply.send(Err(e));
                }
                Outcome::Finished
            }
        }
    }

    fn fail(&mut self, err: Error) {
        if let Some(reply) = self.reply.take() {
            let _ = reply.send(Err(err));
        }
    }

    fn is_abandoned(&self) -> bool {
        self.reply.as_ref().is_none_or(|reply| reply.is_closed())
    }

    fn deadline(&self) -> Instant {
        self.deadline
    }
}

/// A request sent from device methods to the IO task.
pub(crate) enum Request {
    /// Queue an exchange.
    Exchange { task: Box<dyn PendingExchange> },
    /// Graceful shutdown; returns the transport for test recovery.
    Shutdown {
        reply: oneshot::Sender<Box<dyn Transport>>,
    },
}

/// Handle to the IO task. Stored inside `VtxAmp`.
pub(crate) struct DeviceIo {
    /// Command channel.
    pub cmd_tx: mpsc::Sender<Request>,
    /// Cancellation token for graceful shutdown.
    pub cancel: CancellationToken,
    /// Join handle for the IO task.
    pub task: JoinHandle<()>,
}

impl DeviceIo {
    /// Queue an exchange and await the handler's output.
    ///
    /// The outbound messages are encoded here so a malformed value
    /// surfaces before anything reaches the wire.
    pub async fn exchange<H>(
        &self,
        outbound: &[Message],
        handler: H,
        timeout: Duration,
    ) -> Result<H::Output>
    where
        H: ResponseHandler + 'static,
    {
        let mut payloads = Vec::with_capacity(outbound.len());
        for msg in outbound {
            payloads.push(msg.encode()?);
        }

        let (reply_tx, reply_rx) = oneshot::channel();
        let task = Box::new(Exchange {
            outbound: payloads,
            handler,
            reply: Some(reply_tx),
            deadline: Instant::now() + timeout,
        });
        self.cmd_tx
            .send(Request::Exchange { task })
            .await
            .map_err(|_| Error::NotConnected)?;

        // Safety-net timeout: timeout + 500ms for channel overhead.
        // The IO task enforces the real deadline internally.
        match tokio::time::timeout(timeout + Duration::from_millis(500), reply_rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(Error::NotConnected),
            Err(_) => Err(Error::Timeout),
        }
    }

    /// Shut down the IO task and recover the transport.
    pub async fn shutdown(self) -> Result<Box<dyn Transport>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let _ = self
            .cmd_tx
            .send(Request::Shutdown { reply: reply_tx })
            .await;
        let transport = reply_rx.await.map_err(|_| Error::NotConnected)?;
        let _ = self.task.await;
        Ok(transport)
    }
}

// ---------------------------------------------------------------------------
// Spawn
// ---------------------------------------------------------------------------

/// Spawn the IO task. Returns the handle for queueing exchanges.
///
/// The IO task owns the transport exclusively and processes all
/// exchanges in submission order, plus unsolicited panel events while
/// no exchange is in flight.
pub(crate) fn spawn_io_task(
    transport: Box<dyn Transport>,
    event_tx: broadcast::Sender<DeviceEvent>,
) -> DeviceIo {
    let (cmd_tx, cmd_rx) = mpsc::channel::<Request>(32);
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();

    let task = tokio::spawn(io_loop(transport, event_tx, cmd_rx, cancel_clone));

    DeviceIo {
        cmd_tx,
        cancel,
        task,
    }
}

// ---------------------------------------------------------------------------
// IO Loop
// ---------------------------------------------------------------------------

/// The main IO loop. Runs as a spawned Tokio task.
///
/// Uses `tokio::select! { biased; }` to prioritize:
/// 1. Cancellation
/// 2. Request dispatch
/// 3. Reading frames from the transport
async fn io_loop(
    mut transport: Box<dyn Transport>,
    event_tx: broadcast::Sender<DeviceEvent>,
    mut cmd_rx: mpsc::Receiver<Request>,
    cancel: CancellationToken,
) {
    let mut current: Option<Box<dyn PendingExchange>> = None;
    let mut queue: VecDeque<Box<dyn PendingExchange>> = VecDeque::new();

    loop {
        // Promote the next queued exchange when none is in flight.
        if current.is_none() {
            while let Some(mut task) = queue.pop_front() {
                if task.is_abandoned() {
                    debug!("dropping abandoned exchange before transmit");
                    continue;
                }
                match transmit_outbound(&mut *transport, &mut *task).await {
                    Ok(true) => {
                        current = Some(task);
                        break;
                    }
                    Ok(false) => continue,
                    Err(e) => {
                        task.fail(e);
                        continue;
                    }
                }
            }
        }

        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                debug!("IO task cancelled");
                fail_all(&mut current, &mut queue, || Error::Cancelled);
                break;
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(Request::Exchange { task }) => {
                        queue.push_back(task);
                    }
                    Some(Request::Shutdown { reply }) => {
                        debug!("IO task shutdown requested");
                        fail_all(&mut current, &mut queue, || Error::Cancelled);
                        let _ = reply.send(transport);
                        return;
                    }
                    None => {
                        debug!("all request senders dropped, exiting IO task");
                        break;
                    }
                }
            }

            frame = transport.receive(Duration::from_millis(100)) => {
                match frame {
                    Ok(frame) => handle_frame(frame, &mut current, &event_tx),
                    Err(Error::Timeout) => {
                        // Nothing on the wire; yield briefly so the loop
                        // can check for requests or cancellation.
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                    Err(e) => {
                        debug!(error = %e, "transport receive error");
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        }

        // Deadline and abandonment bookkeeping for the exchange in
        // flight. Granularity is bounded by the receive timeout above.
        if let Some(task) = current.as_ref() {
            if task.is_abandoned() {
                debug!("caller stopped waiting, dropping exchange");
                current = None;
            } else if Instant::now() >= task.deadline() {
                debug!("exchange deadline passed");
                if let Some(mut task) = current.take() {
                    task.fail(Error::Timeout);
                }
            }
        }
    }
}

/// Send an exchange's payloads, checking for abandonment between
/// sends. Returns `Ok(false)` when the caller went away mid-transmit.
async fn transmit_outbound(
    transport: &mut dyn Transport,
    task: &mut dyn PendingExchange,
) -> Result<bool> {
    for payload in task.take_outbound() {
        if task.is_abandoned() {
            return Ok(false);
        }
        transport.send(MANUFACTURER_KORG, &payload).await?;
    }
    Ok(true)
}

/// Fail the exchange in flight and everything queued behind it.
fn fail_all(
    current: &mut Option<Box<dyn PendingExchange>>,
    queue: &mut VecDeque<Box<dyn PendingExchange>>,
    err: impl Fn() -> Error,
) {
    if let Some(mut task) = current.take() {
        task.fail(err());
    }
    for mut task in queue.drain(..) {
        task.fail(err());
    }
}

/// Route one received frame: device errors fail the exchange in
/// flight, other messages feed its handler, and with nothing in flight
/// panel notifications become broadcast events.
fn handle_frame(
    frame: SysexFrame,
    current: &mut Option<Box<dyn PendingExchange>>,
    event_tx: &broadcast::Sender<DeviceEvent>,
) {
    if !frame.is_korg() {
        debug!(
            manufacturer = frame.manufacturer,
            "ignoring frame from foreign manufacturer"
        );
        return;
    }

    let msg = match Message::decode(&frame.payload) {
        Ok(msg) => msg,
        Err(e) => {
            debug!(error = %e, "dropping undecodable payload");
            return;
        }
    };

    // A device error always refers to the exchange in flight.
    if let Message::DeviceError { code } = &msg {
        let code = *code;
        match current.take() {
            Some(mut task) => task.fail(Error::NotAcknowledged { code }),
            None => debug!(code, "device error outside an exchange"),
        }
        return;
    }

    if let Some(task) = current.as_mut() {
        if let Outcome::Finished = task.on_message(msg) {
            *current = None;
        }
        return;
    }

    match msg.event() {
        Some(event) => {
            let _ = event_tx.send(event);
        }
        None => debug!(kind = msg.kind(), "unsolicited message ignored"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
