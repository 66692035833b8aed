//! Mock transport for deterministic testing of the protocol engine.
//!
//! [`MockTransport`] implements the [`Transport`] trait with pre-loaded
//! request/response pairs at the SysEx payload level. This lets you test
//! message encoding, response handling, and the exchange loop without a
//! MIDI port or real hardware.
//!
//! # Example
//!
//! ```
//! use vtxlib_test_harness::MockTransport;
//!
//! let mut mock = MockTransport::new();
//! // Pre-load: when the engine sends this payload, answer with these.
//! mock.expect(&[0x30, 0x00, 0x01, 0x34, 0x12], &[&[0x30, 0x00, 0x01, 0x34, 0x42, 0x00]]);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;

use vtxlib_core::error::{Error, Result};
use vtxlib_core::transport::{SysexFrame, Transport};

/// A pre-loaded request/response pair for the mock transport.
#[derive(Debug, Clone)]
struct Expectation {
    /// The exact payload we expect to be sent.
    request: Vec<u8>,
    /// Frames to return from subsequent `receive()` calls.
    responses: Vec<SysexFrame>,
}

/// A mock [`Transport`] for testing the protocol engine without hardware.
///
/// Expectations are consumed in order. When `send()` is called, the sent
/// payload is recorded and matched against the next expectation; the
/// corresponding response frames are then returned one per `receive()`
/// call. Unsolicited frames can be queued directly with
/// [`push_frame`](MockTransport::push_frame).
///
/// If no expectation matches or the queue is exhausted, an error is
/// returned.
#[derive(Debug)]
pub struct MockTransport {
    /// Ordered queue of expected request/response pairs.
    expectations: VecDeque<Expectation>,
    /// Frames pending for `receive()` calls.
    pending: VecDeque<SysexFrame>,
    /// Whether the transport is "connected".
    connected: bool,
    /// Log of all payloads sent through this transport.
    sent_log: Vec<Vec<u8>>,
}

impl MockTransport {
    /// Create a new mock transport in the connected state.
    pub fn new() -> Self {
        MockTransport {
            expectations: VecDeque::new(),
            pending: VecDeque::new(),
            connected: true,
            sent_log: Vec::new(),
        }
    }

    /// Add an expected request payload with its response payloads.
    ///
    /// Responses are wrapped as KORG frames; use
    /// [`push_frame`](Self::push_frame) to queue a frame with a foreign
    /// manufacturer ID.
    pub fn expect(&mut self, request: &[u8], responses: &[&[u8]]) {
        self.expectations.push_back(Expectation {
            request: request.to_vec(),
            responses: responses.iter().map(|p| SysexFrame::korg(p.to_vec())).collect(),
        });
    }

    /// Queue a frame to be returned by the next free `receive()` call,
    /// independent of any expectation.
    pub fn push_frame(&mut self, frame: SysexFrame) {
        self.pending.push_back(frame);
    }

    /// Return all payloads that have been sent through this transport.
    ///
    /// Each element is the payload from one `send()` call.
    pub fn sent_data(&self) -> &[Vec<u8>] {
        &self.sent_log
    }

    /// Return the number of expectations that have not yet been consumed.
    pub fn remaining_expectations(&self) -> usize {
        self.expectations.len()
    }

    /// Set the connected state of the mock transport.
    ///
    /// When set to `false`, subsequent `send()` and `receive()` calls
    /// will return [`Error::NotConnected`].
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, _manufacturer: u8, payload: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        self.sent_log.push(payload.to_vec());

        if let Some(expectation) = self.expectations.pop_front() {
            if payload != expectation.request.as_slice() {
                return Err(Error::Transport(format!(
                    "unexpected send payload: expected {:02X?}, got {:02X?}",
                    expectation.request, payload
                )));
            }
            self.pending.extend(expectation.responses);
            Ok(())
        } else {
            Err(Error::Transport(
                "no more expectations in mock transport".into(),
            ))
        }
    }

    async fn receive(&mut self, _timeout: Duration) -> Result<SysexFrame> {
        if !self.connected {
            return Err(Error::NotConnected);
        }
        match self.pending.pop_front() {
            Some(frame) => Ok(frame),
            None => Err(Error::Timeout),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.connected = false;
        self.pending.clear();
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vtxlib_core::transport::{MANUFACTURER_KORG, Transport};

    #[tokio::test]
    async fn basic_send_receive() {
        let mut mock = MockTransport::new();
        let request = &[0x30, 0x00, 0x01, 0x34, 0x12];
        let response = &[0x30, 0x00, 0x01, 0x34, 0x42, 0x01];

        mock.expect(request, &[response]);

        mock.send(MANUFACTURER_KORG, request).await.unwrap();

        let frame = mock
            .receive(Duration::from_millis(100))
            .await
            .unwrap();
        assert!(frame.is_korg());
        assert_eq!(frame.payload, response);
    }

    #[tokio::test]
    async fn tracks_sent_payloads() {
        let mut mock = MockTransport::new();
        let req1 = &[0x01, 0x02];
        let req2 = &[0x03, 0x04];

        mock.expect(req1, &[&[0x23]]);
        mock.expect(req2, &[&[0x23]]);

        mock.send(MANUFACTURER_KORG, req1).await.unwrap();
        mock.send(MANUFACTURER_KORG, req2).await.unwrap();

        assert_eq!(mock.sent_data().len(), 2);
        assert_eq!(mock.sent_data()[0], req1);
        assert_eq!(mock.sent_data()[1], req2);
    }

    #[tokio::test]
    async fn multiple_responses_per_request() {
        let mut mock = MockTransport::new();
        mock.expect(&[0x01], &[&[0xAA], &[0xBB]]);

        mock.send(MANUFACTURER_KORG, &[0x01]).await.unwrap();

        let first = mock.receive(Duration::from_millis(10)).await.unwrap();
        assert_eq!(first.payload, vec![0xAA]);
        let second = mock.receive(Duration::from_millis(10)).await.unwrap();
        assert_eq!(second.payload, vec![0xBB]);
    }

    #[tokio::test]
    async fn wrong_payload_errors() {
        let mut mock = MockTransport::new();
        mock.expect(&[0x01], &[&[0x23]]);

        let result = mock.send(MANUFACTURER_KORG, &[0x99]).await;
        assert!(matches!(result.unwrap_err(), Error::Transport(_)));
    }

    #[tokio::test]
    async fn no_expectations_errors() {
        let mut mock = MockTransport::new();

        let result = mock.send(MANUFACTURER_KORG, &[0x01]).await;
        assert!(matches!(result.unwrap_err(), Error::Transport(_)));
    }

    #[tokio::test]
    async fn receive_without_send_times_out() {
        let mut mock = MockTransport::new();

        let result = mock.receive(Duration::from_millis(10)).await;
        assert!(matches!(result.unwrap_err(), Error::Timeout));
    }

    #[tokio::test]
    async fn pushed_frames_are_returned() {
        let mut mock = MockTransport::new();
        mock.push_frame(SysexFrame {
            manufacturer: 0x43,
            payload: vec![0x00],
        });

        let frame = mock.receive(Duration::from_millis(10)).await.unwrap();
        assert!(!frame.is_korg());
    }

    #[tokio::test]
    async fn disconnect() {
        let mut mock = MockTransport::new();
        assert!(mock.is_connected());

        mock.close().await.unwrap();
        assert!(!mock.is_connected());

        let result = mock.send(MANUFACTURER_KORG, &[0x01]).await;
        assert!(matches!(result.unwrap_err(), Error::NotConnected));

        let result = mock.receive(Duration::from_millis(10)).await;
        assert!(matches!(result.unwrap_err(), Error::NotConnected));
    }

    #[tokio::test]
    async fn remaining_expectations_counts_down() {
        let mut mock = MockTransport::new();
        mock.expect(&[0x01], &[&[0x23]]);
        mock.expect(&[0x02], &[&[0x23]]);
        assert_eq!(mock.remaining_expectations(), 2);

        mock.send(MANUFACTURER_KORG, &[0x01]).await.unwrap();
        assert_eq!(mock.remaining_expectations(), 1);

        mock.send(MANUFACTURER_KORG, &[0x02]).await.unwrap();
        assert_eq!(mock.remaining_expectations(), 0);
    }
}
