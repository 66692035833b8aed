//! Error types for vtxlib.
//!
//! All fallible operations across the library return [`Result<T>`], which
//! uses [`Error`] as the error type. Transport-layer, codec-layer, and
//! exchange-layer errors are all captured here.

/// The error type for all vtxlib operations.
///
/// Variants cover the full range of failure modes encountered when
/// talking to a VT-X amplifier: physical MIDI transport failures,
/// SysEx decode errors, device rejections, and timeouts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A read ran past the end of the buffer.
    ///
    /// Decoding never indexes out of bounds; any structurally short
    /// payload surfaces as this error with the shortfall recorded.
    #[error("truncated data: needed {needed} more byte(s), {remaining} remaining")]
    Truncated {
        /// Number of bytes the read required.
        needed: usize,
        /// Number of bytes actually left in the buffer.
        remaining: usize,
    },

    /// A message parser did not recognize the payload's prefix.
    ///
    /// This is the dispatcher's "not mine, try the next parser" signal.
    /// It never escapes message dispatch to callers; if no parser
    /// claims a payload the caller sees
    /// [`Error::UnrecognizedMessage`] instead.
    #[error("message prefix not recognized")]
    PrefixNotRecognized,

    /// A payload matched a known message prefix but its body is malformed.
    ///
    /// Unlike [`Error::PrefixNotRecognized`], this aborts dispatch
    /// immediately: the frame is provably corrupt, not merely foreign.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// No known message type matched the payload.
    #[error("unrecognized message")]
    UnrecognizedMessage,

    /// More than one message type claimed the same payload.
    ///
    /// This indicates overlapping prefixes in the message taxonomy and is
    /// always reported, never silently resolved in favor of one parser.
    #[error("ambiguous message: matched {}", kinds.join(", "))]
    AmbiguousMessage {
        /// Names of the message kinds that all accepted the payload.
        kinds: Vec<&'static str>,
    },

    /// A wire byte did not map to any variant of a protocol enumeration.
    #[error("unknown {what} value: 0x{value:02X}")]
    UnknownEnumValue {
        /// Which enumeration was being decoded (e.g. "amp model").
        what: &'static str,
        /// The offending wire byte.
        value: u8,
    },

    /// The amplifier rejected a command with an error report.
    #[error("device rejected command (code 0x{code:02X})")]
    NotAcknowledged {
        /// The error code byte from the device's error report.
        code: u8,
    },

    /// Timed out waiting for a response from the amplifier.
    ///
    /// This typically indicates the amp is powered off, the wrong MIDI
    /// port is selected, or a cable is unplugged.
    #[error("timeout waiting for response")]
    Timeout,

    /// The exchange was cancelled before a response arrived.
    #[error("exchange cancelled")]
    Cancelled,

    /// An invalid parameter was passed to a library call.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A transport-level error (MIDI port open/send/receive failure).
    #[error("transport error: {0}")]
    Transport(String),

    /// No connection to the amplifier has been established.
    #[error("not connected")]
    NotConnected,

    /// The connection to the amplifier was lost unexpectedly.
    #[error("connection lost")]
    ConnectionLost,

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_truncated() {
        let e = Error::Truncated {
            needed: 2,
            remaining: 1,
        };
        assert_eq!(
            e.to_string(),
            "truncated data: needed 2 more byte(s), 1 remaining"
        );
    }

    #[test]
    fn error_display_prefix_not_recognized() {
        let e = Error::PrefixNotRecognized;
        assert_eq!(e.to_string(), "message prefix not recognized");
    }

    #[test]
    fn error_display_invalid_message() {
        let e = Error::InvalidMessage("reserved byte 0x22 is 0x7F".into());
        assert_eq!(e.to_string(), "invalid message: reserved byte 0x22 is 0x7F");
    }

    #[test]
    fn error_display_unrecognized_message() {
        let e = Error::UnrecognizedMessage;
        assert_eq!(e.to_string(), "unrecognized message");
    }

    #[test]
    fn error_display_ambiguous_message() {
        let e = Error::AmbiguousMessage {
            kinds: vec!["Ack", "DeviceError"],
        };
        assert_eq!(e.to_string(), "ambiguous message: matched Ack, DeviceError");
    }

    #[test]
    fn error_display_unknown_enum_value() {
        let e = Error::UnknownEnumValue {
            what: "amp model",
            value: 0x7F,
        };
        assert_eq!(e.to_string(), "unknown amp model value: 0x7F");
    }

    #[test]
    fn error_display_not_acknowledged() {
        let e = Error::NotAcknowledged { code: 0x02 };
        assert_eq!(e.to_string(), "device rejected command (code 0x02)");
    }

    #[test]
    fn error_display_timeout() {
        let e = Error::Timeout;
        assert_eq!(e.to_string(), "timeout waiting for response");
    }

    #[test]
    fn error_display_cancelled() {
        let e = Error::Cancelled;
        assert_eq!(e.to_string(), "exchange cancelled");
    }

    #[test]
    fn error_display_invalid_parameter() {
        let e = Error::InvalidParameter("dial value out of range".into());
        assert_eq!(e.to_string(), "invalid parameter: dial value out of range");
    }

    #[test]
    fn error_display_transport() {
        let e = Error::Transport("port busy".into());
        assert_eq!(e.to_string(), "transport error: port busy");
    }

    #[test]
    fn error_display_not_connected() {
        let e = Error::NotConnected;
        assert_eq!(e.to_string(), "not connected");
    }

    #[test]
    fn error_display_connection_lost() {
        let e = Error::ConnectionLost;
        assert_eq!(e.to_string(), "connection lost");
    }

    #[test]
    fn error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broken");
        let e: Error = io_err.into();
        assert!(matches!(e, Error::Io(_)));
        assert!(e.to_string().contains("pipe broken"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        // io::Error is Send + Sync, so our Error should be too.
        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<Error>();
    }

    #[test]
    fn result_alias_works() {
        let ok: Result<u32> = Ok(42);
        match ok {
            Ok(val) => assert_eq!(val, 42),
            Err(_) => panic!("expected Ok"),
        }

        let err: Result<u32> = Err(Error::Timeout);
        assert!(err.is_err());
    }
}
