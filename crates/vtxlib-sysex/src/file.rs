//! Offline program library files.
//!
//! The editor software saves program banks as a flat file: a 32-byte
//! magic header followed by any number of file-layout program records.
//! There is no count field; the record count is implied by the file
//! length.

use vtxlib_core::error::{Error, Result};
use vtxlib_core::types::Program;

use crate::program::{self, FILE_PROGRAM_LEN};

/// Header opening every library file: a 28-byte ASCII tag padded with
/// four zero bytes.
pub const LIBRARY_MAGIC: [u8; 32] = *b"VOX VTX PROGRAM LIBRARY FILE\x00\x00\x00\x00";

/// Decode a library file into its programs.
///
/// An empty library (header only) is valid and yields an empty vec.
pub fn decode_library(bytes: &[u8]) -> Result<Vec<Program>> {
    if bytes.len() < LIBRARY_MAGIC.len() {
        return Err(Error::InvalidMessage(format!(
            "library file is {} bytes, shorter than the {}-byte header",
            bytes.len(),
            LIBRARY_MAGIC.len()
        )));
    }
    if bytes[..LIBRARY_MAGIC.len()] != LIBRARY_MAGIC {
        return Err(Error::InvalidMessage(
            "library file header mismatch".into(),
        ));
    }
    let body = &bytes[LIBRARY_MAGIC.len()..];
    if body.len() % FILE_PROGRAM_LEN != 0 {
        return Err(Error::InvalidMessage(format!(
            "library body is {} bytes, not a multiple of the {FILE_PROGRAM_LEN}-byte record size",
            body.len()
        )));
    }
    body.chunks_exact(FILE_PROGRAM_LEN)
        .map(program::decode_file_program)
        .collect()
}

/// Encode programs into a library file.
pub fn encode_library(programs: &[Program]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(LIBRARY_MAGIC.len() + programs.len() * FILE_PROGRAM_LEN);
    out.extend_from_slice(&LIBRARY_MAGIC);
    for program in programs {
        out.extend_from_slice(&program::encode_file_program(program)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::sample_program;
    use vtxlib_core::types::ProgramName;

    #[test]
    fn round_trip_multiple_programs() {
        let mut second = sample_program();
        second.name = ProgramName::new("CLEAN").unwrap();
        let programs = vec![sample_program(), second];
        let bytes = encode_library(&programs).unwrap();
        assert_eq!(bytes.len(), 32 + 2 * FILE_PROGRAM_LEN);
        assert_eq!(decode_library(&bytes).unwrap(), programs);
    }

    #[test]
    fn empty_library_is_valid() {
        let bytes = encode_library(&[]).unwrap();
        assert_eq!(bytes, LIBRARY_MAGIC);
        assert!(decode_library(&bytes).unwrap().is_empty());
    }

    #[test]
    fn short_file_rejected() {
        assert!(matches!(
            decode_library(&LIBRARY_MAGIC[..20]),
            Err(Error::InvalidMessage(_))
        ));
    }

    #[test]
    fn wrong_magic_rejected() {
        let mut bytes = encode_library(&[sample_program()]).unwrap();
        bytes[0] = b'X';
        assert!(matches!(
            decode_library(&bytes),
            Err(Error::InvalidMessage(_))
        ));
    }

    #[test]
    fn ragged_body_rejected() {
        let mut bytes = encode_library(&[sample_program()]).unwrap();
        bytes.pop();
        match decode_library(&bytes) {
            Err(Error::InvalidMessage(msg)) => {
                assert!(msg.contains("multiple"), "unexpected message: {msg}");
            }
            other => panic!("expected InvalidMessage, got {other:?}"),
        }
    }

    #[test]
    fn corrupt_record_rejected() {
        let mut bytes = encode_library(&[sample_program()]).unwrap();
        // Nonzero reserved byte inside the record.
        bytes[32 + 0x15] = 0x7F;
        assert!(decode_library(&bytes).is_err());
    }
}
