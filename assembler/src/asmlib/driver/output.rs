//! Writing the program image.
//!
//! The image is the program words in address order, each word stored
//! least significant byte first, with no header.  It is loaded at
//! address 0.
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{event, Level};

use super::super::types::{AssemblerFailure, IoAction, IoFailed, IoTarget};

fn write_data<W: Write>(writer: &mut W, words: &[u16]) -> Result<(), std::io::Error> {
    const OUTPUT_CHUNK_SIZE: usize = 1024;
    for chunk in words.chunks(OUTPUT_CHUNK_SIZE) {
        let buf: Vec<u8> = chunk.iter().flat_map(|w| w.to_le_bytes()).collect();
        writer.write_all(&buf)?;
    }
    writer.flush()
}

pub(super) fn write_program(output_file_name: &Path, words: &[u16]) -> Result<(), AssemblerFailure> {
    let fail = |error| {
        AssemblerFailure::Io(IoFailed {
            action: IoAction::Write,
            target: IoTarget::File(output_file_name.to_path_buf()),
            error,
        })
    };
    event!(
        Level::DEBUG,
        "writing {} bytes to {}",
        words.len() * 2,
        output_file_name.display()
    );
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(output_file_name)
        .map_err(fail)?;
    let mut writer = BufWriter::new(file);
    write_data(&mut writer, words).map_err(fail)
}
