use std::fs;
use std::path::PathBuf;

use assembler::*;

/// Write `files` (name and contents) into a fresh directory.  Returns
/// the directory (which is removed when dropped) and the paths of the
/// files in order.
fn write_inputs(files: &[(&str, &str)]) -> (tempfile::TempDir, Vec<PathBuf>) {
    let dir = tempfile::tempdir().expect("should be able to create a temporary directory");
    let paths = files
        .iter()
        .map(|(name, body)| {
            let path = dir.path().join(name);
            fs::write(&path, body).expect("should be able to write test input");
            path
        })
        .collect();
    (dir, paths)
}

fn assemble_expecting_failure(files: &[(&str, &str)]) -> AssemblerFailure {
    let (dir, inputs) = write_inputs(files);
    let output = dir.path().join("out.bin");
    let options = AssemblyOptions {
        vector_table: false,
        list: false,
    };
    match assemble_files(&inputs, &output, &options) {
        Ok(()) => {
            panic!("assembly of {files:?} should have failed");
        }
        Err(e) => {
            assert!(
                !output.exists(),
                "no output should be written when assembly fails"
            );
            e
        }
    }
}

#[test]
fn syntax_error_names_file_and_line() {
    let e = assemble_expecting_failure(&[("bad.S", "main:\n    nop\n    frob r1\n")]);
    match &e {
        AssemblerFailure::SyntaxError { location, msg } => {
            assert!(location.source().ends_with("bad.S"));
            assert_eq!(location.line(), 3);
            assert!(msg.contains("frob"));
        }
        other => {
            panic!("expected a syntax error, got {other:?}");
        }
    }
    assert!(e.to_string().contains("bad.S:3"));
}

#[test]
fn duplicate_definitions_across_files() {
    let e = assemble_expecting_failure(&[
        ("one.S", "start:\n    nop\n"),
        ("two.S", "start:\n    ret\n"),
    ]);
    match e {
        AssemblerFailure::Redefinition {
            location,
            previous,
            strength,
            ..
        } => {
            assert!(location.source().ends_with("two.S"));
            assert!(previous.source().ends_with("one.S"));
            assert_eq!(strength, Strength::Strong);
        }
        other => {
            panic!("expected a redefinition, got {other:?}");
        }
    }
}

#[test]
fn operand_that_no_variant_accepts() {
    let e = assemble_expecting_failure(&[("mul.S", "    mulsu r30, r16\n")]);
    assert!(
        matches!(e, AssemblerFailure::CannotEncode { mnemonic: "mulsu", .. }),
        "got {e:?}"
    );
}

#[test]
fn missing_input_file() {
    let dir = tempfile::tempdir().expect("should be able to create a temporary directory");
    let missing = dir.path().join("missing.S");
    let output = dir.path().join("out.bin");
    match assemble_files(&[&missing], &output, &AssemblyOptions::default()) {
        Err(AssemblerFailure::Io(IoFailed {
            action: IoAction::Read,
            target: IoTarget::File(path),
            ..
        })) => {
            assert_eq!(path, missing);
        }
        other => {
            panic!("expected a read failure, got {other:?}");
        }
    }
    assert!(!output.exists());
}

#[test]
fn output_is_replaced() {
    let (dir, inputs) = write_inputs(&[("ok.S", "    nop\n    ret\n")]);
    let output = dir.path().join("out.bin");
    fs::write(&output, [0xAA_u8; 64]).expect("should be able to write stale output");
    let options = AssemblyOptions {
        vector_table: false,
        list: false,
    };
    assemble_files(&inputs, &output, &options).expect("assembly should succeed");
    assert_eq!(
        fs::read(&output).expect("output should exist"),
        vec![0x00, 0x00, 0x08, 0x95]
    );
}
