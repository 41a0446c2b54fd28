//! Error handling tests for vtty-terminal

use vtty_terminal::{
    create_terminal, ScreenBuffer, Terminal, TerminalConfig, TerminalError, VirtualTerminal,
};

#[test]
fn test_zero_dimensions_rejected() {
    for (width, height) in [(0, 0), (0, 10), (10, 0)] {
        match create_terminal(width, height) {
            Err(TerminalError::InvalidDimensions { width: w, height: h }) => {
                assert_eq!((w, h), (width, height));
            }
            other => panic!("expected InvalidDimensions, got {other:?}"),
        }
        assert!(Terminal::new(width, height).is_err());
    }
}

#[test]
fn test_zero_tab_width_rejected() {
    let config = TerminalConfig::new(10, 2).with_tab_width(0);
    assert!(matches!(
        VirtualTerminal::with_config(config),
        Err(TerminalError::InvalidConfig(_))
    ));
}

#[test]
fn test_error_messages() {
    let err = create_terminal(0, 4).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid terminal dimensions: 0x4 (both must be positive)"
    );

    let err = create_terminal(4, 1)
        .unwrap()
        .write_primary([0xff])
        .unwrap_err();
    assert!(err.to_string().starts_with("UTF-8 decoding error"));
}

#[test]
fn test_invalid_utf8_rejected_without_mutation() {
    let term = create_terminal(10, 2).unwrap();
    term.write_primary("ok\x1b[").unwrap();
    let before = term.capture();

    let invalid_utf8_sequences: [&[u8]; 8] = [
        &[0xFF, 0xFE],             // Invalid start bytes
        &[0xC0, 0x80],             // Overlong encoding
        &[0xE0, 0x80, 0x80],       // Overlong encoding
        &[0xF4, 0x90, 0x80, 0x80], // Out of range
        &[0xED, 0xA0, 0x80],       // Surrogate half
        &[b'x', 0xC2],             // Incomplete sequence
        &[b'y', 0xE0, 0xA0],       // Incomplete sequence
        &[b'z', 0xF0, 0x90, 0x80], // Incomplete sequence
    ];

    for seq in invalid_utf8_sequences {
        assert!(matches!(
            term.write_secondary(seq),
            Err(TerminalError::Decode(_))
        ));
        assert_eq!(term.capture(), before);
    }

    // The pending CSI survived the rejected chunks
    term.write_primary("3Cx").unwrap();
    assert_eq!(term.trimmed_snapshot(), "ok   x");
}

#[test]
fn test_malformed_sequences_do_not_corrupt_grid() {
    let mut term = Terminal::new(20, 4).unwrap();

    let malformed = [
        "\x1b[999999999999999999m", // Huge number
        "\x1b[;;;;;m",              // Multiple semicolons
        "\x1b[\x00m",               // Null byte in sequence
        "\x1b[38;5m",               // Missing color value
        "\x1b[5J",                  // Unknown erase mode
        "\x1b[9K",                  // Unknown erase mode
        "\x1b[>c",                  // Private device attributes
        "\x1b[1$p",                 // Intermediate byte
        "\x1b#8",                   // Two-char sequence, '8' is printed
        "\x1b(0",                   // Two-char sequence, '0' is printed
        "\x1bP1$r\x1b\\",           // DCS, first byte dropped as two-char sequence
    ];

    for seq in malformed {
        term.process(seq);
    }
    assert_eq!(term.render().lines().next().unwrap().trim_end(), "801$r");
    assert_eq!(term.cursor_position(), (0, 5));

    term.process("\r\x1b[2Kclean");
    assert_eq!(term.render().lines().next().unwrap().trim_end(), "clean");
    assert!(term.render().lines().skip(1).all(|line| line.trim().is_empty()));
}

#[test]
fn test_incomplete_sequences_at_end_of_input() {
    let incomplete_sequences = ["\x1b", "\x1b[", "\x1b[3", "\x1b[38;5", "\x1b]", "\x1b]0", "\x1b[1 "];

    for seq in incomplete_sequences {
        let mut term = Terminal::new(8, 2).unwrap();
        term.process("ab");
        term.process(seq);
        assert_eq!(term.render(), "ab      \n        ", "after {seq:?}");
    }
}

#[test]
fn test_extreme_cursor_positions() {
    let mut term = Terminal::new(5, 3).unwrap();
    term.process("\x1b[65535;65535H");
    assert_eq!(term.cursor_position(), (2, 4));
    term.process("\x1b[65535A\x1b[65535D");
    assert_eq!(term.cursor_position(), (0, 0));
    term.process("\x1b[0;0H");
    assert_eq!(term.cursor_position(), (0, 0));
}

#[test]
#[should_panic(expected = "outside 3x2 grid")]
fn test_direct_out_of_range_access_panics() {
    let buffer = ScreenBuffer::new(3, 2);
    buffer.get(2, 0);
}

#[test]
fn test_minimum_size_terminal() {
    let term = create_terminal(1, 1).unwrap();
    term.write_primary("abc\tz\x08\x1b[5;5Hq").unwrap();
    assert_eq!(term.snapshot(), "q");
    assert_eq!(term.cursor_position(), (0, 0));
}
