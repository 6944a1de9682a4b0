use lc3as::Error;

fn asm(source: &str) -> Result<(u16, Vec<u16>), Error> {
    lc3as::assemble(lc3as::parse(source)?)
}

fn words(source: &str) -> Vec<u16> {
    let (_, words) = asm(source).unwrap();
    words
}

#[test]
fn multiply_by_six() {
    let source = "\
.ORIG x3000
        LD R1, SIX
        LD R2, NUMBER
        AND R3, R3, #0
AGAIN   ADD R3, R3, R2
        ADD R1, R1, #-1
        BRp AGAIN
        HALT
NUMBER  .BLKW 1
SIX     .FILL #6
.END
";
    let (origin, words) = asm(source).unwrap();
    assert_eq!(origin, 0x3000);
    assert_eq!(
        words,
        vec![0x2207, 0x2405, 0x56E0, 0x16C2, 0x127F, 0x03FD, 0xF025, 0x0000, 0x0006]
    );
}

#[test]
fn add_register_and_immediate_forms() {
    assert_eq!(
        words(".ORIG x3000\nADD R1, R2, R3\nADD R1, R2, #-5\n.END"),
        vec![0x1283, 0x12BB]
    );
}

#[test]
fn logic_and_moves() {
    assert_eq!(
        words(".ORIG x3000\nAND R4, R4, #0\nNOT R0, R1\nRET\nRTI\n.END"),
        vec![0x5920, 0x907F, 0xC1C0, 0x8000]
    );
}

#[test]
fn control_flow() {
    let source = "\
.ORIG x3000
      JSR SUB
      JMP R2
      JSRR R3
      BR #2
HERE  BRnz HERE
SUB   HALT
.END
";
    // JSR SUB: offset 4, JMP R2, JSRR R3, BR with a literal offset,
    // BRnz to itself (offset -1).
    assert_eq!(
        words(source),
        vec![0x4804, 0xC080, 0x40C0, 0x0E02, 0x0DFF, 0xF025]
    );
}

#[test]
fn loads_and_stores() {
    let source = "\
.ORIG x3000
      LDR R1, R2, #10
      STR R3, R4, #-2
      LEA R0, DATA
      ST R5, DATA
      STI R6, DATA
      LDI R7, DATA
DATA  .FILL xBEEF
.END
";
    assert_eq!(
        words(source),
        vec![0x628A, 0x773E, 0xE003, 0x3A02, 0xBC01, 0xAE00, 0xBEEF]
    );
}

#[test]
fn traps() {
    assert_eq!(
        words(".ORIG x3000\nGETC\nOUT\nPUTS\nIN\nPUTSP\nHALT\nTRAP x25\n.END"),
        vec![0xF020, 0xF021, 0xF022, 0xF023, 0xF024, 0xF025, 0xF025]
    );
}

#[test]
fn data_directives() {
    let (origin, words) = asm(".ORIG x4000\n.FILL #-1\n.BLKW 3\n.STRINGZ \"Hi\"\n.END").unwrap();
    assert_eq!(origin, 0x4000);
    assert_eq!(
        words,
        vec![0xFFFF, 0x0000, 0x0000, 0x0000, 0x0048, 0x0069, 0x0000]
    );
}

#[test]
fn block_sizes_shift_later_labels() {
    let source = "\
.ORIG x3000
      LD R0, DATA
      .BLKW 2
MSG   .STRINGZ \"ok\"
DATA  .FILL #1
.END
";
    // DATA sits at x3006: one LD, two reserved words, then "ok" plus its
    // terminator.
    assert_eq!(words(source)[0], 0x2005);
}

#[test]
fn undefined_label() {
    let result = asm(".ORIG x3000\nLD R0, NOWHERE\n.END");
    assert!(matches!(result, Err(Error::UndefinedLabel { label, .. }) if label == "NOWHERE"));
}

#[test]
fn redefined_label() {
    let result = asm(".ORIG x3000\nA HALT\nA HALT\n.END");
    assert!(matches!(result, Err(Error::RedefinedLabel { label, .. }) if label == "A"));

    // The diagnostic names the offending label.
    let message = asm(".ORIG x3000\nA HALT\nA HALT\n.END")
        .unwrap_err()
        .to_string();
    assert!(message.contains("`A`"), "{message}");
}

#[test]
fn negative_block_count() {
    let result = asm(".ORIG x3000\n.BLKW -1\n.END");
    assert!(matches!(
        result,
        Err(Error::ImmediateOutOfRange { value: -1, lo: 0, .. })
    ));
}

#[test]
fn offset_out_of_range() {
    let result = asm(".ORIG x3000\nBR FAR\n.BLKW 300\nFAR HALT\n.END");
    assert!(matches!(
        result,
        Err(Error::OffsetOutOfRange { bits: 9, .. })
    ));
}

#[test]
fn empty_program() {
    assert!(matches!(asm(""), Err(Error::EmptyProgram)));
}

#[test]
fn missing_orig() {
    let result = asm("HALT\n.END");
    assert!(matches!(result, Err(Error::MissingOrig(_))));
}

#[test]
fn multiple_orig() {
    let result = asm(".ORIG x3000\nHALT\n.ORIG x4000\n.END");
    assert!(matches!(result, Err(Error::MultipleOrig)));
}

#[test]
fn validation_runs_before_encoding() {
    let result = asm(".ORIG x3000\nADD R1, R2\n.END");
    assert!(matches!(
        result,
        Err(Error::OperandCount {
            expected: 3,
            got: 2,
            ..
        })
    ));
}
