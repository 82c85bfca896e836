use std::fs;
use std::path::PathBuf;

use cmdtree_text::{DEFAULT_WIDTH, Lexer, Token, display_width, reflow};
use regex::Regex;

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()))
}

fn words(text: &str) -> Vec<String> {
    Lexer::new(text)
        .flat_map(|token| match token {
            Token::Word(word) => vec![word],
            // Continuation lines of indented output lex as verbatim.
            Token::Verbatim(line) => line.split_whitespace().map(String::from).collect(),
            Token::ParagraphBreak => Vec::new(),
        })
        .collect()
}

#[test]
fn test_fixture_has_no_double_blank_lines() {
    let out = reflow(&fixture("description.txt"), DEFAULT_WIDTH, "    ");
    let double_blank = Regex::new(r"(?m)^$\n^$\n").unwrap();
    assert!(!double_blank.is_match(&out), "found 2 empty lines in sequence:\n{out}");
    assert!(!out.starts_with('\n'));
    assert!(out.ends_with('\n'));
    assert!(!out.ends_with("\n\n"));
}

#[test]
fn test_fixture_lines_fit_width() {
    let out = reflow(&fixture("description.txt"), DEFAULT_WIDTH, "    ");
    for line in out.lines() {
        // Verbatim lines carry the extra indent and are exempt.
        if line.starts_with("      ") {
            continue;
        }
        assert!(
            display_width(line, 0) <= DEFAULT_WIDTH,
            "line exceeds width: {line:?}"
        );
    }
}

#[test]
fn test_fixture_verbatim_lines_survive() {
    let out = reflow(&fixture("description.txt"), DEFAULT_WIDTH, "    ");
    assert!(out.contains("\n      bench run --codec lz4 --repeat 5 corpus/\n"));
    assert!(out.contains("\n      bench run --codec zstd,xz corpus/large/\n"));
    assert!(out.contains("\n      so that disk speed does not influence the measurement\n"));
}

#[test]
fn test_reflow_preserves_word_sequence() {
    let paragraph = "Ein Satz mit einigen Wörtern, die über mehrere Zeilen verteilt \
                     werden müssen, weil die Zeilenbreite klein ist.";
    for width in [1, 10, 17, 40, 200] {
        let out = reflow(paragraph, width, "  ");
        assert_eq!(words(&out), words(paragraph), "width {width}");
    }
}

#[test]
fn test_reflow_respects_width_for_every_line() {
    let paragraph = "lorem ipsum dolor sit amet consectetur adipiscing elit sed do \
                     eiusmod tempor incididunt ut labore et dolore magna aliqua";
    for width in [15, 20, 33] {
        let out = reflow(paragraph, width, "   ");
        for line in out.lines() {
            assert!(line.chars().count() <= width, "width {width}: {line:?}");
        }
    }
}
