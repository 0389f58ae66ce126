//! Parse/format matrix over representative RFC 6901 pointers.

use docbin_json_pointer::{array_index, JsonPointer, PointerError};

#[test]
fn parse_matrix() {
    let cases: &[(&str, &[&str])] = &[
        ("", &[]),
        ("/", &[""]),
        ("/foo", &["foo"]),
        ("/foo/0", &["foo", "0"]),
        ("/a~1b", &["a/b"]),
        ("/m~0n", &["m~n"]),
        ("/a~1b/~0~1/9", &["a/b", "~/", "9"]),
        ("//", &["", ""]),
        ("/ ", &[" "]),
        ("/-", &["-"]),
    ];
    for (text, expected) in cases {
        let ptr = JsonPointer::parse(text).unwrap();
        assert_eq!(ptr.tokens(), *expected, "tokens of {text:?}");
        assert_eq!(ptr.to_string(), *text, "format of {text:?}");
    }
}

#[test]
fn relative_pointers_are_rejected() {
    for text in ["foo", "a/b", "~", "-"] {
        assert_eq!(
            JsonPointer::parse(text),
            Err(PointerError::NotAbsolute),
            "{text:?} must be rejected"
        );
    }
}

#[test]
fn array_index_matrix() {
    let accepted = [("0", 0i64), ("7", 7), ("10", 10), ("4294967296", 1 << 32)];
    for (token, expected) in accepted {
        assert_eq!(array_index(token), Some(expected));
    }
    for token in ["", "-", "-0", "00", "007", "1.5", "0x1", "١"] {
        assert_eq!(array_index(token), None, "{token:?} must be rejected");
    }
}
