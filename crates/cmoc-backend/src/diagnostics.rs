//! Debug echo of the device compiler command line.
//!
//! Written to stderr only when [`BridgeConfig::debug`](crate::BridgeConfig)
//! is set. Write errors are ignored; the echo never affects control flow.

use std::io::{self, Write};

/// Write `s` wrapped in `quote`, backslash-escaping any `quote` inside it.
pub fn write_escaped<W: Write>(out: &mut W, s: &str, quote: char) -> io::Result<()> {
    let mut buf = String::with_capacity(s.len() + 2);
    buf.push(quote);
    for c in s.chars() {
        if c == quote {
            buf.push('\\');
        }
        buf.push(c);
    }
    buf.push(quote);
    out.write_all(buf.as_bytes())
}

/// Write every argument escaped with [`write_escaped`], each followed by a
/// space, then a newline.
pub fn write_escaped_args<W, S>(out: &mut W, args: &[S], quote: char) -> io::Result<()>
where
    W: Write,
    S: AsRef<str>,
{
    for arg in args {
        write_escaped(out, arg.as_ref(), quote)?;
        out.write_all(b" ")?;
    }
    out.write_all(b"\n")
}

/// Echo one labelled line.
pub(crate) fn echo<W: Write>(out: &mut W, label: &str, value: &str) {
    let _ = writeln!(out, "{label}: {value}");
}

/// Echo the escaped argument vector on one labelled line.
pub(crate) fn echo_args<W: Write, S: AsRef<str>>(out: &mut W, label: &str, args: &[S]) {
    let _ = write!(out, "{label}: ");
    let _ = write_escaped_args(out, args, '"');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(s: &str, quote: char) -> String {
        let mut out = Vec::new();
        write_escaped(&mut out, s, quote).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn plain_argument() {
        assert_eq!(escaped("-device", '"'), "\"-device\"");
    }

    #[test]
    fn quote_inside_is_escaped() {
        assert_eq!(escaped("a\"b", '"'), "\"a\\\"b\"");
        assert_eq!(escaped("-llvm-options='-O2'", '\''), "'-llvm-options=\\'-O2\\''");
    }

    #[test]
    fn other_quotes_untouched() {
        assert_eq!(escaped("'x'", '"'), "\"'x'\"");
    }

    #[test]
    fn empty_argument() {
        assert_eq!(escaped("", '"'), "\"\"");
    }

    #[test]
    fn argument_list() {
        let mut out = Vec::new();
        write_escaped_args(&mut out, &["ocloc", "compile", "-q"], '"').unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\"ocloc\" \"compile\" \"-q\" \n"
        );
    }

    #[test]
    fn labelled_echo() {
        let mut out = Vec::new();
        echo(&mut out, "IGC Translation Options", "-vc-codegen");
        echo_args(&mut out, "oclocInvoke options", &["-device", "tgllp"]);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "IGC Translation Options: -vc-codegen\n\
             oclocInvoke options: \"-device\" \"tgllp\" \n"
        );
    }
}
