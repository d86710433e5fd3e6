//! Indentation-aware text writer for generated Elm.

use std::fmt::{Result, Write};

/// Writes lines of Elm source to an underlying [`Write`] target.
///
/// Layout follows `elm-format`: every top-level declaration is preceded
/// by two blank lines via [`CodeWriter::declaration`].
pub struct CodeWriter<'a, W: Write> {
    writer: &'a mut W,
    indent_str: &'a str,
    indent_level: usize,
}

impl<'a, W: Write> CodeWriter<'a, W> {
    /// Creates a writer using `indent_str` for one level of indentation
    pub fn new(writer: &'a mut W, indent_str: &'a str) -> Self {
        Self {
            writer,
            indent_str,
            indent_level: 0,
        }
    }

    /// Increase indentation by one level
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indentation by one level
    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn write_indent(&mut self) -> Result {
        for _ in 0..self.indent_level {
            self.writer.write_str(self.indent_str)?;
        }
        Ok(())
    }

    /// Write one indented line. Empty lines carry no indentation.
    pub fn line(&mut self, s: &str) -> Result {
        if !s.is_empty() {
            self.write_indent()?;
        }
        writeln!(self.writer, "{}", s)
    }

    /// Write an empty line
    pub fn blank(&mut self) -> Result {
        writeln!(self.writer)
    }

    /// Start a new top-level declaration at column zero
    pub fn declaration(&mut self) -> Result {
        self.indent_level = 0;
        self.blank()?;
        self.blank()
    }
}

/// Quote `s` as an Elm string literal
pub fn elm_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            _ if c.is_control() => {
                result.push_str(&format!("\\u{{{:04X}}}", c as u32));
            }
            _ => result.push(c),
        }
    }
    result.push('"');
    result
}

/// Wrap an Elm expression in parentheses when it is an application
pub fn paren(expr: &str) -> String {
    if expr.contains(' ') && !expr.starts_with('(') && !expr.starts_with('"') {
        format!("({})", expr)
    } else {
        expr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation() {
        let mut out = String::new();
        let mut w = CodeWriter::new(&mut out, "    ");
        w.line("a =").unwrap();
        w.indent();
        w.line("b").unwrap();
        w.line("").unwrap();
        w.dedent();
        w.dedent();
        w.line("c").unwrap();
        assert_eq!(out, "a =\n    b\n\nc\n");
    }

    #[test]
    fn test_declaration_resets_indent() {
        let mut out = String::new();
        let mut w = CodeWriter::new(&mut out, "  ");
        w.indent();
        w.line("x").unwrap();
        w.declaration().unwrap();
        w.line("y").unwrap();
        assert_eq!(out, "  x\n\n\ny\n");
    }

    #[test]
    fn test_elm_string() {
        assert_eq!(elm_string("hello"), "\"hello\"");
        assert_eq!(elm_string("a\"b"), "\"a\\\"b\"");
        assert_eq!(elm_string("a\\b"), "\"a\\\\b\"");
        assert_eq!(elm_string("\u{1}"), "\"\\u{0001}\"");
    }

    #[test]
    fn test_paren() {
        assert_eq!(paren("JD.int"), "JD.int");
        assert_eq!(paren("JD.list JD.int"), "(JD.list JD.int)");
        assert_eq!(paren("\"\""), "\"\"");
    }
}
