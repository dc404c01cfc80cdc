use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::error::{CompileError, Result};

const INDENT: &[u8] = b"    ";

/// Key/value separator used between an object key and its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `"key": value`
    Spaced,
    /// `"key":value`
    Tight,
}

/// How a document is laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonStyle {
    pub separator: Separator,
    /// Escape every non-ASCII character as `\uXXXX`.
    pub ascii_only: bool,
    pub trailing_newline: bool,
}

impl JsonStyle {
    /// Table descriptors: `": "` after keys, UTF-8 text, newline at the end.
    pub const TABLE: JsonStyle = JsonStyle {
        separator: Separator::Spaced,
        ascii_only: false,
        trailing_newline: true,
    };

    /// The CV document, byte-compatible with the committed `CMIP6_CV.json`
    /// files: `":"` after keys, ASCII only, no final newline.
    pub const CV: JsonStyle = JsonStyle {
        separator: Separator::Tight,
        ascii_only: true,
        trailing_newline: false,
    };
}

/// Four-space pretty printer whose key separator is configurable.
struct IndentFormatter<'a> {
    pretty: PrettyFormatter<'a>,
    separator: Separator,
    ascii_only: bool,
}

impl<'a> IndentFormatter<'a> {
    fn new(style: JsonStyle) -> Self {
        Self {
            pretty: PrettyFormatter::with_indent(INDENT),
            separator: style.separator,
            ascii_only: style.ascii_only,
        }
    }
}

impl Formatter for IndentFormatter<'_> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        match self.separator {
            Separator::Spaced => self.pretty.begin_object_value(writer),
            Separator::Tight => writer.write_all(b":"),
        }
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        if !self.ascii_only {
            return writer.write_all(fragment.as_bytes());
        }
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            // astral characters become a surrogate pair
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units).iter() {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Render `value` as four-space indented JSON laid out per `style`.
pub fn to_json_bytes<T: Serialize + ?Sized>(value: &T, style: JsonStyle) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, IndentFormatter::new(style));
    value.serialize(&mut ser)?;
    if style.trailing_newline {
        buf.push(b'\n');
    }
    Ok(buf)
}

fn write_tmp(tmp_path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut tmp = fs::File::create(tmp_path)?;
    tmp.write_all(bytes)?;
    tmp.sync_all()
}

/// Write `value` to `path` atomically: render, write a hidden sibling tmp
/// file, then rename it over the destination. A failed write removes the
/// tmp file.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, style: JsonStyle) -> Result<()> {
    let bytes = to_json_bytes(value, style).map_err(|e| CompileError::json(path, e))?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| CompileError::malformed(path, "output path has no file name"))?;
    let tmp_path: PathBuf = dir.join(format!(".{}.tmp", file_name));

    if let Err(e) = write_tmp(&tmp_path, &bytes) {
        let _ = fs::remove_file(&tmp_path);
        return Err(CompileError::io(&tmp_path, e));
    }
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(CompileError::io(path, e));
    }
    debug!(path = %path.display(), bytes = bytes.len(), "wrote json");
    Ok(())
}
