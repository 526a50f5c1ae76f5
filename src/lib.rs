//! # hipack
//!
//! A reader and writer for HiPack, a compact text format for structured
//! data with per-value annotations.
//!
//! ## What is HiPack?
//!
//! HiPack covers the same ground as JSON (booleans, numbers, strings, lists
//! and dicts) with a lighter syntax aimed at configuration files and
//! hand-written data:
//!
//! ```text
//! # Comments run to the end of the line.
//! name: "probe"
//! enabled: True
//! retries 0x10
//! ports [8080 8081]
//! limits {
//!   depth: 128
//! }
//! ```
//!
//! - The top level is a dict whose braces may be left out
//! - The `:` after a key is optional, and commas and whitespace are
//!   interchangeable item separators
//! - Integers may be written in decimal, hexadecimal (`0x2A`) or octal (`052`)
//! - Any value may carry annotations (`:tag value`), which are handed to a
//!   user hook instead of being stored in the tree
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! hipack = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Dynamic values
//!
//! ```rust
//! use hipack::{dump, load, Value};
//!
//! let dict = load("value { a 1, b 2 }").unwrap().unwrap();
//! assert_eq!(dict.get("value").and_then(|v| v.get("b")), Some(&Value::from(2)));
//!
//! assert_eq!(dump(&dict).unwrap(), "value {\n  a: 1\n  b: 2\n}\n");
//! ```
//!
//! ### Serde
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use hipack::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Server {
//!     host: String,
//!     port: u16,
//!     secure: bool,
//! }
//!
//! let server = Server { host: "localhost".to_string(), port: 8080, secure: false };
//!
//! let text = to_string(&server).unwrap();
//! assert_eq!(text, "host: \"localhost\"\nport: 8080\nsecure: False\n");
//!
//! let back: Server = from_str(&text).unwrap();
//! assert_eq!(server, back);
//! ```
//!
//! ## Annotations and hooks
//!
//! The core value model knows nothing of annotations. On decode, every value
//! below the top level goes through a [`Cast`] together with its tags and
//! literal text; on encode, a [`ValueHook`] decides which tags to write. See
//! [`hook`] for details.
//!
//! ## Logging
//!
//! Entry points emit `tracing` events (`debug` per call, `trace` when a
//! hook replaces a value). No subscriber is installed by the library.

pub mod annotations;
pub mod chars;
pub mod cursor;
pub mod de;
pub mod error;
pub mod hook;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;
pub mod value;

pub use annotations::Annotations;
pub use de::Parser;
pub use error::{Error, Result};
pub use hook::{cast_fn, value_fn, Cast, Identity, ValueHook};
pub use map::Dict;
pub use options::HipackOptions;
pub use ser::{Dumper, ValueSerializer};
pub use value::{Number, Value};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Parses a HiPack document into a [`Dict`].
///
/// Returns `Ok(None)` when the input holds nothing but whitespace and
/// comments.
///
/// # Examples
///
/// ```rust
/// use hipack::{load, Value};
///
/// let dict = load("answer: 42").unwrap().unwrap();
/// assert_eq!(dict.get("answer"), Some(&Value::from(42)));
///
/// assert_eq!(load("  # nothing here\n").unwrap(), None);
/// ```
///
/// # Errors
///
/// Returns [`Error::Decode`] with the location of the first grammar
/// violation.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn load(input: &str) -> Result<Option<Dict>> {
    load_with(input, &HipackOptions::default(), Identity)
}

/// Parses a HiPack document, passing every value through `cast`.
///
/// # Errors
///
/// Returns [`Error::Decode`] for grammar violations and for nesting beyond
/// `options.max_depth`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn load_with<C: Cast>(input: &str, options: &HipackOptions, cast: C) -> Result<Option<Dict>> {
    tracing::debug!(input_len = input.len(), "loading hipack message");
    let parser = Parser::new(input, options, cast);
    let result = parser.parse_message();
    match &result {
        Ok(Some(dict)) => tracing::debug!(keys = dict.len(), "loaded hipack message"),
        Ok(None) => tracing::debug!("empty hipack message"),
        Err(e) => tracing::debug!(error = %e, "failed to load hipack message"),
    }
    result
}

/// Writes `dict` as indented HiPack text.
///
/// # Examples
///
/// ```rust
/// use hipack::{dump, hipack};
///
/// let data = hipack!({ "c": 1, "b": 2, "a": 3 });
/// assert_eq!(dump(data.as_dict().unwrap()).unwrap(), "a: 3\nb: 2\nc: 1\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::Encode`] for values HiPack cannot represent.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn dump(dict: &Dict) -> Result<String> {
    dump_with(dict, &HipackOptions::default(), Identity)
}

/// Writes `dict` as single-line HiPack text.
///
/// # Errors
///
/// Returns [`Error::Encode`] for values HiPack cannot represent.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn dump_compact(dict: &Dict) -> Result<String> {
    dump_with(dict, &HipackOptions::compact(), Identity)
}

/// Writes `dict` using the given options and no annotations.
///
/// # Errors
///
/// Returns [`Error::Encode`] for values HiPack cannot represent.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn dump_with_options(dict: &Dict, options: &HipackOptions) -> Result<String> {
    dump_with(dict, options, Identity)
}

/// Writes `dict`, asking `hook` for the annotations of every value.
///
/// # Errors
///
/// Returns [`Error::Encode`] for values HiPack cannot represent, for keys
/// or tags that would not read back, and for nesting beyond
/// `options.max_depth`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn dump_with<H: ValueHook>(dict: &Dict, options: &HipackOptions, hook: H) -> Result<String> {
    tracing::debug!(keys = dict.len(), compact = options.compact, "dumping hipack message");
    let mut dumper = Dumper::new(options, hook);
    dumper.dump_message(dict)?;
    let output = dumper.into_inner();
    tracing::debug!(output_len = output.len(), "dumped hipack message");
    Ok(output)
}

/// Converts any `T: Serialize` to a [`Value`].
///
/// # Examples
///
/// ```rust
/// use hipack::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(value.get("y"), Some(&Value::from(2)));
/// ```
///
/// # Errors
///
/// Returns [`Error::Encode`] for `None`, `()` and non-string map keys.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    ser::to_value(value)
}

/// Converts a [`Value`] into any `T: Deserialize`.
///
/// # Errors
///
/// Returns [`Error::Message`] when the shape of `value` does not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(de::ValueDeserializer::new(value))
}

fn root_dict<T>(value: &T) -> Result<Dict>
where
    T: ?Sized + Serialize,
{
    match to_value(value)? {
        Value::Dict(dict) => Ok(dict),
        other => Err(Error::encode(format!(
            "top-level value must be a dict, found {}",
            other.kind()
        ))),
    }
}

/// Serializes any `T: Serialize` to indented HiPack text.
///
/// # Errors
///
/// Returns [`Error::Encode`] if `value` does not serialize to a dict or
/// contains values HiPack cannot represent.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &HipackOptions::default())
}

/// Serializes any `T: Serialize` to single-line HiPack text.
///
/// # Examples
///
/// ```rust
/// use hipack::to_string_compact;
/// use std::collections::BTreeMap;
///
/// let mut map = BTreeMap::new();
/// map.insert("value", vec![1, 2, 3]);
/// assert_eq!(to_string_compact(&map).unwrap(), "value[1,2,3]");
/// ```
///
/// # Errors
///
/// Same as [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_compact<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &HipackOptions::compact())
}

/// Serializes any `T: Serialize` to HiPack text with custom options.
///
/// # Errors
///
/// Same as [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &HipackOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let dict = root_dict(value)?;
    dump_with(&dict, options, Identity)
}

/// Serializes any `T: Serialize` as indented HiPack text into a writer.
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails, otherwise the same errors as
/// [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string(value)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserializes a `T` from HiPack text.
///
/// An empty document deserializes as an empty dict.
///
/// # Examples
///
/// ```rust
/// use hipack::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("x: 1, y: 0x2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns [`Error::Decode`] for invalid text and [`Error::Message`] when
/// the document does not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let dict = load(s)?.unwrap_or_default();
    from_value(Value::Dict(dict))
}

/// Deserializes a `T` from UTF-8 encoded HiPack text.
///
/// # Errors
///
/// Returns [`Error::Io`] if the bytes are not valid UTF-8, otherwise the
/// same errors as [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::io(&e.to_string()))?;
    from_str(s)
}

/// Deserializes a `T` from an I/O stream of HiPack text.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, otherwise the same errors as
/// [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}
