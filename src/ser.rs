//! HiPack encoding.
//!
//! This module provides the [`Dumper`] that renders a [`Dict`] as HiPack
//! text, and [`ValueSerializer`], which turns any `T: Serialize` into a
//! [`Value`] tree for the dumper to render.
//!
//! ## Output modes
//!
//! - **Pretty** (default): one item per line, two spaces of indentation per
//!   nesting level, `key: value` for scalars and `key [...]`/`key {...}` for
//!   compound values
//! - **Compact**: everything on one line, items separated by `,`
//!
//! Dict keys are always written in ascending order, so equal trees dump to
//! identical text.
//!
//! ```rust
//! use hipack::{dump, dump_compact, hipack};
//!
//! let data = hipack!({ "b": [1, 2], "a": { "x": true } });
//! let dict = data.as_dict().unwrap();
//!
//! assert_eq!(dump(dict).unwrap(), "a {\n  x: True\n}\nb [\n  1\n  2\n]\n");
//! assert_eq!(dump_compact(dict).unwrap(), "a{x:True},b[1,2]");
//! ```

use crate::chars::is_key_character;
use crate::{Annotations, Dict, Error, HipackOptions, Number, Result, Value, ValueHook};
use serde::{ser, Serialize};
use std::fmt::Write as _;

/// The HiPack encoder.
///
/// Renders into an in-memory buffer; [`Dumper::into_inner`] hands it out.
pub struct Dumper<H> {
    output: String,
    /// Current indentation level, `None` in compact mode.
    indent: Option<usize>,
    hook: H,
    depth: usize,
    max_depth: usize,
}

impl<H: ValueHook> Dumper<H> {
    pub fn new(options: &HipackOptions, hook: H) -> Self {
        Dumper {
            output: String::with_capacity(256),
            indent: if options.compact { None } else { Some(0) },
            hook,
            depth: 0,
            max_depth: options.max_depth,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Writes the items of `dict` without surrounding braces, as the
    /// top level of a message.
    pub fn dump_message(&mut self, dict: &Dict) -> Result<()> {
        self.dump_key_val(dict)
    }

    fn is_pretty(&self) -> bool {
        self.indent.is_some()
    }

    fn more_indent(&mut self) {
        if let Some(level) = self.indent.as_mut() {
            *level += 1;
        }
    }

    fn less_indent(&mut self) {
        if let Some(level) = self.indent.as_mut() {
            *level = level.saturating_sub(1);
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent.unwrap_or(0) {
            self.output.push_str("  ");
        }
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(Error::encode(format!(
                "nesting too deep (maximum depth is {})",
                self.max_depth
            )));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Runs the value hook, returning the tags to write and an optional
    /// replacement for `value`.
    fn annotate(&mut self, value: &Value) -> (Annotations, Option<Value>) {
        let mut annotations = Annotations::new();
        let replacement = self.hook.annotate(value, &mut annotations);
        if replacement.is_some() {
            tracing::trace!("value hook replaced {} value", value.kind());
        }
        (annotations, replacement)
    }

    fn dump_key_val(&mut self, dict: &Dict) -> Result<()> {
        let keys = dict.sorted_keys();
        let last = keys.len().saturating_sub(1);

        for (i, key) in keys.into_iter().enumerate() {
            let Some(value) = dict.get(key) else { continue };
            check_name("key", key)?;
            let (annotations, replacement) = self.annotate(value);
            let value = replacement.as_ref().unwrap_or(value);

            self.write_indent();
            self.output.push_str(key);
            // Compound values open with a bracket that separates them.
            if !value.is_compound() {
                self.output.push(':');
            }
            if self.is_pretty() {
                self.output.push(' ');
            }
            self.dump_annotations(&annotations)?;
            self.dump_value(value)?;

            if self.is_pretty() {
                self.output.push('\n');
            } else if i < last {
                self.output.push(',');
            }
        }
        Ok(())
    }

    fn dump_annotations(&mut self, annotations: &Annotations) -> Result<()> {
        for tag in annotations {
            check_name("annotation", tag)?;
            // Compact compound values follow their key directly.
            if self.output.chars().next_back().map_or(false, is_key_character) {
                self.output.push(':');
            }
            self.output.push(':');
            self.output.push_str(tag);
            self.output.push(' ');
        }
        Ok(())
    }

    fn dump_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Bool(b) => self.output.push_str(if *b { "True" } else { "False" }),
            Value::Number(n) => self.dump_number(n)?,
            Value::String(s) => self.dump_string(s),
            Value::List(list) => self.dump_list(list)?,
            Value::Dict(dict) => self.dump_dict(dict)?,
        }
        Ok(())
    }

    fn dump_number(&mut self, number: &Number) -> Result<()> {
        match *number {
            Number::Integer(i) => {
                let _ = write!(self.output, "{}", i);
            }
            Number::Float(f) if !f.is_finite() => {
                return Err(Error::encode(format!("non-finite number {} cannot be dumped", f)));
            }
            Number::Float(f) => {
                // Debug switches to exponent form at extreme magnitudes.
                let start = self.output.len();
                let _ = write!(self.output, "{:?}", f);
                if !self.output[start..].contains(['.', 'e']) {
                    self.output.push_str(".0");
                }
            }
        }
        Ok(())
    }

    fn dump_string(&mut self, s: &str) {
        self.output.push('"');
        for ch in s.chars() {
            match ch {
                '\t' => self.output.push_str("\\t"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                ch if (ch as u32) < 0x20 => {
                    let _ = write!(self.output, "\\{:02X}", ch as u32);
                }
                ch => self.output.push(ch),
            }
        }
        self.output.push('"');
    }

    fn dump_list(&mut self, list: &[Value]) -> Result<()> {
        self.enter()?;
        if list.is_empty() {
            self.output.push_str("[]");
            self.leave();
            return Ok(());
        }

        self.output.push('[');
        self.more_indent();
        if self.is_pretty() {
            self.output.push('\n');
        }

        let last = list.len() - 1;
        for (i, item) in list.iter().enumerate() {
            let (annotations, replacement) = self.annotate(item);
            let item = replacement.as_ref().unwrap_or(item);

            self.write_indent();
            self.dump_annotations(&annotations)?;
            self.dump_value(item)?;

            if self.is_pretty() {
                self.output.push('\n');
            } else if i < last {
                self.output.push(',');
            }
        }

        self.less_indent();
        self.output.push(']');
        self.leave();
        Ok(())
    }

    fn dump_dict(&mut self, dict: &Dict) -> Result<()> {
        self.enter()?;
        if dict.is_empty() {
            self.output.push_str("{}");
            self.leave();
            return Ok(());
        }

        self.output.push('{');
        self.more_indent();
        if self.is_pretty() {
            self.output.push('\n');
        }

        self.dump_key_val(dict)?;

        self.less_indent();
        self.write_indent();
        self.output.push('}');
        self.leave();
        Ok(())
    }
}

/// Rejects keys and tags that would not read back as a single key token.
fn check_name(what: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::encode(format!("empty {} cannot be dumped", what)));
    }
    if let Some(ch) = name.chars().find(|&ch| !is_key_character(ch) || ch == '#') {
        return Err(Error::encode(format!(
            "{} '{}' cannot be dumped: invalid character {:?}",
            what, name, ch
        )));
    }
    Ok(())
}

/// Serializer producing a [`Value`] tree.
///
/// Rust types with no HiPack counterpart map as follows: `None` and `()`
/// are errors, since there is no null; bytes become a list of integers;
/// unit variants become their name as a string; other enum variants become a
/// single-key dict `{ variant: payload }`.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
}

pub struct SerializeTupleVariant {
    name: &'static str,
    vec: Vec<Value>,
}

pub struct SerializeDict {
    dict: Dict,
    current_key: Option<String>,
}

pub struct SerializeStructVariant {
    name: &'static str,
    dict: Dict,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeDict;
    type SerializeStruct = SerializeDict;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        match i64::try_from(v) {
            Ok(i) => Ok(Value::Number(Number::Integer(i))),
            Err(_) => Ok(Value::Number(Number::Float(v as f64))),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Number(Number::Float(f64::from(v))))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Number(Number::Float(v)))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::List(v.iter().map(|&b| Value::from(b)).collect()))
    }

    fn serialize_none(self) -> Result<Value> {
        Err(Error::cannot_dump("null"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Err(Error::cannot_dump("null"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Err(Error::cannot_dump("null"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let mut dict = Dict::with_capacity(1);
        dict.insert(variant.to_string(), to_value(value)?);
        Ok(Value::Dict(dict))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec {
            vec: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            name: variant,
            vec: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeDict> {
        Ok(SerializeDict {
            dict: Dict::with_capacity(len.unwrap_or(0)),
            current_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeDict> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            name: variant,
            dict: Dict::with_capacity(len),
        })
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::List(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let mut dict = Dict::with_capacity(1);
        dict.insert(self.name.to_string(), Value::List(self.vec));
        Ok(Value::Dict(dict))
    }
}

impl ser::SerializeMap for SerializeDict {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(key)? {
            Value::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            other => Err(Error::encode(format!(
                "dict keys must be strings, found {}",
                other.kind()
            ))),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::encode("serialize_value called without serialize_key"))?;
        self.dict.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Dict(self.dict))
    }
}

impl ser::SerializeStruct for SerializeDict {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.dict.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Dict(self.dict))
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.dict.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let mut dict = Dict::with_capacity(1);
        dict.insert(self.name.to_string(), Value::Dict(self.dict));
        Ok(Value::Dict(dict))
    }
}

pub(crate) fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}
