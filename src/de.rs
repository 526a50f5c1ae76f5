//! HiPack decoding.
//!
//! This module provides the recursive-descent [`Parser`] that turns HiPack
//! text into a [`Dict`], and the serde glue that turns a decoded [`Value`]
//! into any `T: Deserialize`.
//!
//! ## Overview
//!
//! - **Single pass**: one character of lookahead, no backtracking
//! - **Two document shapes**: a bare sequence of `key value` items, or the
//!   same items wrapped in a top-level `{ ... }`
//! - **Annotations**: `:tag` prefixes are collected per value and passed to
//!   the [`Cast`] hook along with the literal text
//! - **All or nothing**: the first grammar violation aborts the whole call
//!
//! ## Usage
//!
//! ```rust
//! use hipack::{load, Value};
//!
//! let text = r#"
//! # Comments run to the end of the line.
//! name: "hipack"
//! version 0x10
//! tags ["fast", "small"]
//! limits { depth 128, strict: True }
//! "#;
//!
//! let dict = load(text).unwrap().unwrap();
//! assert_eq!(dict.get("version"), Some(&Value::from(16)));
//! assert_eq!(dict.get("limits").and_then(|v| v.get("strict")), Some(&Value::Bool(true)));
//! ```

use crate::annotations::{self, Annotations};
use crate::chars::{
    hex_digit_value, is_key_character, is_number_character, is_octal_nonzero_digit,
    is_whitespace,
};
use crate::cursor::Cursor;
use crate::{Cast, Dict, Error, HipackOptions, Number, Result, Value};
use serde::de::IntoDeserializer;
use serde::{de, forward_to_deserialize_any};

/// The HiPack decoder.
///
/// A parser is single-use: create it with [`Parser::new`] and call
/// [`Parser::parse_message`] once.
pub struct Parser<'a, C> {
    cursor: Cursor<'a>,
    cast: C,
    depth: usize,
    max_depth: usize,
}

impl<'a, C: Cast> Parser<'a, C> {
    pub fn new(input: &'a str, options: &HipackOptions, cast: C) -> Self {
        Parser {
            cursor: Cursor::new(input),
            cast,
            depth: 0,
            max_depth: options.max_depth,
        }
    }

    /// Parses the whole document.
    ///
    /// Returns `None` when the input holds nothing but whitespace and
    /// comments. A document starting with `{` must end with the matching
    /// `}`; only whitespace and comments may follow it.
    pub fn parse_message(mut self) -> Result<Option<Dict>> {
        if self.cursor.at_end() {
            return Ok(None);
        }

        let dict = if self.cursor.is_framed() {
            self.cursor.match_char('{')?;
            self.cursor.skip_whitespace();
            let dict = self.parse_key_value_items(Some('}'))?;
            if self.cursor.peek() != Some('}') {
                return Err(self.cursor.error("unterminated message"));
            }
            self.cursor.bump();
            self.cursor.skip_whitespace();
            if let Some(ch) = self.cursor.peek() {
                return Err(self
                    .cursor
                    .error(format!("unexpected '{}' after end of message", ch)));
            }
            dict
        } else {
            let dict = self.parse_key_value_items(None)?;
            if let Some(ch) = self.cursor.peek() {
                return Err(self
                    .cursor
                    .error(format!("expected ',' or whitespace, found '{}'", ch)));
            }
            dict
        };

        Ok(Some(dict))
    }

    fn parse_key(&mut self) -> Result<String> {
        let mut key = String::new();
        while let Some(ch) = self.cursor.peek() {
            if !is_key_character(ch) {
                break;
            }
            key.push(ch);
            self.cursor.bump();
        }
        if key.is_empty() {
            return Err(self.cursor.error("key expected"));
        }
        Ok(key)
    }

    /// Consumes the item separator: a comma, whitespace, or both.
    ///
    /// Returns `false` when neither is present, which ends the enclosing
    /// list or dict; the caller's closing-token check reports the error.
    fn parse_item_separator(&mut self) -> bool {
        let got_whitespace = self.cursor.skip_whitespace();
        if self.cursor.peek() == Some(',') {
            self.cursor.bump();
        } else if !got_whitespace {
            return false;
        }
        self.cursor.skip_whitespace();
        true
    }

    /// Parses `key value` items until `end` (or end of input for `None`).
    fn parse_key_value_items(&mut self, end: Option<char>) -> Result<Dict> {
        let mut dict = Dict::new();

        while !self.cursor.at_end() && self.cursor.peek() != end {
            let key = self.parse_key()?;

            match self.cursor.peek() {
                Some(':') => {
                    self.cursor.bump();
                    self.cursor.skip_whitespace();
                }
                Some(ch) if is_whitespace(ch) => {
                    self.cursor.skip_whitespace();
                }
                Some('{') | Some('[') => {}
                _ => {
                    return Err(self
                        .cursor
                        .error(format!("missing separator after key '{}'", key)))
                }
            }

            let value = self.parse_value()?;
            dict.insert(key, value);

            if !self.parse_item_separator() {
                break;
            }
        }

        Ok(dict)
    }

    fn parse_annotations(&mut self) -> Result<Annotations> {
        let mut annotations = Annotations::new();
        while self.cursor.peek() == Some(':') {
            self.cursor.bump();
            let tag = self.parse_key()?;
            if annotations.contains(&tag) {
                return Err(self.cursor.error(format!("duplicate annotation ':{}'", tag)));
            }
            annotations.insert(tag);
            self.cursor.skip_whitespace();
        }
        Ok(annotations)
    }

    fn parse_value(&mut self) -> Result<Value> {
        let annotations = self.parse_annotations()?;
        match self.cursor.peek() {
            Some('"') => self.parse_string(annotations),
            Some('[') => self.parse_list(annotations),
            Some('{') => self.parse_dict(annotations),
            Some('T' | 't' | 'F' | 'f') => self.parse_bool(annotations),
            _ => self.parse_number(annotations),
        }
    }

    fn apply_cast(
        &mut self,
        mut annotations: Annotations,
        class: &str,
        literal: Option<&str>,
        value: Value,
    ) -> Value {
        annotations.insert(class);
        if !tracing::enabled!(tracing::Level::TRACE) {
            return self.cast.cast(&annotations, literal, value);
        }
        let original = value.clone();
        let value = self.cast.cast(&annotations, literal, value);
        if value != original {
            tracing::trace!(class, literal, "cast hook replaced {} value", original.kind());
        }
        value
    }

    fn parse_string(&mut self, annotations: Annotations) -> Result<Value> {
        let start = self.cursor.position();
        // Raw advances only: a '#' inside quotes does not start a comment.
        self.cursor.bump_raw();

        let mut result = String::new();
        loop {
            match self.cursor.peek() {
                None => return Err(self.cursor.error("unterminated string")),
                Some('"') => break,
                Some('\\') => {
                    self.cursor.bump_raw();
                    let escaped = match self.cursor.peek() {
                        None => return Err(self.cursor.error("unterminated string")),
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some(high) => {
                            let high = hex_digit_value(high);
                            self.cursor.bump_raw();
                            let low = self.cursor.peek().and_then(hex_digit_value);
                            match (high, low) {
                                (Some(high), Some(low)) => char::from_u32(high * 16 + low)
                                    .ok_or_else(|| self.cursor.error("invalid escape sequence"))?,
                                _ => return Err(self.cursor.error("invalid escape sequence")),
                            }
                        }
                    };
                    result.push(escaped);
                }
                Some(ch) => result.push(ch),
            }
            self.cursor.bump_raw();
        }

        // Include the closing quote in the literal, then resume normal lexing.
        self.cursor.bump_raw();
        let literal = self.cursor.slice_from(start);
        let value = self.apply_cast(
            annotations,
            annotations::STRING,
            Some(literal),
            Value::String(result),
        );
        self.cursor.skip_comments();
        Ok(value)
    }

    fn parse_bool(&mut self, annotations: Annotations) -> Result<Value> {
        let start = self.cursor.position();
        let (word, value) = match self.cursor.peek() {
            Some('T' | 't') => ("true", true),
            _ => ("false", false),
        };

        for expected in word.chars() {
            match self.cursor.peek() {
                Some(ch) if ch.to_ascii_lowercase() == expected => self.cursor.bump_raw(),
                _ => return Err(self.cursor.error("invalid boolean value")),
            }
        }

        let literal = self.cursor.slice_from(start);
        let value = self.apply_cast(
            annotations,
            annotations::BOOL,
            Some(literal),
            Value::Bool(value),
        );
        self.cursor.skip_comments();
        Ok(value)
    }

    fn parse_number(&mut self, annotations: Annotations) -> Result<Value> {
        let mut literal = String::new();
        let mut is_hex = false;
        let mut is_octal = false;
        let mut dot_seen = false;
        let mut exp_seen = false;

        if let Some(sign @ ('+' | '-')) = self.cursor.peek() {
            literal.push(sign);
            self.cursor.bump();
        }

        if self.cursor.peek() == Some('0') {
            literal.push('0');
            self.cursor.bump();
            match self.cursor.peek() {
                Some(x @ ('x' | 'X')) => {
                    literal.push(x);
                    self.cursor.bump();
                    is_hex = true;
                }
                Some(ch) if is_octal_nonzero_digit(ch) => is_octal = true,
                _ => {}
            }
        }

        while let Some(ch) = self.cursor.peek() {
            if !is_number_character(ch) {
                break;
            }
            match ch {
                '.' => {
                    if is_hex || is_octal {
                        return Err(self.cursor.error("decimal point in integer literal"));
                    }
                    if dot_seen {
                        return Err(self.cursor.error("decimal point specified multiple times"));
                    }
                    dot_seen = true;
                }
                'e' | 'E' if !is_hex => {
                    if is_octal {
                        return Err(self.cursor.error("exponent in octal literal"));
                    }
                    if exp_seen {
                        return Err(self.cursor.error("exponent specified multiple times"));
                    }
                    exp_seen = true;
                    literal.push(ch);
                    self.cursor.bump();
                    if let Some(sign @ ('+' | '-')) = self.cursor.peek() {
                        literal.push(sign);
                        self.cursor.bump();
                    }
                    continue;
                }
                '+' | '-' => {
                    return Err(self.cursor.error(format!("unexpected '{}' in number", ch)));
                }
                _ => {}
            }
            literal.push(ch);
            self.cursor.bump();
        }

        if literal.is_empty() {
            return Err(match self.cursor.peek() {
                Some(ch) => self.cursor.error(format!("number expected, found '{}'", ch)),
                None => self.cursor.error("number expected, found end of input"),
            });
        }

        let (class, number) = if is_hex {
            (annotations::INT, self.parse_integer(&literal, 16)?)
        } else if is_octal {
            (annotations::INT, self.parse_integer(&literal, 8)?)
        } else if dot_seen || exp_seen {
            let float = literal
                .parse::<f64>()
                .map_err(|_| self.cursor.error(format!("invalid number '{}'", literal)))?;
            if !float.is_finite() {
                return Err(self.cursor.error(format!("float '{}' out of range", literal)));
            }
            (annotations::FLOAT, Number::Float(float))
        } else {
            (annotations::INT, self.parse_integer(&literal, 10)?)
        };

        Ok(self.apply_cast(annotations, class, Some(&literal), Value::Number(number)))
    }

    fn parse_integer(&self, literal: &str, radix: u32) -> Result<Number> {
        let (sign, unsigned) = match literal.as_bytes().first() {
            Some(b'-') => ("-", &literal[1..]),
            Some(b'+') => ("", &literal[1..]),
            _ => ("", literal),
        };
        let digits = match radix {
            16 => &unsigned[2..],
            _ => unsigned,
        };
        if digits.is_empty() {
            return Err(self.cursor.error(format!("invalid number '{}'", literal)));
        }
        i64::from_str_radix(&format!("{}{}", sign, digits), radix)
            .map(Number::Integer)
            .map_err(|e| match e.kind() {
                std::num::IntErrorKind::PosOverflow | std::num::IntErrorKind::NegOverflow => self
                    .cursor
                    .error(format!("integer '{}' out of range", literal)),
                _ => self.cursor.error(format!("invalid number '{}'", literal)),
            })
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(self.cursor.error(format!(
                "nesting too deep (maximum depth is {})",
                self.max_depth
            )));
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_list(&mut self, annotations: Annotations) -> Result<Value> {
        self.enter()?;
        self.cursor.match_char('[')?;
        self.cursor.skip_whitespace();

        let mut list = Vec::new();
        while !self.cursor.at_end() && self.cursor.peek() != Some(']') {
            list.push(self.parse_value()?);
            if !self.parse_item_separator() {
                break;
            }
        }

        self.cursor.match_char(']')?;
        self.depth -= 1;
        Ok(self.apply_cast(annotations, annotations::LIST, None, Value::List(list)))
    }

    fn parse_dict(&mut self, annotations: Annotations) -> Result<Value> {
        self.enter()?;
        self.cursor.match_char('{')?;
        self.cursor.skip_whitespace();
        let dict = self.parse_key_value_items(Some('}'))?;
        self.cursor.match_char('}')?;
        self.depth -= 1;
        Ok(self.apply_cast(annotations, annotations::DICT, None, Value::Dict(dict)))
    }
}

/// Deserializes a `T` from a decoded [`Value`].
pub(crate) struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    pub(crate) fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(Number::Integer(i)) => visitor.visit_i64(i),
            Value::Number(Number::Float(f)) => visitor.visit_f64(f),
            Value::String(s) => visitor.visit_string(s),
            Value::List(list) => visitor.visit_seq(SeqDeserializer::new(list)),
            Value::Dict(dict) => visitor.visit_map(MapDeserializer::new(dict)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        // HiPack has no null: a present value is always `Some`.
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Dict(dict) => {
                let mut iter = dict.into_iter();
                match (iter.next(), iter.next()) {
                    (Some((variant, value)), None) => {
                        visitor.visit_enum(EnumDeserializer::new(variant, value))
                    }
                    _ => Err(Error::custom("expected a dict with a single enum variant")),
                }
            }
            other => Err(Error::custom(format!(
                "expected enum, found {}",
                other.kind()
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(list: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: list.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(dict: Dict) -> Self {
        MapDeserializer {
            iter: dict.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(key.into_deserializer()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Value,
}

impl EnumDeserializer {
    fn new(variant: String, value: Value) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(self.variant.into_deserializer())?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Value,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Err(Error::custom("expected unit variant as a plain string"))
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(ValueDeserializer::new(self.value))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::List(list) => visitor.visit_seq(SeqDeserializer::new(list)),
            other => Err(Error::custom(format!(
                "expected tuple variant, found {}",
                other.kind()
            ))),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Dict(dict) => visitor.visit_map(MapDeserializer::new(dict)),
            other => Err(Error::custom(format!(
                "expected struct variant, found {}",
                other.kind()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::{cast_fn, Identity};

    fn parse(input: &str) -> Result<Option<Dict>> {
        Parser::new(input, &HipackOptions::new(), Identity).parse_message()
    }

    fn parse_value(input: &str) -> Result<Value> {
        let dict = parse(&format!("value: {}", input))?.unwrap();
        Ok(dict.get("value").cloned().unwrap())
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("  \n\t ").unwrap(), None);
        assert_eq!(parse("# only a comment\n").unwrap(), None);
    }

    #[test]
    fn test_framed_message() {
        let dict = parse("{ a: 1, b: 2 }").unwrap().unwrap();
        assert_eq!(dict.get("a"), Some(&Value::from(1)));
        assert_eq!(dict.get("b"), Some(&Value::from(2)));
        assert_eq!(parse("{}").unwrap(), Some(Dict::new()));
    }

    #[test]
    fn test_unterminated_message() {
        let err = parse("{ a: 1").unwrap_err();
        assert!(err.to_string().starts_with("unterminated message"));
    }

    #[test]
    fn test_garbage_after_framed_message() {
        assert!(parse("{ a: 1 } b: 2").is_err());
        assert!(parse("{ a: 1 }  # trailing comment\n").is_ok());
    }

    #[test]
    fn test_separators() {
        let dict = parse("a:1,b 2\nc:\t3").unwrap().unwrap();
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.get("c"), Some(&Value::from(3)));

        let dict = parse("a[1] b{c 2}").unwrap().unwrap();
        assert_eq!(dict.get("a"), Some(&Value::List(vec![Value::from(1)])));
        assert!(dict.get("b").map(Value::is_dict).unwrap_or(false));

        let err = parse("a[1]b{c 2}").unwrap_err();
        assert!(err.to_string().contains("expected ',' or whitespace, found 'b'"));
    }

    #[test]
    fn test_missing_separator() {
        let err = parse("a\"x\"").unwrap_err();
        assert!(err.to_string().contains("missing separator"));
        assert!(parse("a").is_err());
    }

    #[test]
    fn test_later_key_overwrites() {
        let dict = parse("a 1 a 2").unwrap().unwrap();
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get("a"), Some(&Value::from(2)));
    }

    #[test]
    fn test_strings() {
        assert_eq!(parse_value("\"\"").unwrap(), Value::from(""));
        assert_eq!(
            parse_value(r#""tab\tnl\ncr\rq\"bs\\""#).unwrap(),
            Value::from("tab\tnl\ncr\rq\"bs\\")
        );
        assert_eq!(parse_value(r#""\41\7f\0A""#).unwrap(), Value::from("A\u{7f}\n"));
        assert_eq!(parse_value("\"# not a comment\"").unwrap(), Value::from("# not a comment"));
        assert_eq!(parse_value("\"héllo\"").unwrap(), Value::from("héllo"));
    }

    #[test]
    fn test_invalid_strings() {
        assert!(parse_value("\"abc").unwrap_err().to_string().contains("unterminated string"));
        assert!(parse_value(r#""\q1""#).unwrap_err().to_string().contains("invalid escape"));
        assert!(parse_value(r#""\4g""#).is_err());
        assert!(parse_value("\"\\").is_err());
    }

    #[test]
    fn test_booleans() {
        assert_eq!(parse_value("True").unwrap(), Value::Bool(true));
        assert_eq!(parse_value("true").unwrap(), Value::Bool(true));
        assert_eq!(parse_value("FALSE").unwrap(), Value::Bool(false));
        assert_eq!(parse_value("fAlSe").unwrap(), Value::Bool(false));
        assert!(parse_value("Tru").is_err());
        assert!(parse_value("Fals3").is_err());
    }

    #[test]
    fn test_integers() {
        assert_eq!(parse_value("42").unwrap(), Value::from(42));
        assert_eq!(parse_value("-42").unwrap(), Value::from(-42));
        assert_eq!(parse_value("+42").unwrap(), Value::from(42));
        assert_eq!(parse_value("0").unwrap(), Value::from(0));
        assert_eq!(parse_value("0x2A").unwrap(), Value::from(42));
        assert_eq!(parse_value("0X2a").unwrap(), Value::from(42));
        assert_eq!(parse_value("-0x2A").unwrap(), Value::from(-42));
        assert_eq!(parse_value("052").unwrap(), Value::from(42));
        assert_eq!(parse_value("-052").unwrap(), Value::from(-42));
        assert_eq!(parse_value("0xCAFE").unwrap(), Value::from(51966));
        assert_eq!(parse_value("01755").unwrap(), Value::from(1005));
        assert_eq!(parse_value("-0x8000000000000000").unwrap(), Value::from(i64::MIN));
    }

    #[test]
    fn test_floats() {
        assert_eq!(parse_value("1.5").unwrap(), Value::from(1.5));
        assert_eq!(parse_value("-0.25").unwrap(), Value::from(-0.25));
        assert_eq!(parse_value("1e3").unwrap(), Value::from(1000.0));
        assert_eq!(parse_value("1E+3").unwrap(), Value::from(1000.0));
        assert_eq!(parse_value("2.5e-1").unwrap(), Value::from(0.25));
        assert_eq!(parse_value(".5").unwrap(), Value::from(0.5));
        assert!(matches!(
            parse_value("3.0").unwrap(),
            Value::Number(Number::Float(_))
        ));
    }

    #[test]
    fn test_invalid_numbers() {
        let cases = [
            ("1.2.3", "decimal point specified multiple times"),
            ("1e2e3", "exponent specified multiple times"),
            ("0x1.5", "decimal point in integer literal"),
            ("017.5", "decimal point in integer literal"),
            ("017e2", "exponent in octal literal"),
            ("1-2", "unexpected '-' in number"),
            ("1e+-2", "unexpected '-' in number"),
            ("--1", "unexpected '-' in number"),
            ("x", "number expected"),
            ("0x", "invalid number"),
            ("-", "invalid number"),
            ("12ab", "invalid number"),
            ("018", "invalid number"),
            ("1e", "invalid number"),
            ("99999999999999999999", "out of range"),
            ("1e999", "float '1e999' out of range"),
            ("-1.5e400", "float '-1.5e400' out of range"),
        ];
        for (input, message) in cases {
            let err = parse_value(input).unwrap_err();
            assert!(
                err.to_string().contains(message),
                "{:?}: expected {:?}, got {:?}",
                input,
                message,
                err.to_string()
            );
        }
    }

    #[test]
    fn test_lists() {
        assert_eq!(parse_value("[]").unwrap(), Value::List(vec![]));
        assert_eq!(parse_value("[ ]").unwrap(), Value::List(vec![]));
        let expected = Value::List(vec![Value::from(1), Value::from(2), Value::from(3)]);
        assert_eq!(parse_value("[1,2,3]").unwrap(), expected);
        assert_eq!(parse_value("[1 2 3]").unwrap(), expected);
        assert_eq!(parse_value("[1, 2, 3,]").unwrap(), expected);
        assert_eq!(parse_value("[\n  1\n  2 # two\n  3\n]").unwrap(), expected);
        assert_eq!(
            parse_value("[[1] [\"a\"]]").unwrap(),
            Value::List(vec![
                Value::List(vec![Value::from(1)]),
                Value::List(vec![Value::from("a")]),
            ])
        );
    }

    #[test]
    fn test_malformed_lists() {
        assert!(parse_value("[1, 2").is_err());
        assert!(parse_value("[1x]").unwrap_err().to_string().contains("expected ']'"));
        assert!(parse_value("[\"a\"\"b\"]").is_err());
    }

    #[test]
    fn test_nested_dicts() {
        let value = parse_value("{ a 1 b { c: [True] } }").unwrap();
        assert_eq!(value.get("a"), Some(&Value::from(1)));
        assert_eq!(
            value.get("b").and_then(|b| b.get("c")),
            Some(&Value::List(vec![Value::Bool(true)]))
        );
        assert!(parse_value("{ a 1").is_err());
        assert_eq!(parse_value("{}").unwrap(), Value::Dict(Dict::new()));
    }

    #[test]
    fn test_empty_key() {
        let err = parse("{ : 1 }").unwrap_err();
        assert!(err.to_string().contains("key expected"));
    }

    #[test]
    fn test_annotations_reach_cast() {
        let mut seen = Vec::new();
        let cast = cast_fn(|tags: &Annotations, literal: Option<&str>, value: Value| {
            let tags: Vec<String> = tags.iter().cloned().collect();
            seen.push((tags, literal.map(str::to_string)));
            value
        });
        let dict = Parser::new(
            "a: :meters :approx 1.5\nb :set [\"x\"]",
            &HipackOptions::new(),
            cast,
        )
        .parse_message()
        .unwrap()
        .unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(
            seen,
            vec![
                (
                    vec!["meters".to_string(), "approx".to_string(), ".float".to_string()],
                    Some("1.5".to_string())
                ),
                (vec![".string".to_string()], Some("\"x\"".to_string())),
                (vec!["set".to_string(), ".list".to_string()], None),
            ]
        );
    }

    #[test]
    fn test_duplicate_annotation() {
        let err = parse("a: :x :x 1").unwrap_err();
        assert!(err.to_string().contains("duplicate annotation ':x'"));
        // A written tag that matches the reserved class tag is not a duplicate.
        assert!(parse("a: :.int 1").is_ok());
    }

    #[test]
    fn test_cast_replaces_values() {
        let cast = cast_fn(|tags: &Annotations, _: Option<&str>, value: Value| {
            if tags.contains(annotations::INT) {
                Value::from(value.as_i64().unwrap_or_default() * 2)
            } else {
                value
            }
        });
        let dict = Parser::new("a 21 b [1 2]", &HipackOptions::new(), cast)
            .parse_message()
            .unwrap()
            .unwrap();
        assert_eq!(dict.get("a"), Some(&Value::from(42)));
        assert_eq!(
            dict.get("b"),
            Some(&Value::List(vec![Value::from(2), Value::from(4)]))
        );
    }

    #[test]
    fn test_error_location() {
        let err = parse("a: 1\nb: [1,\n  2x]").unwrap_err();
        match err {
            Error::Decode {
                line,
                column,
                position,
                ..
            } => {
                assert_eq!(line, 3);
                assert_eq!(column, 4);
                assert_eq!(position, 15);
            }
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_depth_limit() {
        let options = HipackOptions::new().with_max_depth(2);
        let ok = Parser::new("a [[1]]", &options, Identity).parse_message();
        assert!(ok.is_ok());
        let err = Parser::new("a [[[1]]]", &options, Identity)
            .parse_message()
            .unwrap_err();
        assert!(err.to_string().contains("nesting too deep"));

        let deep = format!("a {}{}", "[".repeat(100_000), "]".repeat(100_000));
        assert!(parse(&deep).is_err());
    }

    #[test]
    fn test_comments_between_tokens() {
        let dict = parse("# header\na: 1 # one\n# between\nb: \"#2\" # two").unwrap().unwrap();
        assert_eq!(dict.get("a"), Some(&Value::from(1)));
        assert_eq!(dict.get("b"), Some(&Value::from("#2")));
    }
}
