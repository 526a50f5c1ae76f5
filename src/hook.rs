//! Extension points of the decoder and the encoder.
//!
//! HiPack does not fix a type system. Instead the decoder passes every value
//! through a [`Cast`] hook together with its annotations and the literal
//! text, and the encoder asks a [`ValueHook`] which annotations to write in
//! front of each value. [`Identity`] is the default for both.
//!
//! Closures are adapted with [`cast_fn`] and [`value_fn`]:
//!
//! ```rust
//! use hipack::{annotations, cast_fn, load_with, HipackOptions, Value};
//!
//! // Store every float literal as a string holding its original text.
//! let cast = cast_fn(|tags, literal, value| match literal {
//!     Some(text) if tags.contains(annotations::FLOAT) => Value::from(text),
//!     _ => value,
//! });
//!
//! let dict = load_with("pi: 3.14159", &HipackOptions::new(), cast).unwrap().unwrap();
//! assert_eq!(dict.get("pi"), Some(&Value::from("3.14159")));
//! ```

use crate::{Annotations, Value};

/// Decoder hook invoked for every value below the top-level message.
pub trait Cast {
    /// Returns the value to store in the tree.
    ///
    /// `literal` is the source text of scalar literals (strings include their
    /// quotes) and `None` for lists and dicts. `annotations` holds the tags
    /// written before the value plus the reserved tag for its syntactic class.
    fn cast(&mut self, annotations: &Annotations, literal: Option<&str>, value: Value) -> Value;
}

/// Encoder hook invoked before each value below the top-level dict is written.
pub trait ValueHook {
    /// Fills `annotations` for `value`, optionally returning a replacement
    /// to serialize instead.
    fn annotate(&mut self, value: &Value, annotations: &mut Annotations) -> Option<Value>;
}

/// Hook that keeps every value as is and adds no annotations.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl Cast for Identity {
    #[inline]
    fn cast(&mut self, _annotations: &Annotations, _literal: Option<&str>, value: Value) -> Value {
        value
    }
}

impl ValueHook for Identity {
    #[inline]
    fn annotate(&mut self, _value: &Value, _annotations: &mut Annotations) -> Option<Value> {
        None
    }
}

impl<C: Cast + ?Sized> Cast for &mut C {
    fn cast(&mut self, annotations: &Annotations, literal: Option<&str>, value: Value) -> Value {
        (**self).cast(annotations, literal, value)
    }
}

impl<H: ValueHook + ?Sized> ValueHook for &mut H {
    fn annotate(&mut self, value: &Value, annotations: &mut Annotations) -> Option<Value> {
        (**self).annotate(value, annotations)
    }
}

/// A [`Cast`] backed by a closure. Created by [`cast_fn`].
#[derive(Clone, Copy, Debug)]
pub struct CastFn<F>(F);

/// Wraps a closure as a [`Cast`] hook.
pub fn cast_fn<F>(f: F) -> CastFn<F>
where
    F: FnMut(&Annotations, Option<&str>, Value) -> Value,
{
    CastFn(f)
}

impl<F> Cast for CastFn<F>
where
    F: FnMut(&Annotations, Option<&str>, Value) -> Value,
{
    fn cast(&mut self, annotations: &Annotations, literal: Option<&str>, value: Value) -> Value {
        (self.0)(annotations, literal, value)
    }
}

/// A [`ValueHook`] backed by a closure. Created by [`value_fn`].
#[derive(Clone, Copy, Debug)]
pub struct ValueFn<F>(F);

/// Wraps a closure as a [`ValueHook`].
///
/// # Examples
///
/// ```rust
/// use hipack::{dump_with, hipack, value_fn, HipackOptions, Value};
///
/// let hook = value_fn(|value, annotations| {
///     if let Value::Number(n) = value {
///         annotations.insert(if n.is_integer() { "int" } else { "float" });
///     }
///     None
/// });
///
/// let data = hipack!({ "a": 1, "b": 2.5 });
/// let text = dump_with(data.as_dict().unwrap(), &HipackOptions::new(), hook).unwrap();
/// assert_eq!(text, "a: :int 1\nb: :float 2.5\n");
/// ```
pub fn value_fn<F>(f: F) -> ValueFn<F>
where
    F: FnMut(&Value, &mut Annotations) -> Option<Value>,
{
    ValueFn(f)
}

impl<F> ValueHook for ValueFn<F>
where
    F: FnMut(&Value, &mut Annotations) -> Option<Value>,
{
    fn annotate(&mut self, value: &Value, annotations: &mut Annotations) -> Option<Value> {
        (self.0)(value, annotations)
    }
}
