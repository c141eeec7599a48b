//! Response payload shapes.
//!
//! # Design
//! A request is typed by the payload it expects. `Payload` ties that Rust
//! type to the shape the JSON body is decoded as. Collections and maps get
//! their shape from the blanket impls below; structured objects opt in with
//! an empty `impl Payload for MyType {}`. `NoContent` marks requests whose
//! response body is ignored entirely.

use std::collections::{BTreeMap, HashMap, VecDeque};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// The shape a response body is decoded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// No decoding; the parsed result is always absent.
    NoContent,
    /// Fixed-size or boxed array of elements.
    Array,
    /// Ordered sequence of elements.
    List,
    /// String-keyed mapping to elements.
    Map,
    /// A single structured value.
    Object,
}

/// A type a response body can be parsed into.
pub trait Payload: DeserializeOwned + Send + 'static {
    const SHAPE: PayloadShape = PayloadShape::Object;
}

/// Marker payload for requests that expect no response body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoContent;

impl Payload for NoContent {
    const SHAPE: PayloadShape = PayloadShape::NoContent;
}

impl<T: DeserializeOwned + Send + 'static> Payload for Vec<T> {
    const SHAPE: PayloadShape = PayloadShape::List;
}

impl<T: DeserializeOwned + Send + 'static> Payload for VecDeque<T> {
    const SHAPE: PayloadShape = PayloadShape::List;
}

impl<T: DeserializeOwned + Send + 'static> Payload for Box<[T]> {
    const SHAPE: PayloadShape = PayloadShape::Array;
}

impl<T: Send + 'static, const N: usize> Payload for [T; N]
where
    [T; N]: DeserializeOwned,
{
    const SHAPE: PayloadShape = PayloadShape::Array;
}

impl<T: DeserializeOwned + Send + 'static> Payload for HashMap<String, T> {
    const SHAPE: PayloadShape = PayloadShape::Map;
}

impl<T: DeserializeOwned + Send + 'static> Payload for BTreeMap<String, T> {
    const SHAPE: PayloadShape = PayloadShape::Map;
}

impl Payload for serde_json::Value {}
impl Payload for String {}
impl Payload for bool {}
impl Payload for i64 {}
impl Payload for u64 {}
impl Payload for f64 {}
