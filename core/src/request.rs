// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::collections::BTreeMap;

use bytes::Bytes;
use http::header;
use http::header::HeaderName;
use http::HeaderMap;
use http::HeaderValue;
use serde_json::Number;
use serde_json::Value;

use crate::{Error, Result};

/// Query arguments of a request, keyed by their raw (unescaped) name.
pub type QueryArgs = BTreeMap<String, QueryValue>;

/// Value of a query argument.
///
/// Only strings, numbers and booleans can be signed. A `true` flag is
/// rendered as `name=`, a `false` flag is left out of the request entirely.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// A string value, percent-encoded when canonicalized.
    String(String),
    /// A finite number, rendered in its shortest decimal form.
    Number(Number),
    /// A flag argument.
    Bool(bool),
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        QueryValue::String(v.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        QueryValue::String(v)
    }
}

impl From<&String> for QueryValue {
    fn from(v: &String) -> Self {
        QueryValue::String(v.clone())
    }
}

impl From<bool> for QueryValue {
    fn from(v: bool) -> Self {
        QueryValue::Bool(v)
    }
}

macro_rules! impl_query_value_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for QueryValue {
                fn from(v: $t) -> Self {
                    QueryValue::Number(Number::from(v))
                }
            }
        )*
    };
}

impl_query_value_from_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl TryFrom<f64> for QueryValue {
    type Error = Error;

    fn try_from(v: f64) -> Result<Self> {
        Number::from_f64(v)
            .map(QueryValue::Number)
            .ok_or_else(|| Error::encoding(format!("query value {v} is not a finite number")))
    }
}

impl TryFrom<Value> for QueryValue {
    type Error = Error;

    fn try_from(v: Value) -> Result<Self> {
        match v {
            Value::String(s) => Ok(QueryValue::String(s)),
            Value::Number(n) => Ok(QueryValue::Number(n)),
            Value::Bool(b) => Ok(QueryValue::Bool(b)),
            Value::Null => Err(Error::encoding("query value of type null is not supported")),
            Value::Array(_) => Err(Error::encoding(
                "query value of type array is not supported",
            )),
            Value::Object(_) => Err(Error::encoding(
                "query value of type object is not supported",
            )),
        }
    }
}

/// Description of the HTTP request to be signed.
///
/// The request is a plain value: building one performs no validation, the
/// signer checks it before use.
#[derive(Debug, Clone, Default)]
pub struct SigningRequest {
    /// HTTP method, signed verbatim.
    pub method: String,
    /// Host the request is sent to, always signed as the `host` header.
    pub host: String,
    /// Unescaped request path, starting with `/`.
    pub path: String,
    /// Query arguments.
    pub query: QueryArgs,
    /// Headers to sign, names are matched case-insensitively.
    pub headers: HeaderMap,
    /// Raw request body.
    pub body: Option<Bytes>,
    /// Payload hash to sign instead of hashing the body.
    pub payload_hash: Option<String>,
}

impl SigningRequest {
    /// Create a new request without query, headers or body.
    pub fn new(method: impl Into<String>, host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            host: host.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    /// Set a query argument, replacing any previous value of the same name.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Set a header, replacing any previous value of the same name.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            Error::encoding(format!("invalid header name {name:?}")).with_source(e)
        })?;
        self.headers.insert(name, HeaderValue::from_str(value)?);
        Ok(self)
    }

    /// Set the request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the payload hash, for example `UNSIGNED-PAYLOAD`.
    pub fn with_payload_hash(mut self, hash: impl Into<String>) -> Self {
        self.payload_hash = Some(hash.into());
        self
    }

    /// Check whether the request carries any header or a body.
    pub fn has_headers_or_body(&self) -> bool {
        !self.headers.is_empty() || self.body.is_some()
    }

    /// Build a signing request from http::request::Parts.
    ///
    /// The path is percent-decoded and the query parsed as form data, so the
    /// returned request holds raw values. A query argument given more than
    /// once is an [`ErrorKind::UnsupportedArgumentCombination`] error.
    ///
    /// [`ErrorKind::UnsupportedArgumentCombination`]: crate::ErrorKind::UnsupportedArgumentCombination The `host` header is dropped: the
    /// host always comes from the URI authority, or the `host` header when
    /// the URI has none.
    pub fn from_parts(parts: &http::request::Parts) -> Result<Self> {
        let host = match parts.uri.authority() {
            Some(authority) => authority.as_str().to_string(),
            None => parts
                .headers
                .get(header::HOST)
                .ok_or_else(|| {
                    Error::missing_argument("request without authority is invalid for signing")
                })?
                .to_str()?
                .to_string(),
        };

        let path = percent_encoding::percent_decode_str(parts.uri.path())
            .decode_utf8()
            .map_err(|e| Error::encoding("request path is not valid utf-8").with_source(e))?
            .into_owned();

        let mut query = QueryArgs::new();
        for (k, v) in form_urlencoded::parse(parts.uri.query().unwrap_or_default().as_bytes()) {
            if query.contains_key(&*k) {
                return Err(Error::unsupported_argument_combination(format!(
                    "query argument {k} is repeated, repeated arguments can't be signed"
                )));
            }
            query.insert(k.into_owned(), QueryValue::String(v.into_owned()));
        }

        let mut headers = parts.headers.clone();
        headers.remove(header::HOST);

        Ok(SigningRequest {
            method: parts.method.as_str().to_string(),
            host,
            path,
            query,
            headers,
            body: None,
            payload_hash: None,
        })
    }
}
