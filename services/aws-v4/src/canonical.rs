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

//! Canonical request of [SigV4](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html#create-canonical-request).

use std::fmt::Write;

use apisign_core::hash::hex_sha256;
use apisign_core::{Error, QueryArgs, QueryValue, Result, SigningRequest};
use http::header;
use log::debug;

use crate::constants::X_AMZ_CONTENT_SHA_256;
use crate::encode::{encode_path, encode_query};

/// Digest of a canonical request together with the headers it signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    /// Hex encoded SHA256 of the canonical request string.
    pub digest: String,
    /// Sorted, lower-cased, `;` joined names of the signed headers.
    pub signed_headers: String,
}

impl CanonicalRequest {
    /// Canonicalize the request and hash it.
    pub fn build(req: &SigningRequest) -> Result<Self> {
        let (creq, signed_headers) = canonicalize(req)?;
        debug!("calculated canonical request: {creq}");

        Ok(CanonicalRequest {
            digest: hex_sha256(creq.as_bytes()),
            signed_headers,
        })
    }
}

/// Build the canonical request string, the input of [`CanonicalRequest`]'s digest.
pub fn canonical_request_string(req: &SigningRequest) -> Result<String> {
    canonicalize(req).map(|(creq, _)| creq)
}

/// Build the canonical query string.
///
/// Names and values are percent-encoded, and pairs ordered by the encoded
/// name. `true` renders as `name=`, `false` is dropped.
pub fn canonical_query_string(query: &QueryArgs) -> String {
    let mut pairs = Vec::with_capacity(query.len());
    for (name, value) in query {
        let value = match value {
            QueryValue::Bool(false) => continue,
            QueryValue::Bool(true) => String::new(),
            QueryValue::String(v) => encode_query(v),
            QueryValue::Number(v) => encode_query(&v.to_string()),
        };
        pairs.push((encode_query(name), value));
    }
    // Sort by the encoded name, raw names sort differently ("a0" vs "a:").
    pairs.sort();

    let mut s = String::with_capacity(pairs.iter().map(|(k, v)| k.len() + v.len() + 2).sum());
    for (idx, (k, v)) in pairs.into_iter().enumerate() {
        if idx != 0 {
            s.push('&');
        }
        s.push_str(&k);
        s.push('=');
        s.push_str(&v);
    }

    s
}

/// Collect `(name, value)` of every signed header, sorted by name.
///
/// `host` is always taken from the request host, never from the headers.
/// Several values of one name are trimmed and joined with `,`.
fn canonical_headers(req: &SigningRequest) -> Result<Vec<(&str, String)>> {
    let mut headers = Vec::with_capacity(req.headers.keys_len() + 1);
    headers.push((header::HOST.as_str(), req.host.clone()));

    for name in req.headers.keys() {
        if *name == header::HOST {
            continue;
        }
        let mut values = Vec::with_capacity(1);
        for value in req.headers.get_all(name) {
            let value = value.to_str().map_err(|e| {
                Error::encoding(format!("header {name} has a non visible ascii value"))
                    .with_source(e)
            })?;
            values.push(value.trim_matches(' '));
        }
        headers.push((name.as_str(), values.join(",")));
    }
    headers.sort_unstable();

    Ok(headers)
}

/// Resolve the payload hash: explicit override, then the
/// `x-amz-content-sha256` header, then the digest of the body.
fn payload_hash(req: &SigningRequest) -> Result<String> {
    if let Some(hash) = &req.payload_hash {
        return Ok(hash.clone());
    }
    if let Some(hash) = req.headers.get(X_AMZ_CONTENT_SHA_256) {
        return Ok(hash.to_str()?.trim_matches(' ').to_string());
    }

    Ok(hex_sha256(req.body.as_deref().unwrap_or_default()))
}

fn canonicalize(req: &SigningRequest) -> Result<(String, String)> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    // Insert method
    writeln!(f, "{}", req.method)?;
    // Insert encoded path
    writeln!(f, "{}", encode_path(&req.path))?;
    // Insert query
    writeln!(f, "{}", canonical_query_string(&req.query))?;
    // Insert signed headers
    let headers = canonical_headers(req)?;
    for (name, value) in headers.iter() {
        writeln!(f, "{name}:{value}")?;
    }
    writeln!(f)?;
    let signed_headers = headers
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(";");
    writeln!(f, "{signed_headers}")?;
    // Insert payload hash
    write!(f, "{}", payload_hash(req)?)?;

    Ok((f, signed_headers))
}
