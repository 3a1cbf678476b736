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

//! Sign `http` requests in place.

use std::mem;
use std::str::FromStr;

use apisign_core::hash::hex_sha256;
use apisign_core::{Result, SigningRequest};
use bytes::Bytes;
use http::header;
use http::request::Parts;
use http::uri::PathAndQuery;
use http::{HeaderValue, Uri};
use log::debug;

use crate::canonical::canonical_query_string;
use crate::constants::{X_AMZ_CONTENT_SHA_256, X_AMZ_DATE};
use crate::encode::encode_path;
use crate::{Signer, SigningContext};

/// Sign the request with an `Authorization` header.
///
/// `x-amz-date` and `x-amz-content-sha256` are added when absent, both are
/// signed. Set `x-amz-content-sha256` beforehand to sign another payload
/// hash, for example `UNSIGNED-PAYLOAD`. An existing `Authorization` header
/// is replaced.
pub fn sign_parts(ctx: &SigningContext, parts: &mut Parts, body: Option<Bytes>) -> Result<()> {
    let mut req = SigningRequest::from_parts(parts)?;
    req.headers.remove(header::AUTHORIZATION);
    req.body = body;

    let mut added = Vec::with_capacity(2);
    if !req.headers.contains_key(X_AMZ_DATE) {
        added.push((X_AMZ_DATE, HeaderValue::try_from(ctx.timestamp())?));
    }
    if !req.headers.contains_key(X_AMZ_CONTENT_SHA_256) {
        let hash = hex_sha256(req.body.as_deref().unwrap_or_default());
        added.push((X_AMZ_CONTENT_SHA_256, HeaderValue::try_from(hash)?));
    }
    for (name, value) in added.iter() {
        req.headers.insert(*name, value.clone());
    }

    let authorization = Signer::new(req, ctx.clone())?.to_auth_header()?;
    let mut authorization = HeaderValue::try_from(authorization)?;
    authorization.set_sensitive(true);

    for (name, value) in added {
        parts.headers.insert(name, value);
    }
    parts.headers.insert(header::AUTHORIZATION, authorization);
    Ok(())
}

/// Presign the request: its uri is rewritten to carry the signature.
pub fn presign_parts(ctx: &SigningContext, parts: &mut Parts) -> Result<()> {
    let req = SigningRequest::from_parts(parts)?;
    let path = encode_path(&req.path);
    let query = Signer::new(req, ctx.clone())?.to_presigned_query()?;

    debug!("presigned request for path {path}");
    let paq = format!("{path}?{}", canonical_query_string(&query));

    let mut uri = mem::take(&mut parts.uri).into_parts();
    uri.path_and_query = Some(PathAndQuery::from_str(&paq)?);
    parts.uri = Uri::from_parts(uri)?;
    Ok(())
}
