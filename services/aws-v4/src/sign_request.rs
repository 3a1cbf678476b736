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

use std::fmt::Write;
use std::time::Duration;

use apisign_core::hash::{hex_hmac_sha256, hmac_sha256};
use apisign_core::time::{format_date, format_iso8601, now, parse_iso8601, DateTime};
use apisign_core::{Error, QueryArgs, QueryValue, Result, SigningRequest};
use http::HeaderMap;
use log::debug;

use crate::canonical::CanonicalRequest;
use crate::constants::{
    AWS4_HMAC_SHA256, AWS4_KEY_PREFIX, AWS4_REQUEST, PRESIGN_MAX_EXPIRES_SECS,
    PRESIGN_RESERVED_QUERY, UNSIGNED_PAYLOAD, X_AMZ_ALGORITHM, X_AMZ_CREDENTIAL, X_AMZ_DATE_QUERY,
    X_AMZ_EXPIRES, X_AMZ_SIGNATURE, X_AMZ_SIGNED_HEADERS,
};
use crate::Credential;

/// Everything about a signature that is not part of the request itself.
///
/// The signing time is fixed when the context is created and never
/// refreshed, so one context always yields the same signature for the same
/// request.
#[derive(Debug, Clone)]
pub struct SigningContext {
    /// Service name, for example `s3` or `ses`.
    pub service: String,
    /// Region name, for example `us-east-1`.
    pub region: String,
    /// Credential used to sign.
    pub credential: Credential,

    time: DateTime,
    expires_in: Option<Duration>,
}

impl SigningContext {
    /// Create a new context signing at the current time.
    pub fn new(service: &str, region: &str, credential: Credential) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
            credential,

            time: now(),
            expires_in: None,
        }
    }

    /// Specify the signing time.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = time;
        self
    }

    /// Specify the signing time as `YYYYMMDDThhmmssZ`.
    pub fn with_timestamp(self, timestamp: &str) -> Result<Self> {
        Ok(self.with_time(parse_iso8601(timestamp)?))
    }

    /// Specify how long a presigned url stays valid, in whole seconds.
    pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = Some(expires_in);
        self
    }

    /// Signing time.
    pub fn time(&self) -> DateTime {
        self.time
    }

    /// Signing time as `YYYYMMDDThhmmssZ`.
    pub fn timestamp(&self) -> String {
        format_iso8601(self.time)
    }

    /// Signing date as `YYYYMMDD`.
    pub fn date(&self) -> String {
        format_date(self.time)
    }

    /// Validity of a presigned url.
    pub fn expires_in(&self) -> Option<Duration> {
        self.expires_in
    }

    /// Credential scope: `<date>/<region>/<service>/aws4_request`.
    pub fn scope(&self) -> String {
        format!(
            "{}/{}/{}/{AWS4_REQUEST}",
            self.date(),
            self.region,
            self.service
        )
    }
}

/// Signer that implements AWS SigV4 for one request.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// The signer holds no state besides its inputs: both operations may be
/// called any number of times, from any thread, with the same result.
#[derive(Debug, Clone)]
pub struct Signer {
    req: SigningRequest,
    ctx: SigningContext,
}

impl Signer {
    /// Create a new signer, checking that every required field is set.
    pub fn new(req: SigningRequest, ctx: SigningContext) -> Result<Self> {
        let required = [
            ("method", req.method.as_str()),
            ("host", req.host.as_str()),
            ("path", req.path.as_str()),
            ("service", ctx.service.as_str()),
            ("region", ctx.region.as_str()),
        ];
        for (name, value) in required {
            if value.is_empty() {
                return Err(Error::missing_argument(format!("{name} is required")));
            }
        }
        if !ctx.credential.is_valid() {
            return Err(Error::missing_argument(
                "credential requires both access_key_id and secret_access_key",
            ));
        }

        if !req.path.starts_with('/') {
            return Err(Error::invalid_argument(format!(
                "path {:?} must start with '/'",
                req.path
            )));
        }

        Ok(Self { req, ctx })
    }

    /// Sign the request and build the value of its `Authorization` header.
    ///
    /// Valid for any method. The context must not carry an expiry, which
    /// only applies to presigned urls.
    pub fn to_auth_header(&self) -> Result<String> {
        if self.ctx.expires_in.is_some() {
            return Err(Error::unsupported_argument_combination(
                "expires_in is only supported by presigned urls",
            ));
        }

        let creq = CanonicalRequest::build(&self.req)?;
        let signature = self.calculate_signature(&creq)?;

        Ok(format!(
            "{AWS4_HMAC_SHA256} Credential={}/{}, SignedHeaders={}, Signature={}",
            self.ctx.credential.access_key_id,
            self.ctx.scope(),
            creq.signed_headers,
            signature
        ))
    }

    /// Sign the request as a presigned url.
    ///
    /// Returns the request's own query arguments together with the
    /// `X-Amz-*` arguments that carry the signature. Only `GET` requests
    /// without headers and body can be presigned, and the context must carry
    /// an expiry.
    pub fn to_presigned_query(&self) -> Result<QueryArgs> {
        if self.req.method != "GET" {
            return Err(Error::invalid_operation(format!(
                "presigned url only supports GET, got {}",
                self.req.method
            )));
        }
        if self.req.has_headers_or_body() {
            return Err(Error::invalid_operation(
                "presigned url can't carry headers or body",
            ));
        }

        let expires_in = self
            .ctx
            .expires_in
            .ok_or_else(|| Error::missing_argument("expires_in is required by presigned urls"))?;
        if expires_in.subsec_nanos() != 0 {
            return Err(Error::invalid_argument(format!(
                "expires_in must be whole seconds, got {expires_in:?}"
            )));
        }
        let expires_in = expires_in.as_secs();
        if expires_in == 0 || expires_in > PRESIGN_MAX_EXPIRES_SECS {
            return Err(Error::invalid_argument(format!(
                "expires_in must be between 1 and {PRESIGN_MAX_EXPIRES_SECS} seconds, got {expires_in}"
            )));
        }

        if let Some(name) = PRESIGN_RESERVED_QUERY
            .iter()
            .find(|name| self.req.query.contains_key(**name))
        {
            return Err(Error::unsupported_argument_combination(format!(
                "query argument {name} is reserved by presigned urls"
            )));
        }

        let mut query = self.req.query.clone();
        query.insert(X_AMZ_ALGORITHM.into(), AWS4_HMAC_SHA256.into());
        query.insert(
            X_AMZ_CREDENTIAL.into(),
            format!(
                "{}/{}",
                self.ctx.credential.access_key_id,
                self.ctx.scope()
            )
            .into(),
        );
        query.insert(X_AMZ_DATE_QUERY.into(), self.ctx.timestamp().into());
        query.insert(X_AMZ_EXPIRES.into(), expires_in.to_string().into());
        query.insert(X_AMZ_SIGNED_HEADERS.into(), "host".into());

        // The body of a presigned request is unknown at signing time.
        let presigned = SigningRequest {
            method: self.req.method.clone(),
            host: self.req.host.clone(),
            path: self.req.path.clone(),
            query,
            headers: HeaderMap::new(),
            body: None,
            payload_hash: Some(
                self.req
                    .payload_hash
                    .clone()
                    .unwrap_or_else(|| UNSIGNED_PAYLOAD.to_string()),
            ),
        };

        let creq = CanonicalRequest::build(&presigned)?;
        let signature = self.calculate_signature(&creq)?;

        let mut query = presigned.query;
        query.insert(X_AMZ_SIGNATURE.into(), QueryValue::String(signature));
        Ok(query)
    }

    fn calculate_signature(&self, creq: &CanonicalRequest) -> Result<String> {
        let scope = self.ctx.scope();
        debug!("calculated scope: {scope}");

        let string_to_sign = string_to_sign(self.ctx.time, &scope, &creq.digest)?;
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = generate_signing_key(
            &self.ctx.credential.secret_access_key,
            &self.ctx.date(),
            &self.ctx.region,
            &self.ctx.service,
        );
        Ok(hex_hmac_sha256(&signing_key, string_to_sign.as_bytes()))
    }
}

/// Build the string to sign.
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20220313T072004Z
/// 20220313/<region>/<service>/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(time: DateTime, scope: &str, digest: &str) -> Result<String> {
    let mut f = String::with_capacity(128);
    writeln!(f, "{AWS4_HMAC_SHA256}")?;
    writeln!(f, "{}", format_iso8601(time))?;
    writeln!(f, "{scope}")?;
    write!(f, "{digest}")?;
    Ok(f)
}

/// Derive the signing key scoped to `date/region/service`.
///
/// Every step keeps the raw HMAC output; nothing is hex encoded here.
pub fn generate_signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("{AWS4_KEY_PREFIX}{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), date.as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), AWS4_REQUEST.as_bytes())
}
