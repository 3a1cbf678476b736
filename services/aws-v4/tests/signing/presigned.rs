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

use super::{compare_request, init_signing_test, sign_with_aws_sigv4, TestCase};
use anyhow::Result;
use apisign_aws_v4::presign_parts;
use apisign_core::time::now;
use apisign_core::ErrorKind;
use http::{Method, Request};
use pretty_assertions::assert_eq;
use std::time::Duration;
use test_case::test_case;

fn test_cases() -> Vec<TestCase> {
    vec![
        ("get_object", || {
            Request::get("http://127.0.0.1:9000/hello")
                .body("")
                .expect("request must be valid")
        }),
        ("list_objects", || {
            Request::get("http://127.0.0.1:9000/hello?list-type=2&max-keys=3&prefix=CI/")
                .body("")
                .expect("request must be valid")
        }),
        ("get_object_virtual_host", || {
            Request::get("http://hello.s3.test.example.com/world.txt")
                .body("")
                .expect("request must be valid")
        }),
        ("get_object_with_response_override", || {
            Request::get(
                "http://hello.s3.test.example.com/world.txt?response-content-disposition=attachment%3B%20filename%3Dworld.txt",
            )
            .body("")
            .expect("request must be valid")
        }),
    ]
}

#[test]
fn test_presign_parts_matches_aws_sigv4() -> Result<()> {
    for (name, req_fn) in test_cases() {
        let time = now();
        let expires_in = Duration::from_secs(3600);

        let mut expected_req = req_fn();
        sign_with_aws_sigv4(&mut expected_req, time, Some(expires_in));

        let (mut parts, body) = req_fn().into_parts();
        presign_parts(&init_signing_test(time).with_expires_in(expires_in), &mut parts)?;
        let actual_req = Request::from_parts(parts, body);

        compare_request(name, &expected_req, &actual_req);
    }
    Ok(())
}

#[test_case(Duration::from_secs(1); "shortest")]
#[test_case(Duration::from_secs(604800); "longest")]
fn test_presign_parts_expires_in_bounds(expires_in: Duration) -> Result<()> {
    let (mut parts, _) = Request::get("http://127.0.0.1:9000/hello")
        .body(())?
        .into_parts();

    presign_parts(&init_signing_test(now()).with_expires_in(expires_in), &mut parts)?;

    let expires = form_urlencoded::parse(parts.uri.query().unwrap_or_default().as_bytes())
        .find(|(k, _)| k == "X-Amz-Expires")
        .map(|(_, v)| v.into_owned());
    assert_eq!(expires, Some(expires_in.as_secs().to_string()));
    Ok(())
}

#[test_case(Duration::ZERO; "zero")]
#[test_case(Duration::from_secs(604801); "longer than seven days")]
fn test_presign_parts_expires_in_out_of_bounds(expires_in: Duration) -> Result<()> {
    let (mut parts, _) = Request::get("http://127.0.0.1:9000/hello")
        .body(())?
        .into_parts();

    let err = presign_parts(&init_signing_test(now()).with_expires_in(expires_in), &mut parts)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    Ok(())
}

#[test_case(Method::PUT, "", None, ErrorKind::InvalidOperation; "put")]
#[test_case(Method::GET, "x-amz-meta-a", None, ErrorKind::InvalidOperation; "with header")]
#[test_case(Method::GET, "", Some("X-Amz-Signature=abc"), ErrorKind::UnsupportedArgumentCombination; "reserved query")]
fn test_presign_parts_rejected(
    method: Method,
    header: &str,
    query: Option<&str>,
    kind: ErrorKind,
) -> Result<()> {
    let uri = match query {
        Some(query) => format!("http://127.0.0.1:9000/hello?{query}"),
        None => "http://127.0.0.1:9000/hello".to_string(),
    };
    let mut builder = Request::builder().method(method).uri(uri.as_str());
    if !header.is_empty() {
        builder = builder.header(header, "value");
    }
    let (mut parts, _) = builder.body(())?.into_parts();

    let ctx = init_signing_test(now()).with_expires_in(Duration::from_secs(3600));
    let err = presign_parts(&ctx, &mut parts).unwrap_err();
    assert_eq!(err.kind(), kind);
    assert_eq!(parts.uri.to_string(), uri);
    Ok(())
}
