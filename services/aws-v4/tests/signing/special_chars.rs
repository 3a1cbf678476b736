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

use super::{compare_request, init_signing_test, sign_with_aws_sigv4};
use anyhow::Result;
use apisign_aws_v4::encode::encode_path;
use apisign_aws_v4::{presign_parts, sign_parts};
use apisign_core::time::now;
use http::Request;
use std::time::Duration;
use test_case::test_case;

fn build_request(path: &str, query: &str) -> Request<&'static str> {
    let mut uri = format!("http://127.0.0.1:9000{}", encode_path(path));
    if !query.is_empty() {
        uri.push('?');
        uri.push_str(query);
    }

    Request::get(uri).body("").expect("request must be valid")
}

#[test_case("/!@#$%^&*()_+-=;:'><,/?.txt", ""; "punctuation")]
#[test_case("/hello world/a+b c.txt", ""; "spaces and plus")]
#[test_case("/文件/ファイル.txt", ""; "unicode")]
#[test_case("/~user/file-name_v1.0.txt", ""; "unreserved")]
#[test_case("/hello", "prefix=a%20b%2Bc&delimiter=%2F"; "encoded query")]
#[test_case("/hello", "marker=%E6%96%87%E4%BB%B6&acl"; "unicode query and bare name")]
fn test_sign_special_chars(path: &str, query: &str) -> Result<()> {
    let time = now();

    let mut expected_req = build_request(path, query);
    sign_with_aws_sigv4(&mut expected_req, time, None);

    let (mut parts, body) = build_request(path, query).into_parts();
    sign_parts(&init_signing_test(time), &mut parts, None)?;
    let actual_req = Request::from_parts(parts, body);

    compare_request(path, &expected_req, &actual_req);
    Ok(())
}

#[test_case("/!@#$%^&*()_+-=;:'><,/?.txt"; "punctuation")]
#[test_case("/hello world/a+b c.txt"; "spaces and plus")]
#[test_case("/文件/ファイル.txt"; "unicode")]
fn test_presign_special_chars(path: &str) -> Result<()> {
    let time = now();
    let expires_in = Duration::from_secs(600);

    let mut expected_req = build_request(path, "");
    sign_with_aws_sigv4(&mut expected_req, time, Some(expires_in));

    let (mut parts, body) = build_request(path, "").into_parts();
    presign_parts(&init_signing_test(time).with_expires_in(expires_in), &mut parts)?;
    let actual_req = Request::from_parts(parts, body);

    compare_request(path, &expected_req, &actual_req);
    Ok(())
}
