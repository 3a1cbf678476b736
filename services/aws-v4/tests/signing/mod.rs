mod presigned;
mod special_chars;

use std::time::{Duration, SystemTime};

use apisign_aws_v4::{Credential, SigningContext};
use apisign_core::time::DateTime;
use aws_credential_types::Credentials;
use aws_sigv4::http_request::{
    PayloadChecksumKind, PercentEncodingMode, SignableBody, SignableRequest, SignatureLocation,
    SigningSettings,
};
use aws_sigv4::sign::v4;
use http::Request;
use pretty_assertions::assert_eq;

/// (name, request_builder)
pub type TestCase = (&'static str, fn() -> Request<&'static str>);

/// Build a context signing for `s3` in region `test` at `time`.
pub fn init_signing_test(time: DateTime) -> SigningContext {
    let _ = env_logger::builder().is_test(true).try_init();

    SigningContext::new(
        "s3",
        "test",
        Credential::new("access_key_id", "secret_access_key"),
    )
    .with_time(time)
}

/// Sign the request with aws-sigv4 as reference.
///
/// With `expires_in` the signature goes to the query and the payload stays
/// unsigned, otherwise the body is hashed into `x-amz-content-sha256`.
pub fn sign_with_aws_sigv4(
    req: &mut Request<&'static str>,
    time: DateTime,
    expires_in: Option<Duration>,
) {
    let mut ss = SigningSettings::default();
    ss.percent_encoding_mode = PercentEncodingMode::Single;
    if let Some(expires_in) = expires_in {
        ss.signature_location = SignatureLocation::QueryParams;
        ss.expires_in = Some(expires_in);
    } else {
        ss.payload_checksum_kind = PayloadChecksumKind::XAmzSha256;
    }

    let id = Credentials::new(
        "access_key_id",
        "secret_access_key",
        None,
        None,
        "hardcoded-credentials",
    )
    .into();
    let sp = v4::SigningParams::builder()
        .identity(&id)
        .region("test")
        .name("s3")
        .time(SystemTime::from(time))
        .settings(ss)
        .build()
        .expect("signing params must be valid");

    let body = match expires_in {
        Some(_) => SignableBody::UnsignedPayload,
        None => SignableBody::Bytes(req.body().as_bytes()),
    };

    let output = aws_sigv4::http_request::sign(
        SignableRequest::new(
            req.method().as_str(),
            req.uri().to_string(),
            req.headers()
                .iter()
                .map(|(k, v)| (k.as_str(), std::str::from_utf8(v.as_bytes()).unwrap())),
            body,
        )
        .unwrap(),
        &sp.into(),
    )
    .expect("signing must succeed");
    let (aws_sig, _) = output.into_parts();
    aws_sig.apply_to_request_http1x(req);
}

#[track_caller]
pub fn compare_request(name: &str, l: &Request<&str>, r: &Request<&str>) {
    fn format_headers(req: &Request<&str>) -> Vec<String> {
        let mut hs = req
            .headers()
            .iter()
            .map(|(k, v)| format!("{}:{}", k, v.to_str().expect("must be valid")))
            .collect::<Vec<_>>();

        // Insert host if original request doesn't have it.
        if !hs.contains(&format!("host:{}", req.uri().authority().unwrap())) {
            hs.push(format!("host:{}", req.uri().authority().unwrap()))
        }

        hs.sort();
        hs
    }

    assert_eq!(
        format_headers(l),
        format_headers(r),
        "{name} header mismatch"
    );

    fn format_query(req: &Request<&str>) -> Vec<String> {
        let query = req.uri().query().unwrap_or_default();
        let mut query = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| format!("{}={}", &k, &v))
            .collect::<Vec<_>>();
        query.sort();
        query
    }

    assert_eq!(format_query(l), format_query(r), "{name} query mismatch");
    assert_eq!(l.uri().path(), r.uri().path(), "{name} path mismatch");
}
