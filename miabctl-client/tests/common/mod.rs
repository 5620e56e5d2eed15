//! Shared helpers for the mock-server API tests.

#![allow(dead_code)]

use miabctl_client::Config;
use wiremock::MockServer;

/// User every test authenticates as.
pub const TEST_USER: &str = "test";
/// Password every test authenticates with.
pub const TEST_PASSWORD: &str = "secret";
/// Expected `Authorization` header ("test:secret", base64).
pub const BASIC_AUTH: &str = "Basic dGVzdDpzZWNyZXQ=";

/// Build a [`Config`] pointing at the given mock server.
pub fn test_config(server: &MockServer) -> Config {
    match Config::new(TEST_USER, TEST_PASSWORD, &server.uri()) {
        Ok(config) => config,
        Err(e) => panic!("config for mock server failed: {e}"),
    }
}

/// Assert that a `Result` is `Ok` and unwrap it (fails the test otherwise).
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Assert that a `Result` is `Err` and unwrap the error (fails the test
/// otherwise).
#[macro_export]
macro_rules! require_err {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_err(), "expected Err(..), got {res:?}");
        let Err(err) = res else {
            return;
        };
        err
    }};
}
