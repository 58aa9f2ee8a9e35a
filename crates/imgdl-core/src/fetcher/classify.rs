//! Classify curl errors into fetch error kinds.

use super::error::{ErrorKind, FetchError};

/// Classify a curl error. `response_started` is true once a status line was
/// received; failures before that point are connection problems, failures
/// after it are interrupted transfers.
pub fn classify_curl_error(e: &curl::Error, response_started: bool) -> ErrorKind {
    if e.is_aborted_by_callback() {
        return ErrorKind::Cancelled;
    }
    if e.is_url_malformed()
        || e.is_unsupported_protocol()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_couldnt_connect()
        || e.is_ssl_connect_error()
        || e.is_peer_failed_verification()
    {
        return ErrorKind::Connection;
    }
    if response_started {
        ErrorKind::Transport
    } else {
        ErrorKind::Connection
    }
}

/// Convert a curl error into the matching `FetchError`.
pub(crate) fn fetch_error_from_curl(e: &curl::Error, response_started: bool) -> FetchError {
    let message = e.to_string();
    match classify_curl_error(e, response_started) {
        ErrorKind::Cancelled => FetchError::Cancelled,
        ErrorKind::Transport => FetchError::Transport(message),
        _ => FetchError::Connection(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // libcurl CURLcode values
    const UNSUPPORTED_PROTOCOL: u32 = 1;
    const URL_MALFORMAT: u32 = 3;
    const COULDNT_RESOLVE_HOST: u32 = 6;
    const COULDNT_CONNECT: u32 = 7;
    const PARTIAL_FILE: u32 = 18;
    const OPERATION_TIMEDOUT: u32 = 28;
    const ABORTED_BY_CALLBACK: u32 = 42;
    const RECV_ERROR: u32 = 56;

    fn err(code: u32) -> curl::Error {
        curl::Error::new(code as _)
    }

    #[test]
    fn dns_and_connect_failures_are_connection_errors() {
        for code in [UNSUPPORTED_PROTOCOL, URL_MALFORMAT, COULDNT_RESOLVE_HOST, COULDNT_CONNECT] {
            assert_eq!(classify_curl_error(&err(code), false), ErrorKind::Connection);
            assert_eq!(classify_curl_error(&err(code), true), ErrorKind::Connection);
        }
    }

    #[test]
    fn timeout_depends_on_response_state() {
        assert_eq!(
            classify_curl_error(&err(OPERATION_TIMEDOUT), false),
            ErrorKind::Connection
        );
        assert_eq!(
            classify_curl_error(&err(OPERATION_TIMEDOUT), true),
            ErrorKind::Transport
        );
    }

    #[test]
    fn interrupted_stream_is_transport_error() {
        assert_eq!(classify_curl_error(&err(PARTIAL_FILE), true), ErrorKind::Transport);
        assert_eq!(classify_curl_error(&err(RECV_ERROR), true), ErrorKind::Transport);
    }

    #[test]
    fn callback_abort_is_cancellation() {
        assert_eq!(
            classify_curl_error(&err(ABORTED_BY_CALLBACK), true),
            ErrorKind::Cancelled
        );
        assert_eq!(
            fetch_error_from_curl(&err(ABORTED_BY_CALLBACK), false),
            FetchError::Cancelled
        );
    }

    #[test]
    fn converts_to_fetch_error() {
        assert!(matches!(
            fetch_error_from_curl(&err(COULDNT_CONNECT), false),
            FetchError::Connection(_)
        ));
        assert!(matches!(
            fetch_error_from_curl(&err(PARTIAL_FILE), true),
            FetchError::Transport(_)
        ));
    }
}
