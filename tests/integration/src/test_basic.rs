//! Basic authentication integration tests.

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use gremlin_auth::{Auth, Authenticator};

    use crate::mock_request;

    #[test]
    fn test_should_add_basic_header_to_driver_request() {
        let mut request = mock_request();
        let original = request.clone();
        assert!(!request.headers.contains_key("authorization"));

        Auth::basic("username", "password")
            .apply(&mut request)
            .unwrap();

        let expected = format!("Basic {}", STANDARD.encode("username:password"));
        assert_eq!(request.header("authorization"), Some(expected.as_str()));
        assert_eq!(request.header("content-type"), original.header("content-type"));
        assert_eq!(request.header("accept"), original.header("accept"));
        assert_eq!(request.url, original.url);
        assert_eq!(request.payload, original.payload);
    }

    #[test]
    fn test_should_decode_back_to_original_pair() {
        for (username, password) in [("neptune", "s3cr3t:with:colons"), ("", ""), ("ünï", "ç")] {
            let mut request = mock_request();
            Auth::basic(username, password).apply(&mut request).unwrap();

            let header = request.header("authorization").unwrap();
            let encoded = header.strip_prefix("Basic ").unwrap();
            let decoded = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
            assert_eq!(decoded, format!("{username}:{password}"));
        }
    }

    #[test]
    fn test_should_produce_same_header_on_reapply() {
        let auth = Auth::basic("u", "p");
        let mut request = mock_request();
        auth.apply(&mut request).unwrap();
        let first = request.clone();
        auth.apply(&mut request).unwrap();

        assert_eq!(request, first);
    }
}
