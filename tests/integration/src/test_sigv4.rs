//! SigV4 authentication integration tests.

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use aws_credential_types::Credentials;
    use aws_sigv4::http_request::{SignableBody, SignableRequest, SigningSettings, sign};
    use aws_sigv4::sign::v4;
    use aws_smithy_runtime_api::client::identity::Identity;
    use gremlin_auth::{Auth, AuthError, Authenticator, GremlinRequest, SigV4Config};

    use crate::{empty_env, fixed_signer, mock_request, signing_time};

    fn mock_config() -> SigV4Config {
        SigV4Config::builder()
            .region_name("us-west-2")
            .aws_access_key_id("MOCK_ID")
            .aws_secret_access_key("MOCK_KEY")
            .build()
    }

    fn signature_of(request: &GremlinRequest) -> String {
        let auth = request.header("Authorization").unwrap();
        auth.rsplit_once("Signature=").unwrap().1.to_owned()
    }

    /// Sign the same request with the AWS SDK signer and return its signature.
    fn reference_signature(url: &str, body: &[u8], session_token: Option<&str>) -> String {
        let identity: Identity = Credentials::new(
            "MOCK_ID",
            "MOCK_KEY",
            session_token.map(ToOwned::to_owned),
            None,
            "integration-test",
        )
        .into();
        let params = v4::SigningParams::builder()
            .identity(&identity)
            .region("us-west-2")
            .name("neptune-db")
            .time(SystemTime::from(signing_time()))
            .settings(SigningSettings::default())
            .build()
            .unwrap()
            .into();
        let signable =
            SignableRequest::new("POST", url, std::iter::empty(), SignableBody::Bytes(body))
                .unwrap();

        let (_instructions, signature) = sign(signable, &params).unwrap().into_parts();
        signature
    }

    #[test]
    fn test_should_sign_driver_request_with_explicit_credentials() {
        let mut request = mock_request();
        assert!(!request.headers.contains_key("Authorization"));
        assert!(!request.headers.contains_key("X-Amz-Date"));

        Auth::sigv4(&mock_config()).apply(&mut request).unwrap();

        assert!(request.header("X-Amz-Date").is_some());
        let auth = request.header("Authorization").unwrap();
        assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=MOCK_ID"));
        assert!(auth.contains("us-west-2/neptune-db/aws4_request"));
        assert!(auth.contains("Signature="));
        assert_eq!(
            request.header("content-type"),
            Some("application/vnd.graphbinary-v4.0")
        );
    }

    #[test]
    fn test_should_use_configured_service_name_in_scope() {
        let config = SigV4Config {
            service_name: "execute-api".to_owned(),
            ..mock_config()
        };
        let mut request = mock_request();
        Auth::sigv4_with_signer(&config, empty_env, fixed_signer())
            .apply(&mut request)
            .unwrap();

        assert!(
            request
                .header("Authorization")
                .unwrap()
                .contains("Credential=MOCK_ID/20240520/us-west-2/execute-api/aws4_request")
        );
    }

    #[test]
    fn test_should_produce_identical_signatures_at_same_instant() {
        let auth = Auth::sigv4_with_signer(&mock_config(), empty_env, fixed_signer());
        let mut first = GremlinRequest::graph_binary(crate::TEST_URL, &b"g.V().limit(1)"[..]);
        let mut second = first.clone();

        auth.apply(&mut first).unwrap();
        auth.apply(&mut second).unwrap();

        assert_eq!(signature_of(&first), signature_of(&second));
        assert_eq!(first.header("X-Amz-Date"), Some("20240520T174530Z"));
    }

    #[test]
    fn test_should_change_signature_with_payload() {
        let auth = Auth::sigv4_with_signer(&mock_config(), empty_env, fixed_signer());
        let mut first = GremlinRequest::graph_binary(crate::TEST_URL, &b"g.V()"[..]);
        let mut second = GremlinRequest::graph_binary(crate::TEST_URL, &b"g.V().count()"[..]);

        auth.apply(&mut first).unwrap();
        auth.apply(&mut second).unwrap();

        assert_ne!(signature_of(&first), signature_of(&second));
    }

    #[test]
    fn test_should_fail_before_signing_without_credentials() {
        let config = SigV4Config::builder().region_name("us-west-2").build();
        let auth = Auth::sigv4_with_signer(&config, empty_env, fixed_signer());
        let mut request = mock_request();
        let original = request.clone();

        let err = auth.apply(&mut request).unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
        assert!(err.to_string().contains("No credentials or session token found"));
        assert_eq!(request, original);
    }

    #[test]
    fn test_should_match_aws_sdk_signature() {
        let url = "https://db.cluster-abc.us-west-2.neptune.amazonaws.com/gremlin";
        let body = b"{\"gremlin\":\"g.V().count()\"}";
        let auth = Auth::sigv4_with_signer(&mock_config(), empty_env, fixed_signer());
        let mut request = GremlinRequest::new(url, &body[..]);

        auth.apply(&mut request).unwrap();

        assert_eq!(signature_of(&request), reference_signature(url, body, None));
    }

    #[test]
    fn test_should_match_aws_sdk_signature_for_varied_urls() {
        let host = "https://db.cluster-abc.us-west-2.neptune.amazonaws.com";
        let body = b"g.V()";
        let auth = Auth::sigv4_with_signer(&mock_config(), empty_env, fixed_signer());

        for suffix in ["/./gremlin", "/x/../gremlin", "", "/gremlin?b=2&a=1"] {
            let url = format!("{host}{suffix}");
            let mut request = GremlinRequest::new(url.as_str(), &body[..]);

            auth.apply(&mut request).unwrap();

            assert_eq!(
                signature_of(&request),
                reference_signature(&url, body, None),
                "signature mismatch for {url}"
            );
        }
    }

    #[test]
    fn test_should_match_aws_sdk_signature_with_session_token() {
        let url = "https://db.cluster-abc.us-west-2.neptune.amazonaws.com/gremlin";
        let config = SigV4Config {
            session_token: "MOCK_TOKEN".to_owned(),
            ..mock_config()
        };
        let auth = Auth::sigv4_with_signer(&config, empty_env, fixed_signer());
        let mut request = GremlinRequest::new(url, Vec::new());

        auth.apply(&mut request).unwrap();

        assert_eq!(request.header("X-Amz-Security-Token"), Some("MOCK_TOKEN"));
        assert_eq!(
            signature_of(&request),
            reference_signature(url, b"", Some("MOCK_TOKEN"))
        );
    }
}
