#[cfg(test)]
mod gemini_tests {
    use note_maker_server::generation::{GeminiProvider, GenerationError, GenerationProvider};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const API_KEY: &str = "AIzaTestKey0123456789";

    fn provider(server: &MockServer) -> GeminiProvider {
        GeminiProvider::new(reqwest::Client::new(), server.uri(), API_KEY)
    }

    #[tokio::test]
    async fn test_list_models_follows_page_tokens() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1beta/models"))
            .and(header("x-goog-api-key", API_KEY))
            .and(query_param_is_missing("pageToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [
                    {"name": "models/gemini-pro", "supportedGenerationMethods": ["generateContent"]}
                ],
                "nextPageToken": "page-2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1beta/models"))
            .and(header("x-goog-api-key", API_KEY))
            .and(query_param("pageToken", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [
                    {"name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"]},
                    {"name": "models/gemini-2.5-flash", "supportedGenerationMethods": ["generateContent"]}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let models = provider(&server).list_models().await.unwrap();

        let names: Vec<&str> = models.iter().map(|model| model.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["models/gemini-pro", "models/embedding-001", "models/gemini-2.5-flash"]
        );
        assert!(!models[1].supports_generation());
    }

    #[tokio::test]
    async fn test_generate_sends_key_prompt_and_temperature() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-pro:generateContent"))
            .and(header("x-goog-api-key", API_KEY))
            .and(body_partial_json(json!({
                "contents": [{"role": "user", "parts": [{"text": "Explain closures"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "# Closures\n"}, {"text": "- capture"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = provider(&server)
            .generate("Explain closures", "models/gemini-pro", 0.7)
            .await
            .unwrap();

        assert_eq!(text, "# Closures\n- capture");
    }

    #[tokio::test]
    async fn test_error_envelope_becomes_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-pro:generateContent"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}
            })))
            .mount(&server)
            .await;

        let result = provider(&server).generate("prompt", "gemini-pro", 0.7).await;

        match result {
            Err(GenerationError::Provider { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_models_failure_keeps_raw_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1beta/models"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream unavailable"))
            .mount(&server)
            .await;

        let result = provider(&server).list_models().await;

        assert!(matches!(
            result,
            Err(GenerationError::Provider { status: 500, ref message }) if message == "upstream unavailable"
        ));
    }

    #[tokio::test]
    async fn test_candidate_without_text_is_empty_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-pro:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"finishReason": "SAFETY"}]
            })))
            .mount(&server)
            .await;

        let result = provider(&server).generate("prompt", "gemini-pro", 0.7).await;

        assert!(matches!(result, Err(GenerationError::EmptyResponse)));
    }
}
