//! DeepL API translation client.
//! Connection pooling via reqwest, single attempt per call, bounded by the
//! client-level request timeout.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{TranslateError, TranslateRequest, Translator};

pub const DEFAULT_API_URL: &str = "https://api-free.deepl.com/v2/translate";

/// Error bodies are truncated to this many characters in error messages.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// DeepL `/v2/translate` client.
pub struct DeepLClient {
    http: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl DeepLClient {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> Result<Self, TranslateError> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(timeout)
            .build()
            .map_err(|e| TranslateError::Api(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            api_url,
        })
    }
}

#[async_trait]
impl Translator for DeepLClient {
    async fn translate(&self, request: &TranslateRequest) -> Result<String, TranslateError> {
        if request.source_text.trim().is_empty() {
            return Err(TranslateError::InvalidInput("empty source text".into()));
        }

        let body = DeepLRequest {
            text: vec![request.source_text.as_str()],
            source_lang: &request.source_lang,
            target_lang: &request.target_lang,
        };

        let response = self
            .http
            .post(&self.api_url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranslateError::Timeout
                } else {
                    TranslateError::Api(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(TranslateError::Api(format!(
                "unexpected status {}: {}",
                status,
                body_text.chars().take(MAX_ERROR_BODY_CHARS).collect::<String>()
            )));
        }

        let parsed: DeepLResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::Api(format!("malformed response: {e}")))?;

        first_translation(parsed)
    }
}

fn first_translation(response: DeepLResponse) -> Result<String, TranslateError> {
    let translation = response
        .translations
        .into_iter()
        .next()
        .ok_or_else(|| TranslateError::Api("response contained no translations".into()))?;

    if let Some(lang) = &translation.detected_source_language {
        debug!(detected = %lang, "DeepL detected source language");
    }
    Ok(translation.text)
}

// --- Wire types ---

#[derive(Serialize)]
struct DeepLRequest<'a> {
    text: Vec<&'a str>,
    source_lang: &'a str,
    target_lang: &'a str,
}

#[derive(Deserialize)]
struct DeepLResponse {
    translations: Vec<DeepLTranslation>,
}

#[derive(Deserialize)]
struct DeepLTranslation {
    detected_source_language: Option<String>,
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v2/translate")
    }

    fn request(text: &str) -> TranslateRequest {
        TranslateRequest {
            source_text: text.into(),
            source_lang: "JA".into(),
            target_lang: "EN".into(),
        }
    }

    #[tokio::test]
    async fn posts_request_and_reads_first_translation() {
        let app = Router::new().route(
            "/v2/translate",
            post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                assert_eq!(headers["authorization"], "DeepL-Auth-Key secret");
                assert_eq!(body["text"][0], "りんご");
                assert_eq!(body["target_lang"], "EN");
                Json(serde_json::json!({
                    "translations": [{"detected_source_language": "JA", "text": "apple"}]
                }))
            }),
        );
        let client = DeepLClient::new("secret".into(), serve(app).await, Duration::from_secs(5))
            .unwrap();

        assert_eq!(client.translate(&request("りんご")).await.unwrap(), "apple");
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let app = Router::new().route(
            "/v2/translate",
            post(|| async { (StatusCode::FORBIDDEN, "Wrong endpoint. Use https://api.deepl.com") }),
        );
        let client = DeepLClient::new("secret".into(), serve(app).await, Duration::from_secs(5))
            .unwrap();

        match client.translate(&request("りんご")).await {
            Err(TranslateError::Api(message)) => {
                assert!(message.contains("403"), "{message}");
                assert!(message.contains("Wrong endpoint"), "{message}");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn long_error_body_is_truncated() {
        let app = Router::new().route(
            "/v2/translate",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "x".repeat(1000)) }),
        );
        let client = DeepLClient::new("secret".into(), serve(app).await, Duration::from_secs(5))
            .unwrap();

        let Err(TranslateError::Api(message)) = client.translate(&request("りんご")).await else {
            panic!("expected Api error");
        };
        let (_, body) = message.rsplit_once(": ").unwrap();
        assert_eq!(body.len(), MAX_ERROR_BODY_CHARS);
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let app = Router::new().route(
            "/v2/translate",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );
        let client =
            DeepLClient::new("secret".into(), serve(app).await, Duration::from_millis(50)).unwrap();

        assert!(matches!(
            client.translate(&request("りんご")).await,
            Err(TranslateError::Timeout)
        ));
    }

    #[test]
    fn request_body_shape() {
        let body = DeepLRequest {
            text: vec!["りんご"],
            source_lang: "JA",
            target_lang: "EN",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"text": ["りんご"], "source_lang": "JA", "target_lang": "EN"})
        );
    }

    #[test]
    fn takes_first_translation() {
        let response: DeepLResponse = serde_json::from_str(
            r#"{"translations": [{"detected_source_language": "JA", "text": "apple"}]}"#,
        )
        .unwrap();
        assert_eq!(first_translation(response).unwrap(), "apple");
    }

    #[test]
    fn empty_translations_is_an_error() {
        let response: DeepLResponse = serde_json::from_str(r#"{"translations": []}"#).unwrap();
        assert!(matches!(
            first_translation(response),
            Err(TranslateError::Api(_))
        ));
    }

    #[tokio::test]
    async fn rejects_empty_input_without_network() {
        let client = DeepLClient::new(
            "key".into(),
            "http://127.0.0.1:9/v2/translate".into(),
            Duration::from_secs(1),
        )
        .unwrap();
        let request = TranslateRequest {
            source_text: "  ".into(),
            source_lang: "EN".into(),
            target_lang: "JA".into(),
        };
        assert!(matches!(
            client.translate(&request).await,
            Err(TranslateError::InvalidInput(_))
        ));
    }
}
