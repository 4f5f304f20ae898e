use std::future::Future;

use spikecoder_core::docs::{DocumentationCorpus, SPIKE_PRIME};
use spikecoder_core::generation::{
    build_model_request, decode_response, GenerationError, GenerationRequest, GenerationResult,
    ModelRequest,
};

/// A generative model that can answer one packaged request.
///
/// `Ok(None)` means the provider answered without any text.
pub trait ModelBackend {
    fn complete(
        &self,
        request: &ModelRequest,
    ) -> impl Future<Output = Result<Option<String>, GenerationError>> + Send;
}

/// Packages requests, calls the backend once, and strictly decodes the reply.
///
/// Holds no per-call state. Each call either yields a complete
/// [`GenerationResult`] or exactly one [`GenerationError`]; there are no
/// retries.
#[derive(Debug)]
pub struct GenerationService<B> {
    backend: B,
    model: String,
    corpus: &'static DocumentationCorpus,
}

impl<B: ModelBackend> GenerationService<B> {
    pub fn new(backend: B, model: impl Into<String>) -> Self {
        Self::with_corpus(backend, model, &SPIKE_PRIME)
    }

    pub fn with_corpus(
        backend: B,
        model: impl Into<String>,
        corpus: &'static DocumentationCorpus,
    ) -> Self {
        let missing = corpus.missing_sections();
        if !missing.is_empty() {
            log::warn!(
                "Documentation corpus {} is missing sections {:?}; generated code may reference unsupported APIs",
                corpus.version(),
                missing
            );
        }

        Self {
            backend,
            model: model.into(),
            corpus,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn corpus(&self) -> &'static DocumentationCorpus {
        self.corpus
    }

    /// The exact request that [`generate`](Self::generate) would send.
    pub fn model_request(&self, request: &GenerationRequest) -> ModelRequest {
        build_model_request(&self.model, request, self.corpus)
    }

    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        let packaged = self.model_request(&request);

        log::debug!(
            "Generating with model {} (corpus {}): system {} chars, prompt {} chars",
            packaged.model,
            self.corpus.version(),
            packaged.system_instruction.len(),
            packaged.prompt.len()
        );

        let raw = match self.backend.complete(&packaged).await {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Model call failed: {e}");
                return Err(e);
            }
        };

        match decode_response(raw.as_deref()) {
            Ok(result) => {
                log::debug!(
                    "Generated {} chars of code, {} chars of explanation",
                    result.code.len(),
                    result.explanation.len()
                );
                Ok(result)
            }
            Err(e) => {
                log::warn!("Rejected model response: {e}");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// In-memory backend that replays a canned outcome and records requests.
    pub(crate) struct ScriptedBackend {
        reply: Result<Option<String>, GenerationError>,
        pub(crate) seen: Mutex<Vec<ModelRequest>>,
    }

    impl ScriptedBackend {
        pub(crate) fn text(text: &str) -> Self {
            Self::outcome(Ok(Some(text.to_string())))
        }

        pub(crate) fn outcome(reply: Result<Option<String>, GenerationError>) -> Self {
            Self {
                reply,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl ModelBackend for ScriptedBackend {
        async fn complete(
            &self,
            request: &ModelRequest,
        ) -> Result<Option<String>, GenerationError> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply.clone()
        }
    }

    fn request(instruction: &str, prior_code: &str) -> GenerationRequest {
        GenerationRequest::new(instruction, prior_code).unwrap()
    }

    #[tokio::test]
    async fn test_exact_json_is_returned_unchanged() {
        let service = GenerationService::new(
            ScriptedBackend::text(
                r#"{"code":"motor.run(port.A,100)","explanation":"runs motor A"}"#,
            ),
            "gemini-2.5-flash",
        );

        let result = service.generate(request("run motor A", "")).await.unwrap();
        assert_eq!(
            result,
            GenerationResult {
                code: "motor.run(port.A,100)".to_string(),
                explanation: "runs motor A".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_backend_receives_packaged_request() {
        let service = GenerationService::new(
            ScriptedBackend::text(r#"{"code":"x","explanation":"y"}"#),
            "gemini-2.5-flash",
        );
        let req = request("beep", "import hub");
        let expected = service.model_request(&req);

        service.generate(req).await.unwrap();

        let seen = service.backend.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[expected]);
        assert_eq!(seen[0].model, service.model());
        assert!(seen[0].system_instruction.contains(SPIKE_PRIME.text()));
        assert!(seen[0].prompt.contains("import hub"));
    }

    #[tokio::test]
    async fn test_packaging_is_deterministic_across_calls() {
        let service = GenerationService::new(
            ScriptedBackend::text(r#"{"code":"x","explanation":"y"}"#),
            "gemini-2.5-flash",
        );

        service
            .generate(request("spin", "motor.stop(port.A)"))
            .await
            .unwrap();
        service
            .generate(request("spin", "motor.stop(port.A)"))
            .await
            .unwrap();

        let seen = service.backend.seen.lock().unwrap();
        assert_eq!(
            serde_json::to_vec(&seen[0]).unwrap(),
            serde_json::to_vec(&seen[1]).unwrap()
        );
    }

    #[tokio::test]
    async fn test_free_text_fails_as_malformed() {
        let service = GenerationService::new(
            ScriptedBackend::text("I think you should use motor_pair."),
            "gemini-2.5-flash",
        );

        let err = service.generate(request("drive", "")).await.unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_no_text_fails_as_empty() {
        let service =
            GenerationService::new(ScriptedBackend::outcome(Ok(None)), "gemini-2.5-flash");

        let err = service.generate(request("drive", "")).await.unwrap_err();
        assert_eq!(err, GenerationError::EmptyResponse);
    }

    #[tokio::test]
    async fn test_upstream_errors_propagate_unchanged() {
        let upstream = GenerationError::UpstreamError("HTTP 401: API key not valid".to_string());
        let service = GenerationService::new(
            ScriptedBackend::outcome(Err(upstream.clone())),
            "gemini-2.5-flash",
        );

        let err = service.generate(request("drive", "")).await.unwrap_err();
        assert_eq!(err, upstream);
    }

    #[tokio::test]
    async fn test_obstacle_then_spin_scenario() {
        let reply = serde_json::json!({
            "code": "import distance_sensor\nimport motor_pair\nimport runloop\nfrom hub import port\n\nasync def main():\n    motor_pair.pair(motor_pair.PAIR_1, port.C, port.D)\n    motor_pair.move(motor_pair.PAIR_1, 0, velocity=250)\n    while True:\n        d = distance_sensor.distance(port.E)\n        if d != -1 and d <= 150:\n            break\n        await runloop.sleep_ms(10)\n    motor_pair.stop(motor_pair.PAIR_1)\n    await motor_pair.move_tank_for_degrees(motor_pair.PAIR_1, 360, 250, -250)\n\nrunloop.run(main())\n",
            "explanation": "Drives forward at 250 deg/s until the distance sensor on E reads 15 cm, then spins in place."
        })
        .to_string();
        let service = GenerationService::new(ScriptedBackend::text(&reply), "gemini-2.5-flash");

        let result = service
            .generate(request(
                "move forward at 250 until an obstacle is 15cm away, then spin 360 degrees",
                "",
            ))
            .await
            .unwrap();

        assert!(result.code.contains("distance_sensor.distance"));
        assert!(result.code.contains("motor_pair.move("));
        assert!(result.code.contains("250"));
        assert!(result.code.contains("move_tank_for_degrees"));
        assert!(result.code.contains("360"));
        assert!(!result.explanation.trim().is_empty());
    }

    #[tokio::test]
    async fn test_degraded_corpus_still_generates() {
        static THIN: DocumentationCorpus =
            DocumentationCorpus::new("thin", "Motor Module: import motor\n- run(port, velocity)");

        let service = GenerationService::with_corpus(
            ScriptedBackend::text(r#"{"code":"import motor","explanation":"imports motor"}"#),
            "gemini-2.5-flash",
            &THIN,
        );

        let result = service.generate(request("run a motor", "")).await.unwrap();
        assert_eq!(result.code, "import motor");
        assert_eq!(service.corpus().version(), "thin");
    }
}
