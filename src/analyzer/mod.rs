mod client;
mod gemini;
mod http;
mod openai;

pub use client::{
    AiClient, CompletionProvider, ProbeResult, RetryPolicy, MAX_OUTPUT_TOKENS, TEMPERATURE,
    TOP_K, TOP_P,
};
pub use gemini::GenerativeProvider;
pub use openai::ChatCompletionProvider;

use crate::error::{AnalyzerError, Result};
use defi_analyzer_common::{
    build_analysis_prompt, combine_files, decode_files_with_skipped, parse_analysis,
    ParsedAnalysis, UploadedFile,
};

/// アップロード文書を解析する
///
/// 復号 → プロンプト生成 → AI呼び出し → 応答解析。
/// 応答がJSONとして読めない場合はプレースホルダ結果（degraded）を返す。
pub async fn analyze_files(client: &AiClient, files: Vec<UploadedFile>) -> Result<ParsedAnalysis> {
    if files.is_empty() {
        return Err(AnalyzerError::NoFiles);
    }

    let (decoded, skipped) = decode_files_with_skipped(&files);
    for name in &skipped {
        tracing::warn!(file = %name, "skipping file that is not valid UTF-8 text");
    }
    tracing::info!(
        received = files.len(),
        decoded = decoded.len(),
        "processing uploaded files"
    );

    let prompt = build_analysis_prompt(&combine_files(&decoded));
    let raw = client.complete(&prompt).await?;

    let parsed = parse_analysis(&raw);
    if parsed.is_degraded() {
        tracing::warn!(raw = %raw, "model reply was not valid analysis JSON, returning placeholder");
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai_provider::AiProvider;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct FixedReply {
        reply: &'static str,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl CompletionProvider for FixedReply {
        fn kind(&self) -> AiProvider {
            AiProvider::Openai
        }

        fn model(&self) -> &str {
            "deepseek-chat"
        }

        async fn generate(&self, prompt: &str, _model: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.to_string())
        }
    }

    fn client(reply: &'static str) -> (AiClient, Arc<Mutex<Vec<String>>>) {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let provider = FixedReply {
            reply,
            prompts: prompts.clone(),
        };
        (AiClient::new(Box::new(provider), RetryPolicy::none()), prompts)
    }

    #[tokio::test]
    async fn test_no_files() {
        let (client, prompts) = client("{}");
        let err = analyze_files(&client, Vec::new()).await.unwrap_err();
        assert!(matches!(err, AnalyzerError::NoFiles));
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fenced_reply_parsed() {
        let (client, prompts) = client(
            "```json\n{\"risks\":[\"中心化\"],\"highlights\":[],\"expertFocus\":{\"security\":\"审计完成\"},\"riskScore\":30,\"highlightScore\":60,\"overallScore\":55}\n```",
        );
        let files = vec![UploadedFile::new("whitepaper.md", "# Token\n总量 1 亿")];

        let parsed = analyze_files(&client, files).await.unwrap();
        assert!(!parsed.is_degraded());
        assert_eq!(parsed.result.risks, vec!["中心化"]);
        assert_eq!(parsed.result.overall_score, 55);

        let prompts = prompts.lock().unwrap();
        assert!(prompts[0].contains("File: whitepaper.md"));
        assert!(prompts[0].contains("总量 1 亿"));
    }

    #[tokio::test]
    async fn test_prose_reply_degrades() {
        let (client, _) = client("抱歉，我无法分析这些文件。");
        let files = vec![UploadedFile::new("a.txt", "text")];

        let parsed = analyze_files(&client, files).await.unwrap();
        assert!(parsed.is_degraded());
        assert_eq!(parsed.result.risks, vec!["无法解析分析结果"]);
        assert_eq!(parsed.result.overall_score, 50);
    }

    #[tokio::test]
    async fn test_binary_file_skipped() {
        let (client, prompts) = client("{}");
        let files = vec![
            UploadedFile::new("contract.sol", "pragma solidity ^0.8.0;"),
            UploadedFile::new("scan.pdf", vec![0xffu8, 0xfe, 0x00, 0x81]),
        ];

        analyze_files(&client, files).await.unwrap();
        let prompts = prompts.lock().unwrap();
        assert!(prompts[0].contains("File: contract.sol"));
        assert!(!prompts[0].contains("scan.pdf"));
    }

    #[tokio::test]
    async fn test_all_files_undecodable_still_calls_provider() {
        let (client, prompts) = client("{}");
        let files = vec![
            UploadedFile::new("scan.pdf", vec![0xffu8, 0xfe, 0x00, 0x81]),
            UploadedFile::new("logo.png", vec![0x89u8, 0x50, 0xc3, 0x28]),
        ];

        let parsed = analyze_files(&client, files).await.unwrap();
        assert!(!parsed.is_degraded());

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(!prompts[0].contains("File: "));
    }
}
