//! プロンプト生成モジュール
//!
//! アップロード文書を連結し、固定の解析テンプレートに埋め込む。
//! 文書本文はエスケープせずそのまま埋め込む。

use crate::types::DecodedFile;

/// 1ファイル分のセクション
pub fn format_file_section(name: &str, text: &str) -> String {
    format!("File: {}\n\n{}\n\n---\n\n", name, text)
}

/// 全ファイルを選択順に連結
pub fn combine_files(files: &[DecodedFile]) -> String {
    files
        .iter()
        .map(|f| format_file_section(&f.name, &f.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 解析用プロンプト生成
///
/// # Arguments
/// * `combined_content` - `combine_files` で連結した文書
///
/// # Returns
/// 出力JSONスキーマと回答言語（中国語）を指定したプロンプト
pub fn build_analysis_prompt(combined_content: &str) -> String {
    format!(
        r#"你是一位资深的DeFi专家和分析师。请分析以下DeFi项目的文档和代码，提供详细的分析报告。

项目内容：
{combined_content}

请按照以下格式提供分析结果（必须是有效的JSON格式）：

{{
  "risks": ["风险点1", "风险点2", "风险点3"],
  "highlights": ["亮点1", "亮点2", "亮点3"],
  "expertFocus": {{
    "tokenomics": "代币经济学分析（评分和建议）",
    "security": "安全性分析（评分和建议）",
    "innovation": "创新性分析（评分和建议）",
    "team": "团队分析（评分和建议）",
    "marketFit": "市场契合度分析（评分和建议）"
  }},
  "riskScore": 数字（0-100，越高风险越大）,
  "highlightScore": 数字（0-100，越高亮点越多）,
  "overallScore": 数字（0-100，综合评分）
}}

请重点关注：
1. 智能合约安全漏洞和风险
2. 代币经济模型是否可持续
3. 团队背景和技术实力
4. 项目创新性和差异化
5. 市场定位和竞争力
6. 监管合规风险
7. 流动性风险
8. 代码质量和审计情况

请用中文回复，确保返回的是有效的JSON格式。"#
    )
}

/// 文書リストから直接プロンプトを作る
pub fn build_prompt_for_files(files: &[DecodedFile]) -> String {
    build_analysis_prompt(&combine_files(files))
}
