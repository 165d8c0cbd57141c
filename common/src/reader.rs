//! アップロード文書のデコード
//!
//! UTF-8として読めないファイル（PDF等のバイナリ）は黙って除外する。

use crate::types::{DecodedFile, UploadedFile};

/// ファイル選択ダイアログで受け付ける拡張子
///
/// クライアント側のヒントのみ。サーバーでは検査しない。
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "txt", "md", "sol", "js", "ts", "py"];

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// `<input accept=...>` 用の文字列
pub fn accept_attribute() -> String {
    ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(",")
}

/// ファイル名が受付拡張子か判定（大文字小文字は区別しない）
pub fn has_accepted_extension(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ACCEPTED_EXTENSIONS
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(ext)),
        _ => false,
    }
}

/// 1ファイルをテキストにデコード
pub fn decode_file(file: &UploadedFile) -> Option<DecodedFile> {
    let bytes = file.content.strip_prefix(UTF8_BOM).unwrap_or(&file.content);
    match std::str::from_utf8(bytes) {
        Ok(text) => Some(DecodedFile {
            name: file.name.clone(),
            text: text.to_string(),
        }),
        Err(_) => None,
    }
}

/// 選択順を保ったままデコード。失敗したファイルは結果に含めない
pub fn decode_files(files: &[UploadedFile]) -> Vec<DecodedFile> {
    files.iter().filter_map(decode_file).collect()
}

/// デコード結果と、除外したファイル名（ログ出力用）
pub fn decode_files_with_skipped(files: &[UploadedFile]) -> (Vec<DecodedFile>, Vec<String>) {
    let mut decoded = Vec::with_capacity(files.len());
    let mut skipped = Vec::new();
    for file in files {
        match decode_file(file) {
            Some(d) => decoded.push(d),
            None => skipped.push(file.name.clone()),
        }
    }
    (decoded, skipped)
}
