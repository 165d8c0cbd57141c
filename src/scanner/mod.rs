use crate::error::{AnalyzerError, Result};
use defi_analyzer_common::{has_accepted_extension, UploadedFile};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub path: PathBuf,
    pub file_name: String,
}

impl DocumentInfo {
    fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            file_name,
        }
    }

    /// 内容を読み込みアップロード形式にする
    pub fn load(&self) -> Result<UploadedFile> {
        let content = std::fs::read(&self.path)?;
        Ok(UploadedFile::new(self.file_name.clone(), content))
    }
}

/// 解析対象の文書を集める
///
/// ファイルを直接指定した場合は拡張子を問わず対象にする。
/// フォルダは受付拡張子のファイルだけを集め、`recursive` でサブフォルダも走査する。
pub fn scan_paths(paths: &[PathBuf], recursive: bool) -> Result<Vec<DocumentInfo>> {
    let mut documents = Vec::new();

    for path in paths {
        if !path.exists() {
            return Err(AnalyzerError::PathNotFound(path.display().to_string()));
        }

        if path.is_file() {
            documents.push(DocumentInfo::from_path(path));
        } else {
            documents.extend(scan_folder(path, recursive)?);
        }
    }

    Ok(documents)
}

pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<DocumentInfo>> {
    if !folder.exists() {
        return Err(AnalyzerError::PathNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut documents: Vec<DocumentInfo> = WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| has_accepted_extension(&e.file_name().to_string_lossy()))
        .map(|e| DocumentInfo::from_path(e.path()))
        .collect();

    // パスでソート
    documents.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(documents)
}

/// 文書を読み込む
pub fn load_documents(documents: &[DocumentInfo]) -> Result<Vec<UploadedFile>> {
    documents.iter().map(DocumentInfo::load).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scan_folder_not_found() {
        let result = scan_folder(Path::new("/nonexistent/folder"), false);
        assert!(matches!(result, Err(AnalyzerError::PathNotFound(_))));
    }

    #[test]
    fn test_scan_folder_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("whitepaper.md"), "# Whitepaper").unwrap();
        fs::write(dir.path().join("Vault.SOL"), "contract Vault {}").unwrap();
        fs::write(dir.path().join("logo.png"), [0u8; 4]).unwrap();

        let result = scan_folder(dir.path(), false).unwrap();
        let names: Vec<_> = result.iter().map(|d| d.file_name.as_str()).collect();
        assert_eq!(names, vec!["Vault.SOL", "whitepaper.md"]);
    }

    #[test]
    fn test_recursive_scan() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("contracts")).unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("contracts").join("Token.sol"), "t").unwrap();

        assert_eq!(scan_folder(dir.path(), false).unwrap().len(), 1);
        assert_eq!(scan_folder(dir.path(), true).unwrap().len(), 2);
    }

    #[test]
    fn test_explicit_file_always_included() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.rst");
        fs::write(&notes, "notes").unwrap();

        let result = scan_paths(&[notes], false).unwrap();
        assert_eq!(result.len(), 1);

        let loaded = load_documents(&result).unwrap();
        assert_eq!(loaded[0].name, "notes.rst");
        assert_eq!(loaded[0].content, b"notes");
    }
}
