//! 画面の状態（選択ファイルと直近の解析結果）
//!
//! ファイルの型はWeb側では `web_sys::File`、CLIでは `UploadedFile`。
//! 同時に実行できる解析は1件のみ。

use crate::types::AnalysisResult;
use thiserror::Error;

/// 解析を開始できない理由
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Please select at least one file")]
    NoFiles,

    #[error("Analysis already in progress")]
    Busy,
}

#[derive(Debug, Clone)]
pub struct AnalysisStore<F> {
    files: Vec<F>,
    analysis: Option<AnalysisResult>,
    degraded: bool,
    is_analyzing: bool,
    error: Option<String>,
}

impl<F> Default for AnalysisStore<F> {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            analysis: None,
            degraded: false,
            is_analyzing: false,
            error: None,
        }
    }
}

impl<F> AnalysisStore<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[F] {
        &self.files
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    /// 直近の結果がプレースホルダか
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn is_analyzing(&self) -> bool {
        self.is_analyzing
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn selection_changed(&mut self) {
        self.analysis = None;
        self.degraded = false;
        self.error = None;
    }

    /// 選択済みの末尾に追加
    pub fn add_files(&mut self, files: impl IntoIterator<Item = F>) {
        self.files.extend(files);
        self.selection_changed();
    }

    /// 指定位置のファイルを外す。範囲外なら何もしない
    pub fn remove_file(&mut self, index: usize) -> Option<F> {
        if index >= self.files.len() {
            return None;
        }
        let removed = self.files.remove(index);
        self.selection_changed();
        Some(removed)
    }

    /// 解析開始。ファイルが無いか実行中なら拒否
    pub fn begin_analysis(&mut self) -> Result<(), StoreError> {
        if self.is_analyzing {
            return Err(StoreError::Busy);
        }
        if self.files.is_empty() {
            let err = StoreError::NoFiles;
            self.error = Some(err.to_string());
            return Err(err);
        }
        self.is_analyzing = true;
        self.error = None;
        Ok(())
    }

    /// 解析成功。前回の結果は丸ごと置き換える
    pub fn complete(&mut self, analysis: AnalysisResult, degraded: bool) {
        self.analysis = Some(analysis);
        self.degraded = degraded;
        self.is_analyzing = false;
        self.error = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.is_analyzing = false;
        self.error = Some(message.into());
    }

    /// 「New Analysis」: 選択と結果を破棄
    pub fn start_new(&mut self) {
        self.files.clear();
        self.selection_changed();
    }

    /// ログアウト時
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
