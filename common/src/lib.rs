//! DeFi Analyzer Common Library
//!
//! サーバー・CLIとWeb(WASM)で共有される型とユーティリティ

pub mod types;
pub mod error;
pub mod reader;
pub mod prompts;
pub mod parser;
pub mod scoring;
pub mod chart;
pub mod auth;
pub mod store;
pub mod telemetry;

pub use types::{
    AnalysisResponse, AnalysisResult, AnalysisStatus, DecodedFile, ErrorResponse, ExpertArea,
    ExpertFocus, UploadedFile,
};
pub use error::{Error, Result};
pub use reader::{accept_attribute, decode_files, decode_files_with_skipped, has_accepted_extension};
pub use prompts::{build_analysis_prompt, build_prompt_for_files, combine_files};
pub use parser::{parse_analysis, strip_code_fence, ParseStatus, ParsedAnalysis};
pub use scoring::{extract_score, ChartPoint};
pub use auth::{AccessGate, KeyValueStore, LoginError, MemoryStore, SessionFlag};
pub use store::{AnalysisStore, StoreError};
pub use telemetry::{Event, EventSink, Telemetry};
