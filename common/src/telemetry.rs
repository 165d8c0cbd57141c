//! 利用イベントの記録
//!
//! `Telemetry` は起動時に1つ作り、必要な箇所へ渡す。
//! 出力先は `EventSink` で差し替える（サーバーはtracing、Webはコンソール）。

use serde_json::{json, Value};

/// 記録するイベント
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    PageView { page: String },
    LoginSuccess,
    LoginFailed,
    Logout,
    FilesSelected { file_count: usize, total_files: usize },
    AnalysisStarted { file_count: usize },
    AnalysisCompleted {
        file_count: usize,
        overall_score: i64,
        risk_score: i64,
        degraded: bool,
    },
    AnalysisFailed { error: String },
    NewAnalysisStarted,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::PageView { .. } => "Page View",
            Event::LoginSuccess => "Login Success",
            Event::LoginFailed => "Login Failed",
            Event::Logout => "Logout",
            Event::FilesSelected { .. } => "Files Selected",
            Event::AnalysisStarted { .. } => "Analysis Started",
            Event::AnalysisCompleted { .. } => "Analysis Completed",
            Event::AnalysisFailed { .. } => "Analysis Failed",
            Event::NewAnalysisStarted => "New Analysis Started",
        }
    }

    pub fn properties(&self) -> Value {
        match self {
            Event::PageView { page } => json!({ "page": page }),
            Event::LoginFailed => json!({ "reason": "incorrect_password" }),
            Event::FilesSelected {
                file_count,
                total_files,
            } => json!({ "file_count": file_count, "total_files": total_files }),
            Event::AnalysisStarted { file_count } => json!({ "file_count": file_count }),
            Event::AnalysisCompleted {
                file_count,
                overall_score,
                risk_score,
                degraded,
            } => json!({
                "file_count": file_count,
                "overall_score": overall_score,
                "risk_score": risk_score,
                "degraded": degraded,
            }),
            Event::AnalysisFailed { error } => json!({ "error": error }),
            Event::LoginSuccess | Event::Logout | Event::NewAnalysisStarted => json!({}),
        }
    }
}

/// イベントの出力先
pub trait EventSink {
    fn record(&self, name: &str, properties: &Value);
}

#[derive(Debug, Clone, Copy)]
pub struct Telemetry<S> {
    sink: S,
    enabled: bool,
}

impl<S: EventSink> Telemetry<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            enabled: true,
        }
    }

    /// イベントを捨てるインスタンス
    pub fn disabled(sink: S) -> Self {
        Self {
            sink,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn track(&self, event: &Event) {
        if self.enabled {
            self.sink.record(event.name(), &event.properties());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSink {
        events: RefCell<Vec<(String, Value)>>,
    }

    impl EventSink for &RecordingSink {
        fn record(&self, name: &str, properties: &Value) {
            self.events
                .borrow_mut()
                .push((name.to_string(), properties.clone()));
        }
    }

    #[test]
    fn test_track_records_name_and_properties() {
        let sink = RecordingSink::default();
        let telemetry = Telemetry::new(&sink);

        telemetry.track(&Event::AnalysisCompleted {
            file_count: 2,
            overall_score: 70,
            risk_score: 30,
            degraded: false,
        });
        telemetry.track(&Event::LoginFailed);

        let events = sink.events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].0, "Analysis Completed");
        assert_eq!(events[0].1["overall_score"], 70);
        assert_eq!(events[1].0, "Login Failed");
        assert_eq!(events[1].1["reason"], "incorrect_password");
    }

    #[test]
    fn test_disabled_drops_events() {
        let sink = RecordingSink::default();
        let telemetry = Telemetry::disabled(&sink);
        telemetry.track(&Event::Logout);
        assert!(!telemetry.is_enabled());
        assert!(sink.events.borrow().is_empty());
    }

    #[test]
    fn test_event_names() {
        assert_eq!(Event::FilesSelected { file_count: 1, total_files: 3 }.name(), "Files Selected");
        assert_eq!(Event::NewAnalysisStarted.name(), "New Analysis Started");
        assert_eq!(Event::PageView { page: "home".into() }.properties()["page"], "home");
    }
}
