//! 利用イベントをブラウザコンソールへ出す

use defi_analyzer_common::{EventSink, Telemetry};
use serde_json::Value;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn record(&self, name: &str, properties: &Value) {
        web_sys::console::log_3(
            &JsValue::from_str("[track]"),
            &JsValue::from_str(name),
            &JsValue::from_str(&properties.to_string()),
        );
    }
}

pub type AppTelemetry = Telemetry<ConsoleSink>;

pub fn telemetry() -> AppTelemetry {
    Telemetry::new(ConsoleSink)
}
