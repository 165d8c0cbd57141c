//! 解析APIの呼び出し
//!
//! 選択ファイルを `files` フィールドに詰めて `/api/analyze` へPOSTする。

use defi_analyzer_common::{AnalysisResponse, ErrorResponse};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Request, RequestInit, Response};

const ANALYZE_ENDPOINT: &str = "/api/analyze";
const FILES_FIELD: &str = "files";
const FALLBACK_ERROR: &str = "Analysis failed";

fn js_error(value: JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| "Unknown error".to_string())
}

fn build_form(files: &[File]) -> Result<FormData, JsValue> {
    let form = FormData::new()?;
    for file in files {
        form.append_with_blob_and_filename(FILES_FIELD, file, &file.name())?;
    }
    Ok(form)
}

/// 失敗レスポンスから表示用メッセージを取り出す
fn error_message(body: JsValue) -> String {
    serde_wasm_bindgen::from_value::<ErrorResponse>(body)
        .ok()
        .map(|e| e.error)
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| FALLBACK_ERROR.to_string())
}

pub async fn analyze_files(files: &[File]) -> Result<AnalysisResponse, String> {
    let form = build_form(files).map_err(js_error)?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_body(&form);

    let request = Request::new_with_str_and_init(ANALYZE_ENDPOINT, &opts).map_err(js_error)?;
    let window = web_sys::window().ok_or_else(|| "windowが取得できません".to_string())?;

    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?;
    let resp: Response = resp_value.dyn_into().map_err(js_error)?;

    let json = match resp.json() {
        Ok(promise) => JsFuture::from(promise).await,
        Err(e) => Err(e),
    };

    if !resp.ok() {
        return Err(json.map(error_message).unwrap_or_else(|_| FALLBACK_ERROR.to_string()));
    }

    let json = json.map_err(js_error)?;
    serde_wasm_bindgen::from_value(json).map_err(|e| e.to_string())
}
