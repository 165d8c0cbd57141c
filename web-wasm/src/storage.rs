//! ブラウザのlocalStorageをログイン状態の保存先にする

use defi_analyzer_common::KeyValueStore;
use gloo::storage::{LocalStorage, Storage};
use wasm_bindgen::JsValue;

/// localStorage（値は文字列のまま保存する）
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(e) = LocalStorage::raw().set_item(key, value) {
            web_sys::console::warn_2(&JsValue::from_str("localStorageへの保存に失敗"), &e);
        }
    }

    fn remove(&mut self, key: &str) {
        if let Err(e) = LocalStorage::raw().remove_item(key) {
            web_sys::console::warn_2(&JsValue::from_str("localStorageからの削除に失敗"), &e);
        }
    }
}
