//! アクセスゲート
//!
//! 共有パスワード1つとの完全一致で判定し、ログイン状態を
//! キー・バリューストア（ブラウザではlocalStorage）に記録する。
//! パスワードは配信されるコードに含まれるため、セキュリティ境界ではない。

use std::collections::HashMap;
use thiserror::Error;

/// 既定のアクセスパスワード
pub const DEFAULT_ACCESS_PASSWORD: &str = "honamdefi0";

/// ログイン済みフラグのキー
pub const LOGGED_IN_KEY: &str = "honam_defi_logged_in";

/// ログイン時刻（UNIXミリ秒）のキー
pub const LOGIN_TIME_KEY: &str = "honam_defi_login_time";

/// パスワード不一致時に表示する文言
pub const LOGIN_ERROR_MESSAGE: &str = "密码错误，请重试";

/// ログイン状態の保存先
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// メモリ上のストア（CLI・テスト用）
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// パスワード不一致
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("密码错误，请重试")]
pub struct LoginError;

/// ログイン状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionFlag {
    pub logged_in: bool,
    pub login_timestamp: Option<i64>,
}

impl SessionFlag {
    /// ストアから読み込む。有効期限は無い
    pub fn load(store: &impl KeyValueStore) -> Self {
        let logged_in = store.get(LOGGED_IN_KEY).as_deref() == Some("true");
        let login_timestamp = store
            .get(LOGIN_TIME_KEY)
            .and_then(|t| t.trim().parse::<i64>().ok());
        Self {
            logged_in,
            login_timestamp,
        }
    }

    fn save(&self, store: &mut impl KeyValueStore) {
        store.set(LOGGED_IN_KEY, if self.logged_in { "true" } else { "false" });
        if let Some(ts) = self.login_timestamp {
            store.set(LOGIN_TIME_KEY, &ts.to_string());
        }
    }
}

/// 共有パスワードによるゲート
#[derive(Debug, Clone)]
pub struct AccessGate {
    secret: String,
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new(DEFAULT_ACCESS_PASSWORD)
    }
}

impl AccessGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// 完全一致のみ許可
    pub fn verify(&self, input: &str) -> bool {
        input == self.secret
    }

    /// 一致すればログイン状態を保存する。不一致なら何も書かない
    pub fn login(
        &self,
        store: &mut impl KeyValueStore,
        input: &str,
        now_ms: i64,
    ) -> Result<SessionFlag, LoginError> {
        if !self.verify(input) {
            return Err(LoginError);
        }
        let flag = SessionFlag {
            logged_in: true,
            login_timestamp: Some(now_ms),
        };
        flag.save(store);
        Ok(flag)
    }
}

/// ログイン状態を消去
pub fn logout(store: &mut impl KeyValueStore) {
    store.remove(LOGGED_IN_KEY);
    store.remove(LOGIN_TIME_KEY);
}
