//! One-time free trial and the password unlock, persisted as two flags.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// 存储键：是否已用掉免费下载。
pub const HAS_USED_TRIAL_KEY: &str = "hasUsedTrial";
/// 存储键：是否已解锁。
pub const IS_UNLOCKED_KEY: &str = "isUnlocked";
/// 内置解锁口令。仅用于功能门控，不是安全边界。
pub const UNLOCK_PASSWORD: &str = "meenarvind";

const TRUE: &str = "true";

/// 字符串键值存储。
pub trait KeyValueStore {
    /// 读取键值；不存在时返回 `None`。
    ///
    /// # Errors
    /// 底层存储读取失败时返回错误。
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// 写入键值。
    ///
    /// # Errors
    /// 底层存储写入失败时返回错误。
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// 进程内存储。
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// 单个 JSON 文件存储（字符串到字符串的对象）。
///
/// 文件不存在视为空；写入时先写临时文件再重命名。
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, serde_json::to_vec_pretty(values)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }
}

/// 试用状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrialState {
    pub has_used_trial: bool,
    pub is_unlocked: bool,
}

impl TrialState {
    /// 用过试用且未解锁即为锁定。
    #[must_use]
    pub const fn locked(self) -> bool {
        self.has_used_trial && !self.is_unlocked
    }
}

/// 解锁成功的凭证。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct Unlocked;

/// 试用门控。
#[derive(Debug)]
pub struct TrialGate<S> {
    store: S,
    state: TrialState,
    credential: String,
}

impl<S: KeyValueStore> TrialGate<S> {
    /// 从存储读取状态。只有值恰为 `"true"` 时才视为真。
    ///
    /// # Errors
    /// 存储读取失败时返回错误。
    pub fn load(store: S) -> Result<Self> {
        let state = TrialState {
            has_used_trial: read_flag(&store, HAS_USED_TRIAL_KEY)?,
            is_unlocked: read_flag(&store, IS_UNLOCKED_KEY)?,
        };
        tracing::debug!(
            has_used_trial = state.has_used_trial,
            is_unlocked = state.is_unlocked,
            "trial state loaded"
        );
        Ok(Self {
            store,
            state,
            credential: UNLOCK_PASSWORD.to_string(),
        })
    }

    /// 替换解锁口令。
    #[must_use]
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = credential.into();
        self
    }

    #[must_use]
    pub const fn state(&self) -> TrialState {
        self.state
    }

    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.state.locked()
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// 记录第一次成功下载。已解锁或已用过试用时不做任何事。
    ///
    /// # Errors
    /// 持久化失败时返回错误，状态保持不变。
    pub fn record_first_download(&mut self) -> Result<()> {
        if self.state.is_unlocked || self.state.has_used_trial {
            return Ok(());
        }
        self.store.set(HAS_USED_TRIAL_KEY, TRUE)?;
        self.state.has_used_trial = true;
        tracing::info!("free trial used");
        Ok(())
    }

    /// 尝试解锁；口令需完全一致。
    ///
    /// # Errors
    /// 口令错误时返回 [`Error::IncorrectPassword`] 且状态不变；
    /// 持久化失败时返回存储错误。
    pub fn attempt_unlock(&mut self, candidate: &str) -> Result<Unlocked> {
        if candidate != self.credential {
            tracing::info!("unlock rejected");
            return Err(Error::IncorrectPassword);
        }
        if !self.state.is_unlocked {
            self.store.set(IS_UNLOCKED_KEY, TRUE)?;
            self.state.is_unlocked = true;
            tracing::info!("suite unlocked");
        }
        Ok(Unlocked)
    }
}

fn read_flag<S: KeyValueStore>(store: &S, key: &str) -> Result<bool> {
    Ok(store.get(key)?.as_deref() == Some(TRUE))
}
