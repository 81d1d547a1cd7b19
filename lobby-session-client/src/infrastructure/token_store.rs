use crate::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// Fixed key (file name) the session token is stored under
pub const TOKEN_KEY: &str = "gameToken";

/// Persistent session-token storage shared by every manager using it.
///
/// Writes are broadcast to all subscribers, so a manager can follow token
/// changes made through a sibling manager.
pub trait TokenStore: Send + Sync {
    /// Current token, `None` when absent or blank
    fn load(&self) -> Option<String>;

    fn store(&self, token: &str) -> Result<()>;

    fn clear(&self) -> Result<()>;

    /// Receive every token change made through this store
    fn subscribe(&self) -> watch::Receiver<Option<String>>;

    /// Pick up changes made outside this process, if the backend can see them
    fn refresh(&self) -> Result<()> {
        Ok(())
    }
}

fn normalize(token: &str) -> Option<String> {
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// In-memory store; clones share the same token
#[derive(Debug, Clone)]
pub struct MemoryTokenStore {
    tx: Arc<watch::Sender<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.tx.send_replace(normalize(token));
        store
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    fn store(&self, token: &str) -> Result<()> {
        self.tx.send_replace(normalize(token));
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.tx.send_replace(None);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }
}

/// Token persisted as `<dir>/gameToken`
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    tx: Arc<watch::Sender<Option<String>>>,
}

impl FileTokenStore {
    /// Open the store in `dir`, reading any token already saved there
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(TOKEN_KEY);
        let token = read_token(&path)?;
        debug!("Opened token store at {}", path.display());

        let (tx, _) = watch::channel(token);
        Ok(Self {
            path,
            tx: Arc::new(tx),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_token(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(normalize(&contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    fn store(&self, token: &str) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let token = normalize(token);
        fs::write(&self.path, token.as_deref().unwrap_or_default())?;
        info!("Stored session token in {}", self.path.display());
        self.tx.send_replace(token);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => info!("Removed session token {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.tx.send_replace(None);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }

    fn refresh(&self) -> Result<()> {
        let on_disk = read_token(&self.path)?;
        self.tx.send_if_modified(|current| {
            if *current != on_disk {
                debug!("Session token changed on disk");
                *current = on_disk;
                true
            } else {
                false
            }
        });
        Ok(())
    }
}
