// src/storage/kv.rs

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::common::error::AppError;

/// A fronteira de persistência: um armazém chave-valor com valores string
/// sob chaves com namespace (`crm_leads`, `crm_funnels`, ...).
///
/// Os serviços nunca tocam arquivos diretamente; recebem um `Arc<dyn
/// KeyValueStore>` injetado na construção, e os testes injetam o armazém
/// em memória.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove(&self, key: &str) -> Result<(), AppError>;
}

/// Implementação durável: um arquivo `<chave>.json` por coleção, todos
/// dentro de um diretório de dados.
#[derive(Debug)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: PathBuf) -> Result<Self, AppError> {
        fs::create_dir_all(&root).map_err(|e| AppError::StorageError(e.to_string()))?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::StorageError(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        fs::write(self.path_for(key), value).map_err(|e| AppError::StorageError(e.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::StorageError(e.to_string())),
        }
    }
}

/// Implementação em memória, para testes e execuções efêmeras.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let data = self.data.lock().map_err(|_| poisoned())?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut data = self.data.lock().map_err(|_| poisoned())?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        let mut data = self.data.lock().map_err(|_| poisoned())?;
        data.remove(key);
        Ok(())
    }
}

fn poisoned() -> AppError {
    AppError::InternalServerError(anyhow::anyhow!("mutex do armazém envenenado"))
}
