// src/storage/collection.rs

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::kv::KeyValueStore;
use crate::common::error::AppError;

/// Uma entidade persistida em uma das coleções nomeadas do armazém.
pub trait StoredEntity: Serialize + DeserializeOwned + Clone {
    /// Chave da coleção no armazém (ex: "crm_leads").
    const KEY: &'static str;

    fn id(&self) -> Uuid;

    /// O erro 404 específico da entidade.
    fn not_found() -> AppError;
}

/// CRUD uniforme sobre uma coleção serializada como um array JSON inteiro.
///
/// Toda escrita é uma sobrescrita do array completo (read-modify-write);
/// dois processos sobre o mesmo diretório competem em last-write-wins.
pub struct Collection<T> {
    store: Arc<dyn KeyValueStore>,
    _entity: PhantomData<T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: StoredEntity> Collection<T> {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Lê a coleção inteira. Chave ausente nunca é erro: vira um array
    /// vazio, semeado no armazém na primeira leitura.
    pub fn get_all(&self) -> Result<Vec<T>, AppError> {
        match self.store.get(T::KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => {
                self.save_all(&[])?;
                Ok(Vec::new())
            }
        }
    }

    /// Sobrescreve a coleção inteira. É a única primitiva de escrita.
    pub fn save_all(&self, items: &[T]) -> Result<(), AppError> {
        let raw = serde_json::to_string(items)?;
        self.store.set(T::KEY, &raw)
    }

    /// Semeia valores padrão quando a chave nunca existiu. Uma coleção já
    /// esvaziada pelo usuário (array vazio gravado) não é re-semeada.
    pub fn seed_if_absent(&self, defaults: &[T]) -> Result<bool, AppError> {
        if self.store.get(T::KEY)?.is_some() {
            return Ok(false);
        }
        self.save_all(defaults)?;
        Ok(true)
    }

    pub fn find_by_id(&self, id: Uuid) -> Result<Option<T>, AppError> {
        Ok(self.get_all()?.into_iter().find(|item| item.id() == id))
    }

    /// Como `find_by_id`, mas ausência vira o `NotFound` da entidade.
    pub fn get_by_id(&self, id: Uuid) -> Result<T, AppError> {
        self.find_by_id(id)?.ok_or_else(T::not_found)
    }

    /// Acrescenta ao fim da coleção e persiste.
    pub fn create(&self, entity: T) -> Result<T, AppError> {
        let mut items = self.get_all()?;
        items.push(entity.clone());
        self.save_all(&items)?;
        Ok(entity)
    }

    /// Localiza por id e aplica a mutação; ausência é `NotFound`.
    pub fn update_with(&self, id: Uuid, apply: impl FnOnce(&mut T)) -> Result<T, AppError> {
        let mut items = self.get_all()?;
        let item = items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(T::not_found)?;
        apply(item);
        let updated = item.clone();
        self.save_all(&items)?;
        Ok(updated)
    }

    /// Remoção idempotente: id inexistente não é erro e não gera escrita.
    pub fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut items = self.get_all()?;
        let before = items.len();
        items.retain(|item| item.id() != id);
        if items.len() == before {
            return Ok(());
        }
        self.save_all(&items)
    }
}
