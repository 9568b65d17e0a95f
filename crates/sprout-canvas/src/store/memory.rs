#![forbid(unsafe_code)]

//! In-process [`PlotStore`] with write-failure injection.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use sprout_layout::{CellRect, LayoutSchema};

use super::PlotStore;
use crate::error::StoreError;
use crate::model::{
    NewObject, NewPlanting, ObjectId, ObjectPatch, ObjectRecord, Planting, PlantingId,
    PlantingSpace, PlotId, SeasonId, SpaceId,
};

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    objects: Vec<ObjectRecord>,
    spaces: Vec<PlantingSpace>,
    plantings: Vec<Planting>,
    fail_writes: bool,
    failures_pending: usize,
    writes: usize,
}

impl Inner {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_write(&mut self) -> Result<(), StoreError> {
        if self.failures_pending > 0 {
            self.failures_pending -= 1;
            return Err(StoreError::Backend("injected failure".into()));
        }
        if self.fail_writes {
            return Err(StoreError::Backend("injected failure".into()));
        }
        self.writes += 1;
        Ok(())
    }
}

/// Records kept in memory behind a mutex.
///
/// Reads always succeed. Writes can be made to fail, either from now on
/// ([`set_fail_writes`](Self::set_fail_writes)) or for the next few calls
/// ([`fail_next_writes`](Self::fail_next_writes)).
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail until turned off.
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Fail the next `count` writes, then recover.
    pub fn fail_next_writes(&self, count: usize) {
        self.lock().failures_pending = count;
    }

    /// Successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<ObjectRecord> {
        self.lock().objects.iter().find(|o| o.id == id).cloned()
    }

    #[must_use]
    pub fn object_count(&self) -> usize {
        self.lock().objects.len()
    }

    #[must_use]
    pub fn space(&self, object: ObjectId) -> Option<PlantingSpace> {
        self.lock().spaces.iter().find(|s| s.object == object).cloned()
    }

    #[must_use]
    pub fn plantings(&self, object: ObjectId) -> Vec<Planting> {
        self.lock()
            .plantings
            .iter()
            .filter(|p| p.object == object)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PlotStore for MemoryStore {
    async fn list_objects(
        &self,
        plot: PlotId,
        season: SeasonId,
    ) -> Result<Vec<ObjectRecord>, StoreError> {
        Ok(self
            .lock()
            .objects
            .iter()
            .filter(|o| o.plot == plot && o.season == season)
            .cloned()
            .collect())
    }

    async fn create_object(&self, object: NewObject) -> Result<ObjectRecord, StoreError> {
        let mut inner = self.lock();
        inner.check_write()?;
        let id = ObjectId(inner.allocate());
        let record = object.into_record(id);
        inner.objects.push(record.clone());
        Ok(record)
    }

    async fn update_object(&self, id: ObjectId, patch: ObjectPatch) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.check_write()?;
        let record = inner
            .objects
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::NotFound)?;
        record.apply(&patch);
        Ok(())
    }

    async fn delete_object(&self, id: ObjectId) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.check_write()?;
        let index = inner
            .objects
            .iter()
            .position(|o| o.id == id)
            .ok_or(StoreError::NotFound)?;
        inner.objects.remove(index);
        Ok(())
    }

    async fn get_space(&self, object: ObjectId) -> Result<Option<PlantingSpace>, StoreError> {
        Ok(self.space(object))
    }

    async fn create_space(
        &self,
        object: ObjectId,
        schema: LayoutSchema,
    ) -> Result<PlantingSpace, StoreError> {
        let mut inner = self.lock();
        inner.check_write()?;
        let space = PlantingSpace {
            id: SpaceId(inner.allocate()),
            object,
            schema,
        };
        inner.spaces.push(space.clone());
        Ok(space)
    }

    async fn update_space(&self, id: SpaceId, schema: LayoutSchema) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.check_write()?;
        let space = inner
            .spaces
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound)?;
        space.schema = schema;
        Ok(())
    }

    async fn delete_space(&self, id: SpaceId) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.check_write()?;
        let index = inner
            .spaces
            .iter()
            .position(|s| s.id == id)
            .ok_or(StoreError::NotFound)?;
        inner.spaces.remove(index);
        Ok(())
    }

    async fn list_plantings(
        &self,
        object: ObjectId,
        season: Option<SeasonId>,
    ) -> Result<Vec<Planting>, StoreError> {
        Ok(self
            .lock()
            .plantings
            .iter()
            .filter(|p| p.object == object && season.is_none_or(|s| p.season == s))
            .cloned()
            .collect())
    }

    async fn create_planting(&self, planting: NewPlanting) -> Result<Planting, StoreError> {
        let mut inner = self.lock();
        inner.check_write()?;
        let planting = planting.into_planting(PlantingId(inner.allocate()));
        inner.plantings.push(planting.clone());
        Ok(planting)
    }

    async fn update_planting(&self, id: PlantingId, rect: CellRect) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.check_write()?;
        let planting = inner
            .plantings
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound)?;
        planting.set_cell_rect(rect);
        Ok(())
    }

    async fn delete_planting(&self, id: PlantingId) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.check_write()?;
        let index = inner
            .plantings
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::NotFound)?;
        inner.plantings.remove(index);
        Ok(())
    }
}
