#![forbid(unsafe_code)]

//! The persistence boundary.
//!
//! A [`PlotStore`] owns ids and durable state for objects, planting spaces
//! and plantings. The canvas never talks to it directly; a
//! [`PlotSession`](crate::session::PlotSession) applies commits through it.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use sprout_layout::{CellRect, LayoutSchema};

use crate::error::StoreError;
use crate::model::{
    NewObject, NewPlanting, ObjectId, ObjectPatch, ObjectRecord, Planting, PlantingId,
    PlantingSpace, PlotId, SeasonId, SpaceId,
};

/// Async record store for one or more plots.
#[async_trait]
pub trait PlotStore: Send + Sync {
    /// Objects on `plot` for `season`, in store order.
    async fn list_objects(
        &self,
        plot: PlotId,
        season: SeasonId,
    ) -> Result<Vec<ObjectRecord>, StoreError>;

    /// Persist a new object and return it with its assigned id.
    async fn create_object(&self, object: NewObject) -> Result<ObjectRecord, StoreError>;

    async fn update_object(&self, id: ObjectId, patch: ObjectPatch) -> Result<(), StoreError>;

    async fn delete_object(&self, id: ObjectId) -> Result<(), StoreError>;

    /// The planting space of an object, if it has one.
    async fn get_space(&self, object: ObjectId) -> Result<Option<PlantingSpace>, StoreError>;

    async fn create_space(
        &self,
        object: ObjectId,
        schema: LayoutSchema,
    ) -> Result<PlantingSpace, StoreError>;

    async fn update_space(&self, id: SpaceId, schema: LayoutSchema) -> Result<(), StoreError>;

    async fn delete_space(&self, id: SpaceId) -> Result<(), StoreError>;

    /// Plantings in an object. `None` lists every season.
    async fn list_plantings(
        &self,
        object: ObjectId,
        season: Option<SeasonId>,
    ) -> Result<Vec<Planting>, StoreError>;

    async fn create_planting(&self, planting: NewPlanting) -> Result<Planting, StoreError>;

    async fn update_planting(&self, id: PlantingId, rect: CellRect) -> Result<(), StoreError>;

    async fn delete_planting(&self, id: PlantingId) -> Result<(), StoreError>;
}
