// 8.0: instrument cache keyed by instrument id.
// relies on identity semantics: adding an instrument whose id is already present replaces
// the stored definition. not synchronized; wrap it if shared across threads.
// 8.1 bulk load from / dump to mappings.

use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::ConversionConfig;
use crate::error::InstrumentResult;
use crate::identifiers::InstrumentId;
use crate::instrument::{Instrument, InstrumentAny};
use crate::mapping::InstrumentMap;

#[derive(Debug, Clone, Default)]
pub struct InstrumentCache {
    instruments: HashMap<InstrumentId, InstrumentAny>,
}

impl InstrumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. Returns the previous definition for the same id.
    pub fn add(&mut self, instrument: impl Into<InstrumentAny>) -> Option<InstrumentAny> {
        let instrument = instrument.into();
        let previous = self.instruments.insert(instrument.id().clone(), instrument);
        if let Some(prev) = &previous {
            debug!(instrument_id = %prev.id(), "Instrument definition replaced");
        }
        previous
    }

    pub fn get(&self, id: &InstrumentId) -> Option<&InstrumentAny> {
        self.instruments.get(id)
    }

    pub fn contains(&self, id: &InstrumentId) -> bool {
        self.instruments.contains_key(id)
    }

    pub fn remove(&mut self, id: &InstrumentId) -> Option<InstrumentAny> {
        self.instruments.remove(id)
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Ids in sorted order.
    pub fn ids(&self) -> Vec<&InstrumentId> {
        let mut ids: Vec<_> = self.instruments.keys().collect();
        ids.sort();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &InstrumentAny> {
        self.instruments.values()
    }

    // 8.1: mappings sorted by id, for deterministic persistence.
    pub fn to_mappings(&self) -> Vec<InstrumentMap> {
        self.ids()
            .into_iter()
            .filter_map(|id| self.instruments.get(id))
            .map(Instrument::to_mapping)
            .collect()
    }

    /// Decodes every mapping first and only then inserts, so a bad entry leaves the cache untouched.
    pub fn load_mappings<'a>(
        &mut self,
        maps: impl IntoIterator<Item = &'a InstrumentMap>,
        config: &ConversionConfig,
    ) -> InstrumentResult<usize> {
        let decoded = maps
            .into_iter()
            .map(|map| InstrumentAny::from_mapping_with_config(map, config))
            .collect::<InstrumentResult<Vec<_>>>()?;

        let count = decoded.len();
        for instrument in decoded {
            self.add(instrument);
        }

        info!(loaded = count, total = self.len(), "Instruments loaded from mappings");
        Ok(count)
    }
}
