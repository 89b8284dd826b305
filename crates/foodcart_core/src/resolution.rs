//! Coordinate resolution for orders and restaurants.
//!
//! A [`CoordinateResolver`] lives for one processing pass. It remembers every
//! address it has seen in that pass (resolved or not) so repeated addresses
//! never reach the geocoder twice, and it hands back the writes a successful
//! lookup implies instead of performing them, so a whole collection is
//! persisted with one bulk call per table.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;

use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::geo::Coordinates;
use crate::geocoder::Geocoder;
use crate::models::{normalize_address, Location, LocationId, Order, OrderId, Restaurant, RestaurantId};
use crate::store::{find_or_create_location, AttachLocations, LocationStore};

/// Something with a free-text address and an optional link to a [`Location`].
pub trait Addressed {
    type Id: Copy + Eq + Hash + fmt::Debug;

    fn id(&self) -> Self::Id;
    fn address(&self) -> &str;
    fn location_id(&self) -> Option<LocationId>;
}

impl Addressed for Order {
    type Id = OrderId;

    fn id(&self) -> OrderId {
        self.id
    }

    fn address(&self) -> &str {
        &self.address
    }

    fn location_id(&self) -> Option<LocationId> {
        self.location
    }
}

impl Addressed for Restaurant {
    type Id = RestaurantId;

    fn id(&self) -> RestaurantId {
        self.id
    }

    fn address(&self) -> &str {
        &self.address
    }

    fn location_id(&self) -> Option<LocationId> {
        self.location
    }
}

/// Per-pass memo of geocoding outcomes keyed by normalized address.
///
/// A resolved address also remembers the location row holding it, so later
/// entities with that address are linked to the same row even before the
/// row's coordinates are flushed. `Some(None)` from [`ResolutionCache::get`]
/// is a remembered failure.
#[derive(Debug, Default, Clone)]
pub struct ResolutionCache {
    entries: HashMap<String, Option<(Coordinates, Option<LocationId>)>>,
}

impl ResolutionCache {
    pub fn get(&self, address: &str) -> Option<Option<Coordinates>> {
        self.entries
            .get(&normalize_address(address))
            .map(|entry| entry.map(|(coordinates, _)| coordinates))
    }

    /// Location row recorded for a resolved address.
    pub fn location(&self, address: &str) -> Option<LocationId> {
        self.entries
            .get(&normalize_address(address))
            .copied()
            .flatten()
            .and_then(|(_, location)| location)
    }

    pub fn record_resolved(
        &mut self,
        address: &str,
        coordinates: Coordinates,
        location: Option<LocationId>,
    ) {
        self.entries
            .insert(normalize_address(address), Some((coordinates, location)));
    }

    pub fn record_unresolved(&mut self, address: &str) {
        self.entries.insert(normalize_address(address), None);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of resolving one entity, plus the writes it calls for.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<Id> {
    pub coordinates: Option<Coordinates>,
    /// New location reference for the entity.
    pub entity_update: Option<(Id, LocationId)>,
    /// Location row whose coordinates were filled in.
    pub location_update: Option<Location>,
}

impl<Id> Resolution<Id> {
    fn unstaged(coordinates: Option<Coordinates>) -> Self {
        Self {
            coordinates,
            entity_update: None,
            location_update: None,
        }
    }
}

/// Coordinates for a whole collection after its writes were flushed.
#[derive(Debug, Clone)]
pub struct BatchResolution<Id> {
    pub coordinates: HashMap<Id, Coordinates>,
    pub unresolved: Vec<Id>,
    pub attached: usize,
    pub locations_updated: usize,
}

impl<Id: Eq + Hash> BatchResolution<Id> {
    pub fn get(&self, id: &Id) -> Option<Coordinates> {
        self.coordinates.get(id).copied()
    }
}

pub struct CoordinateResolver<'g> {
    geocoder: &'g dyn Geocoder,
    cache: ResolutionCache,
    geocoder_calls: usize,
}

impl<'g> CoordinateResolver<'g> {
    pub fn new(geocoder: &'g dyn Geocoder) -> Self {
        Self {
            geocoder,
            cache: ResolutionCache::default(),
            geocoder_calls: 0,
        }
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Outbound geocoder calls made so far in this pass.
    pub fn geocoder_calls(&self) -> usize {
        self.geocoder_calls
    }

    /// Effective coordinates of `entity`.
    ///
    /// 1. A linked location with both coordinates wins; no lookup.
    /// 2. An address already seen this pass reuses the remembered outcome.
    /// 3. Otherwise the geocoder is asked once. A miss is remembered and
    ///    nothing is written; a hit finds or creates the location row and
    ///    stages the row and the entity's link for the caller to persist.
    pub fn resolve<S, E>(&mut self, store: &mut S, entity: &E) -> Result<Resolution<E::Id>, StoreError>
    where
        S: LocationStore + ?Sized,
        E: Addressed,
    {
        let address = normalize_address(entity.address());

        if let Some(location_id) = entity.location_id() {
            if let Some(linked) = store.location(location_id)? {
                if let Some(coordinates) = linked.coordinates() {
                    let shared = (linked.address == address).then_some(location_id);
                    self.cache.record_resolved(&address, coordinates, shared);
                    return Ok(Resolution::unstaged(Some(coordinates)));
                }
            }
        }

        if let Some(cached) = self.cache.get(&address) {
            debug!(address = %address, resolved = cached.is_some(), "resolution cache hit");
            return Ok(self.reuse_cached(entity, &address, cached));
        }

        self.geocoder_calls += 1;
        let Some(geocoded) = self.geocoder.resolve(&address) else {
            warn!(address = %address, entity = ?entity.id(), "address left unresolved");
            self.cache.record_unresolved(&address);
            return Ok(Resolution::unstaged(None));
        };

        let mut location = find_or_create_location(store, &address, Some(geocoded))?;
        let location_update = match location.coordinates() {
            Some(_) => None,
            None => {
                location.set_coordinates(geocoded);
                Some(location.clone())
            }
        };
        let coordinates = location.coordinates().unwrap_or(geocoded);
        self.cache.record_resolved(&address, coordinates, Some(location.id));

        Ok(Resolution {
            coordinates: Some(coordinates),
            entity_update: link_update(entity, location.id),
            location_update,
        })
    }

    /// A remembered hit still links the entity to the row recorded for its
    /// address, so it is not looked up again next pass. Nothing else is written.
    fn reuse_cached<E: Addressed>(
        &self,
        entity: &E,
        address: &str,
        cached: Option<Coordinates>,
    ) -> Resolution<E::Id> {
        let Some(coordinates) = cached else {
            return Resolution::unstaged(None);
        };
        Resolution {
            coordinates: Some(coordinates),
            entity_update: self
                .cache
                .location(address)
                .and_then(|location| link_update(entity, location)),
            location_update: None,
        }
    }

    /// Resolve every entity, then persist all staged writes with at most one
    /// bulk call per table.
    ///
    /// A store failure on one entity leaves that entity unresolved and the
    /// rest of the collection is still processed.
    pub fn resolve_collection<S, E>(&mut self, store: &mut S, entities: &[E]) -> BatchResolution<E::Id>
    where
        S: LocationStore + AttachLocations<E::Id> + ?Sized,
        E: Addressed,
    {
        let mut coordinates = HashMap::with_capacity(entities.len());
        let mut unresolved = Vec::new();
        let mut entity_updates = Vec::new();
        let mut location_updates: BTreeMap<LocationId, Location> = BTreeMap::new();

        for entity in entities {
            match self.resolve(store, entity) {
                Ok(resolution) => {
                    match resolution.coordinates {
                        Some(point) => {
                            coordinates.insert(entity.id(), point);
                        }
                        None => unresolved.push(entity.id()),
                    }
                    entity_updates.extend(resolution.entity_update);
                    if let Some(location) = resolution.location_update {
                        location_updates.insert(location.id, location);
                    }
                }
                Err(err) => {
                    warn!(entity = ?entity.id(), error = %err, "store failure while resolving; entity left unresolved");
                    unresolved.push(entity.id());
                }
            }
        }

        let attached = if entity_updates.is_empty() {
            0
        } else {
            store
                .bulk_attach_locations(&entity_updates)
                .unwrap_or_else(|err| {
                    warn!(error = %err, "failed to persist location links");
                    0
                })
        };

        let locations_updated = if location_updates.is_empty() {
            0
        } else {
            let rows: Vec<Location> = location_updates.into_values().collect();
            store.bulk_update_locations(&rows).unwrap_or_else(|err| {
                warn!(error = %err, "failed to persist location coordinates");
                0
            })
        };

        info!(
            entities = entities.len(),
            resolved = coordinates.len(),
            unresolved = unresolved.len(),
            attached,
            locations_updated,
            "resolved coordinates"
        );

        BatchResolution {
            coordinates,
            unresolved,
            attached,
            locations_updated,
        }
    }
}

fn link_update<E: Addressed>(entity: &E, location: LocationId) -> Option<(E::Id, LocationId)> {
    if entity.location_id() == Some(location) {
        None
    } else {
        Some((entity.id(), location))
    }
}
