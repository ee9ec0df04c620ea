use tracing::debug;

use petbox_base::PetboxResult;

use crate::pet::Pet;
use crate::store::{JsonFileStore, Keyed};

/// Identifier-assignment policy: one past the highest existing id, starting
/// at 1 for an empty collection. Ids are never reused, even if earlier records
/// disappear from the sequence.
pub(crate) fn next_id<T: Keyed>(items: &[T]) -> u64 {
    items.iter().map(Keyed::id).max().map_or(1, |max| max + 1)
}

/* 📖 # Why does every mutation re-read the whole collection?

The repository translates each pet operation into one read-modify-write cycle
against the store. There is no cache and no lock between the read and the
write, so two overlapping mutations can lose one update; that is the accepted
single-writer model of this system, and the repository must not "fix" it.
*/

/// Translates pet-domain operations into read-modify-write cycles against the
/// store, and owns the identifier-assignment policy.
///
/// Absence is an expected outcome here, expressed as `Option`; only storage
/// failures are errors, and those propagate unchanged from the store.
#[derive(Debug, Clone)]
pub struct PetRepository {
    store: JsonFileStore<Pet>,
}

impl PetRepository {
    pub fn new(store: JsonFileStore<Pet>) -> Self {
        Self { store }
    }

    /// Append a newborn pet with the next free id and persist the collection.
    pub fn create(&self, name: &str) -> PetboxResult<Pet> {
        let mut pets = self.store.read()?;
        let pet = Pet::born(next_id(&pets), name);
        debug!(id = pet.id, name = %pet.name, "creating pet");

        pets.push(pet.clone());
        self.store.write(&pets)?;
        Ok(pet)
    }

    /// The full collection, in storage (insertion) order.
    pub fn list(&self) -> PetboxResult<Vec<Pet>> {
        self.store.read()
    }

    /// Linear scan for the first record with a matching id. Read-only.
    pub fn get_by_id(&self, id: u64) -> PetboxResult<Option<Pet>> {
        let pets = self.store.read()?;
        Ok(pets.into_iter().find(|pet| pet.id == id))
    }

    /// Increment the matching pet's food counter and persist the whole
    /// mutated collection. No write happens when the id has no match.
    pub fn feed(&self, id: u64) -> PetboxResult<Option<Pet>> {
        self.mutate(id, |pet| pet.food += 1)
    }

    /// Increment the matching pet's age counter and persist the whole
    /// mutated collection. No write happens when the id has no match.
    pub fn increase_age(&self, id: u64) -> PetboxResult<Option<Pet>> {
        self.mutate(id, |pet| pet.age += 1)
    }

    fn mutate(&self, id: u64, apply: impl FnOnce(&mut Pet)) -> PetboxResult<Option<Pet>> {
        let mut pets = self.store.read()?;
        let Some(pet) = pets.iter_mut().find(|pet| pet.id == id) else {
            return Ok(None);
        };

        apply(pet);
        let updated = pet.clone();
        self.store.write(&pets)?;
        Ok(Some(updated))
    }
}
