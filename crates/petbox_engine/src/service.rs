use std::fmt;

use petbox_base::PetboxError;

use crate::pet::Pet;
use crate::repository::PetRepository;

/// Domain-level outcomes of pet operations.
///
/// `NotFound` and `Dead` are business conditions the HTTP layer turns into
/// 404 responses; `Storage` carries an infrastructure failure through
/// untouched so it can surface as a 500 instead of being mistaken for a
/// missing pet.
#[derive(Debug)]
pub enum PetError {
    NotFound { id: u64 },
    Dead { id: u64 },
    Storage(Box<PetboxError>),
}

impl fmt::Display for PetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { id } => {
                write!(f, "The pet has not found with the following id: {}", id)
            }
            // Message kept byte-for-byte from the original service, spacing included
            Self::Dead { id } => write!(f, "The pet is dead with the following id :{}", id),
            Self::Storage(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for PetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<Box<PetboxError>> for PetError {
    fn from(err: Box<PetboxError>) -> Self {
        Self::Storage(err)
    }
}

/* 📖 # Why does the death check live here and not in the repository?

The repository is a mechanical state-transition layer: it will happily feed a
pet whose food counter is already negative. All business judgment about death
is made here, after the mutation, by inspecting the returned record. Moving
the check below this layer would change observable behavior (the mutation
would stop being persisted for dead pets).
*/

/// Business layer over the repository: resolves absence into `NotFound` and
/// classifies death after feed/age mutations.
#[derive(Debug, Clone)]
pub struct PetService {
    repository: PetRepository,
}

impl PetService {
    pub fn new(repository: PetRepository) -> Self {
        Self { repository }
    }

    /// Create a pet with all counters initialized.
    pub fn born(&self, name: &str) -> Result<Pet, PetError> {
        Ok(self.repository.create(name)?)
    }

    /// All pets in storage order.
    pub fn list(&self) -> Result<Vec<Pet>, PetError> {
        Ok(self.repository.list()?)
    }

    /// Fetch one pet; absence is an error at this layer.
    pub fn get_by_id(&self, id: u64) -> Result<Pet, PetError> {
        self.repository
            .get_by_id(id)?
            .ok_or(PetError::NotFound { id })
    }

    /// Feed the pet, then classify death on the updated record.
    pub fn feed(&self, id: u64) -> Result<Pet, PetError> {
        let pet = self.repository.feed(id)?.ok_or(PetError::NotFound { id })?;
        if pet.is_dead() {
            return Err(PetError::Dead { id });
        }
        Ok(pet)
    }

    /// Age the pet, then classify death on the updated record.
    pub fn increase_age(&self, id: u64) -> Result<Pet, PetError> {
        let pet = self
            .repository
            .increase_age(id)?
            .ok_or(PetError::NotFound { id })?;
        if pet.is_dead() {
            return Err(PetError::Dead { id });
        }
        Ok(pet)
    }
}
