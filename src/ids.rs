//! Id generation for rounds, matches, participants and tournaments.

use uuid::Uuid;

/// Source of fresh ids. Passed into every operation that creates entities.
pub trait IdGenerator {
    fn next_id(&mut self) -> Uuid;
}

/// Random v4 UUIDs. Collisions are not a practical concern in a 122-bit space.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Monotonic ids starting after `start`. Useful when ids must be reproducible.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialIds {
    last: u128,
}

impl SequentialIds {
    pub fn starting_at(start: u128) -> Self {
        Self { last: start }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> Uuid {
        self.last += 1;
        Uuid::from_u128(self.last)
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for &mut G {
    fn next_id(&mut self) -> Uuid {
        (**self).next_id()
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next_id(&mut self) -> Uuid {
        (**self).next_id()
    }
}
