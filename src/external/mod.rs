pub mod clock;
pub mod ledger;
pub mod random;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ledger::{BalanceLedger, InMemoryLedger, LedgerError};
pub use random::{RandomSource, SequenceRandom, ThreadRngSource};
