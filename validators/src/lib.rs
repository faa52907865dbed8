//! Validator registry — the current validator set, stakes, and reputation.
//!
//! The registry computes selection weights from stake and reputation and
//! provides deterministic stake-weighted sampling: every node recomputes the
//! same sample from the same DAG tip, which is what makes bundle
//! endorsements verifiable.
//!
//! Validators are created and removed by administrative action outside this
//! crate; the consensus engine touches only reputation (penalizing endorsers
//! of orphaned bundles, rewarding endorsers of finalized ones).

pub mod error;
pub mod registry;
pub mod validator;

pub use error::RegistryError;
pub use registry::ValidatorRegistry;
pub use validator::{Validator, ValidatorId};
