pub mod finalize;

pub use finalize::{FinalizeCnameUseCase, FinalizeError, ServeFinalizedUseCase};
