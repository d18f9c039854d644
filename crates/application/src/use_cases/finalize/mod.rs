mod chain_state;
mod error;
mod finalize_cname;
mod records;
mod serve_finalized;

pub use error::FinalizeError;
pub use finalize_cname::FinalizeCnameUseCase;
pub use records::{cname_target, flatten_answers, terminal_answers};
pub use serve_finalized::ServeFinalizedUseCase;
