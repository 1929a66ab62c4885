pub mod amount;
pub mod csv;
pub mod engine;
pub mod model;
pub mod validate;

pub use amount::Amount;
pub use engine::Ledger;
pub use model::{ClientId, TxId, TxKind, TxRecord};
