//! Transaction demarcation over the pooled connection.

pub mod txn;

pub use txn::{Isolation, Txn, TxnManager, MAX_SERIALIZATION_RETRIES};
