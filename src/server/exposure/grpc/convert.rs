//! Conversion utilities between ledger types and generated protobuf messages
//!
//! Costs travel as `float` on the wire while the ledger computes in `f64`;
//! the narrowing happens here and nowhere else.

use crate::core::datetime::format_date_time;
use crate::core::{
    DateRange, IdentityError, LedgerError, NewTransaction, StorageError, Transaction,
    TransactionPatch,
};
use crate::proto::transaction as pb;
use tonic::Status;

/// Convert a stored transaction into its wire form
pub fn transaction_to_proto(tx: Transaction) -> pb::Transaction {
    pb::Transaction {
        date: format_date_time(&tx.date),
        id: tx.id,
        user_id: tx.user_id,
        category: tx.category,
        name: tx.name,
        cost: tx.cost as f32,
    }
}

pub fn create_request_to_input(req: pb::CreateTransactionRequest) -> NewTransaction {
    NewTransaction {
        category: req.category,
        user_id: req.user_id,
        name: req.name,
        cost: f64::from(req.cost),
        date: req.date.filter(|d| !d.is_empty()),
    }
}

/// Empty strings are unbounded
pub fn time_frame_request_to_range(req: &pb::GetTxByTimeFrameRequest) -> DateRange {
    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
    DateRange {
        start_date: non_empty(&req.start_date),
        end_date: non_empty(&req.end_date),
    }
}

pub fn update_request_to_patch(req: pb::UpdateTransactionRequest) -> TransactionPatch {
    TransactionPatch {
        id: req.tx_id,
        user_id: req.user_id,
        category: req.category,
        name: req.name,
        cost: req.cost,
        date: req.date,
        time: req.time,
    }
}

/// Map a ledger error onto a gRPC status
pub fn error_to_status(err: LedgerError) -> Status {
    let message = err.to_string();
    match err {
        LedgerError::InvalidArgument(_) => Status::invalid_argument(message),
        LedgerError::NotFound(_) => Status::not_found(message),
        LedgerError::Storage(StorageError::InvalidId { .. }) => Status::invalid_argument(message),
        LedgerError::Storage(_) => Status::internal(message),
        LedgerError::Identity(IdentityError::Unavailable { .. }) => Status::unavailable(message),
        LedgerError::Identity(_) => Status::internal(message),
        LedgerError::ConcurrentModification { .. } => Status::failed_precondition(message),
    }
}
