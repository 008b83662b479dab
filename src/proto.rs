//! Generated protobuf code for the services the ledger serves and consumes

/// `transaction.TransactionService`, served by the ledger
pub mod transaction {
    tonic::include_proto!("transaction");
}

/// `user.UserService`, consumed for identity checks
pub mod user {
    tonic::include_proto!("user");
}
