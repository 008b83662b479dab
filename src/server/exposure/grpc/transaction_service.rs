//! gRPC Transaction Service implementation
//!
//! Thin adapter over [`TransactionService`]: decode the request, call the
//! service, encode the result. Business rules stay in the service; only the
//! "no new updates" guard runs here so an empty update never leaves the
//! adapter.

use super::convert::{
    create_request_to_input, error_to_status, time_frame_request_to_range, transaction_to_proto,
    update_request_to_patch,
};
use crate::core::TransactionService;
use crate::proto::transaction::transaction_service_server::TransactionService as TransactionRpc;
use crate::proto::transaction::{
    CreateTransactionRequest, CreateTransactionResponse, DeleteTransactionRequest,
    GetTransactionListRequest, GetTransactionListResponse, GetTransactionRequest,
    GetTransactionResponse, GetTxByTimeFrameRequest, UpdateTransactionRequest,
};
use tonic::{Request, Response, Status};

/// gRPC Transaction Service implementation
pub struct TransactionServiceImpl {
    service: TransactionService,
}

impl TransactionServiceImpl {
    pub fn new(service: TransactionService) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl TransactionRpc for TransactionServiceImpl {
    async fn create_transaction(
        &self,
        request: Request<CreateTransactionRequest>,
    ) -> Result<Response<CreateTransactionResponse>, Status> {
        let input = create_request_to_input(request.into_inner());

        let tx_id = self.service.create(input).await.map_err(error_to_status)?;

        Ok(Response::new(CreateTransactionResponse { tx_id }))
    }

    async fn get_transaction(
        &self,
        request: Request<GetTransactionRequest>,
    ) -> Result<Response<GetTransactionResponse>, Status> {
        let req = request.into_inner();

        let tx = self
            .service
            .get(&req.tx_id, &req.user_id)
            .await
            .map_err(error_to_status)?
            .ok_or_else(|| Status::not_found(format!("transaction '{}' not found", req.tx_id)))?;

        Ok(Response::new(GetTransactionResponse {
            transaction: Some(transaction_to_proto(tx)),
        }))
    }

    async fn get_transaction_list(
        &self,
        request: Request<GetTransactionListRequest>,
    ) -> Result<Response<GetTransactionListResponse>, Status> {
        let req = request.into_inner();

        let transactions = self
            .service
            .list(&req.user_id)
            .await
            .map_err(error_to_status)?;

        Ok(Response::new(GetTransactionListResponse {
            transactions: transactions.into_iter().map(transaction_to_proto).collect(),
        }))
    }

    async fn get_tx_by_time_frame(
        &self,
        request: Request<GetTxByTimeFrameRequest>,
    ) -> Result<Response<GetTransactionListResponse>, Status> {
        let req = request.into_inner();
        let range = time_frame_request_to_range(&req);

        let transactions = self
            .service
            .list_in_range(&req.user_id, &range)
            .await
            .map_err(error_to_status)?;

        Ok(Response::new(GetTransactionListResponse {
            transactions: transactions.into_iter().map(transaction_to_proto).collect(),
        }))
    }

    async fn update_transaction(
        &self,
        request: Request<UpdateTransactionRequest>,
    ) -> Result<Response<GetTransactionResponse>, Status> {
        let patch = update_request_to_patch(request.into_inner());
        if patch.is_empty() {
            return Err(Status::invalid_argument("no new updates"));
        }

        let updated = self.service.update(patch).await.map_err(error_to_status)?;

        Ok(Response::new(GetTransactionResponse {
            transaction: Some(transaction_to_proto(updated)),
        }))
    }

    async fn delete_transaction(
        &self,
        request: Request<DeleteTransactionRequest>,
    ) -> Result<Response<()>, Status> {
        let req = request.into_inner();

        self.service
            .delete(&req.user_id, &req.tx_id)
            .await
            .map_err(error_to_status)?;

        Ok(Response::new(()))
    }
}
