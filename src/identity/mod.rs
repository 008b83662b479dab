//! Identity validator implementations

#[cfg(feature = "grpc")]
pub mod grpc;
pub mod static_users;

#[cfg(feature = "grpc")]
pub use grpc::GrpcIdentityClient;
pub use static_users::StaticIdentityValidator;
