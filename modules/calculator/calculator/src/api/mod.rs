pub mod connect;
pub mod grpc;
