//! Store error types.
//!
//! This module defines the error types that can occur while talking to the
//! destination movie table.

use thiserror::Error;

/// Errors that can occur during movie store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to establish a connection to the database.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to begin, commit or roll back a transaction.
    #[error("Transaction error: {0}")]
    TransactionError(String),

    /// A write (delete or batch upsert) was rejected.
    #[error("Write error: {0}")]
    WriteError(String),

    /// A read query failed.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Failed to create the table or search index.
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// A returned row could not be decoded.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// The store configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The provided query is invalid.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl StoreError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a transaction error.
    pub fn transaction(msg: impl Into<String>) -> Self {
        Self::TransactionError(msg.into())
    }

    /// Create a write error.
    pub fn write(msg: impl Into<String>) -> Self {
        Self::WriteError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create a schema error.
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::SchemaError(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::DecodeError(msg.into())
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an invalid query error.
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }
}
