//! Error handling for the Farm Ledger
//!
//! Provides consistent error messages in English and Brazilian Portuguese

use serde::Serialize;
use thiserror::Error;

use shared::FieldError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_pt: String,
    },

    #[error("Conflict: {message}")]
    Conflict {
        resource: String,
        message: String,
        message_pt: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    // Storage errors
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Error detail for display
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_pt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    /// Build a validation error for a single field
    pub fn validation(field: &str, message: &str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
            message_pt: format!("Campo inválido ({}): {}", field, message),
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::Conflict { .. } => "CONFLICT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidStateTransition(_) => "INVALID_STATE_TRANSITION",
            AppError::StorageError(_) => "STORAGE_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Export(_) => "EXPORT_ERROR",
            AppError::PasswordHash(_) => "PASSWORD_HASH_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Bilingual description of the error
    pub fn detail(&self) -> ErrorDetail {
        let (message_en, message_pt, field) = match self {
            AppError::InvalidCredentials => (
                "Invalid username or password".to_string(),
                "Usuário ou senha inválidos".to_string(),
                None,
            ),
            AppError::InsufficientPermissions => (
                "You do not have permission to perform this action".to_string(),
                "Você não tem permissão para realizar esta ação".to_string(),
                None,
            ),
            AppError::Validation {
                field,
                message,
                message_pt,
            } => (message.clone(), message_pt.clone(), Some(field.clone())),
            AppError::Conflict {
                resource,
                message,
                message_pt,
            } => (message.clone(), message_pt.clone(), Some(resource.clone())),
            AppError::NotFound(resource) => (
                format!("{} not found", resource),
                format!("{} não encontrado(a)", resource),
                None,
            ),
            AppError::InvalidStateTransition(msg) => (
                msg.clone(),
                format!("Não é possível alterar o estado: {}", msg),
                None,
            ),
            AppError::StorageError(msg) => (
                format!("Storage error: {}", msg),
                format!("Erro ao salvar os dados: {}", msg),
                None,
            ),
            AppError::Serialization(e) => (
                format!("Data file is malformed: {}", e),
                format!("Arquivo de dados inválido: {}", e),
                None,
            ),
            AppError::Io(e) => (
                format!("I/O error: {}", e),
                format!("Erro de leitura/escrita: {}", e),
                None,
            ),
            AppError::Export(msg) => (
                format!("Report export failed: {}", msg),
                format!("Erro ao gerar relatório: {}", msg),
                None,
            ),
            AppError::PasswordHash(_) => (
                "Password could not be processed".to_string(),
                "Não foi possível processar a senha".to_string(),
                None,
            ),
            AppError::Configuration(msg) => (
                format!("Configuration error: {}", msg),
                format!("Erro de configuração: {}", msg),
                None,
            ),
        };

        ErrorDetail {
            code: self.code().to_string(),
            message_en,
            message_pt,
            field,
        }
    }
}

impl From<FieldError> for AppError {
    fn from(err: FieldError) -> Self {
        AppError::validation(err.field, err.message)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Export(err.to_string())
    }
}

/// Result type alias for services
pub type AppResult<T> = Result<T, AppError>;
