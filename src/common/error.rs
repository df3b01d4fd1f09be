use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Funil não encontrado")]
    FunnelNotFound,

    #[error("Estágio não encontrado")]
    StageNotFound,

    #[error("Lead não encontrado")]
    LeadNotFound,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Atividade não encontrada")]
    ActivityNotFound,

    #[error("Registro de log não encontrado")]
    LogNotFound,

    #[error("Movimentação pendente não encontrada")]
    PendingMoveNotFound,

    // Conflitos de estado: a operação é bloqueada, nada é gravado.
    #[error("O funil precisa manter pelo menos um estágio")]
    LastStage,

    #[error("O estágio ainda possui leads")]
    StageInUse,

    #[error("O funil ainda possui leads")]
    FunnelInUse,

    // Falha de escrita no armazém (cota, permissão). A mudança em memória
    // é descartada pelo chamador; nada fica pela metade.
    #[error("Erro de armazenamento: {0}")]
    StorageError(String),

    #[error("Erro de serialização")]
    SerializationError(#[from] serde_json::Error),

    // Variante genérica para qualquer outro erro inesperado
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retornar todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::FunnelNotFound => (StatusCode::NOT_FOUND, "Funil não encontrado."),
            AppError::StageNotFound => (StatusCode::NOT_FOUND, "Estágio não encontrado."),
            AppError::LeadNotFound => (StatusCode::NOT_FOUND, "Lead não encontrado."),
            AppError::ProductNotFound => (StatusCode::NOT_FOUND, "Produto não encontrado."),
            AppError::ActivityNotFound => (StatusCode::NOT_FOUND, "Atividade não encontrada."),
            AppError::LogNotFound => (StatusCode::NOT_FOUND, "Registro de log não encontrado."),
            AppError::PendingMoveNotFound => {
                (StatusCode::NOT_FOUND, "Movimentação pendente não encontrada.")
            }
            AppError::LastStage => {
                (StatusCode::CONFLICT, "O funil precisa manter pelo menos um estágio.")
            }
            AppError::StageInUse => {
                (StatusCode::CONFLICT, "O estágio ainda possui leads e não pode ser removido.")
            }
            AppError::FunnelInUse => {
                (StatusCode::CONFLICT, "O funil ainda possui leads e não pode ser excluído.")
            }

            // Todos os outros erros (StorageError, SerializationError, ...) viram 500.
            // O `tracing` vai logar a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

// Monta um erro de validação manual, para regras que o derive não cobre
// (motivo em branco, estágio fora do funil, etc.).
pub fn validation_error(field: &str, code: &'static str, message: &str) -> AppError {
    let mut err = validator::ValidationErrors::new();
    let mut validation_err = validator::ValidationError::new(code);
    validation_err.message = Some(message.to_string().into());

    // Leak seguro para erro estático
    let static_field: &'static str = Box::leak(field.to_string().into_boxed_str());
    err.add(static_field.into(), validation_err);

    AppError::ValidationError(err)
}
