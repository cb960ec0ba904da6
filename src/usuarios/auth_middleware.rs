// src/usuarios/auth_middleware.rs

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

// Importa as Claims e o Papel do módulo de structs de usuário
use super::usuario_structs::{Claims, Papel};
use crate::shared::erros::ErroApp;

/// Configuração de autenticação compartilhada com os extratores.
#[derive(Clone)]
pub struct ConfigAuth {
    pub jwt_secret: String,
    pub validade_horas: i64,
}

/// Gera um JWT HS256 para o usuário.
pub fn gerar_token(config: &ConfigAuth, user_id: i32, nome: &str, papel: Papel) -> Result<String, ErroApp> {
    let claims = Claims {
        sub: user_id,
        name: nome.to_string(),
        role: papel,
        exp: (Utc::now() + Duration::hours(config.validade_horas)).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )
    .map_err(|e| ErroApp::Interno(format!("falha ao gerar token: {e}")))
}

/// Decodifica e valida o token (assinatura e expiração).
pub fn decodificar_token(config: &ConfigAuth, token: &str) -> Result<Claims, ErroApp> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(token, &DecodingKey::from_secret(config.jwt_secret.as_ref()), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            debug!(error = ?e, "JWT rejeitado");
            let mensagem = match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token expirado.",
                jsonwebtoken::errors::ErrorKind::InvalidSignature => "Assinatura do token inválida.",
                jsonwebtoken::errors::ErrorKind::InvalidToken => "Token malformado.",
                _ => "Token de autenticação inválido.",
            };
            ErroApp::NaoAutenticado(mensagem.to_string())
        })
}

/// Usuário autenticado, extraído do cabeçalho `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub user_name: String,
    pub papel: Papel,
}

fn autenticar(req: &HttpRequest) -> Result<AuthenticatedUser, ErroApp> {
    let config = req
        .app_data::<web::Data<ConfigAuth>>()
        .ok_or_else(|| ErroApp::Interno("ConfigAuth não registrada no app".to_string()))?;

    let header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| ErroApp::NaoAutenticado("Token de autenticação ausente.".to_string()))?
        .to_str()
        .map_err(|_| ErroApp::NaoAutenticado("Token de autenticação inválido.".to_string()))?;

    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        ErroApp::NaoAutenticado("Formato de token inválido. Esperado 'Bearer <token>'.".to_string())
    })?;

    let claims = decodificar_token(config, token)?;
    Ok(AuthenticatedUser {
        user_id: claims.sub,
        user_name: claims.name,
        papel: claims.role,
    })
}

fn exigir_papel(req: &HttpRequest, papel: Papel) -> Result<AuthenticatedUser, ErroApp> {
    let usuario = autenticar(req)?;
    if usuario.papel != papel {
        return Err(ErroApp::AcessoNegado(format!("apenas usuários com papel '{papel}'")));
    }
    Ok(usuario)
}

impl FromRequest for AuthenticatedUser {
    type Error = ErroApp;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(autenticar(req))
    }
}

/// Extrator que só aceita compradores.
#[derive(Debug, Clone)]
pub struct Comprador(pub AuthenticatedUser);

impl FromRequest for Comprador {
    type Error = ErroApp;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(exigir_papel(req, Papel::Comprador).map(Comprador))
    }
}

/// Extrator que só aceita vendedores.
#[derive(Debug, Clone)]
pub struct Vendedor(pub AuthenticatedUser);

impl FromRequest for Vendedor {
    type Error = ErroApp;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(exigir_papel(req, Papel::Vendedor).map(Vendedor))
    }
}
