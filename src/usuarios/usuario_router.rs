// src/usuarios/usuario_router.rs

use actix_web::{delete, get, patch, post, web, HttpResponse};
use bcrypt::{hash, verify, DEFAULT_COST}; // Para hashing de senhas
use sqlx::{query_as, query_scalar};
use tracing::{info, warn};

// Importa as structs do módulo de usuários
use super::auth_middleware::{gerar_token, AuthenticatedUser, ConfigAuth};
use super::usuario_structs::{
    AtualizacaoUsuario, AuthResponse, ListaUsuarios, LoginRequest, NovoUsuario, Papel, Usuario,
    UsuarioResposta,
};
use crate::shared::erros::{ErroApp, ResultadoApp};
use crate::shared::shared_structs::{sucesso_sem_corpo, ConsultaPagina, GenericResponse, Paginacao};
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

/// Rota para cadastrar um novo usuário (comprador ou vendedor) com depósito zero.
#[post("/usuarios/cadastro")]
pub async fn cadastrar_usuario(
    data: web::Data<AppState>,
    novo_usuario: web::Json<NovoUsuario>,
) -> Result<HttpResponse, ErroApp> {
    novo_usuario.validar()?;

    // 1. Verificar se o e-mail já está em uso
    let existente = query_scalar::<_, i32>("SELECT id FROM usuarios WHERE email = $1")
        .bind(&novo_usuario.email)
        .fetch_optional(&data.db_pool)
        .await?;
    if existente.is_some() {
        return Err(ErroApp::Conflito("E-mail já cadastrado.".to_string()));
    }

    // 2. Hash da senha
    let hashed_password = hash(&novo_usuario.senha, DEFAULT_COST)
        .map_err(|e| ErroApp::Interno(format!("falha ao gerar hash da senha: {e}")))?;

    // 3. Inserir o novo usuário no banco de dados
    let id = query_scalar::<_, i32>(
        "INSERT INTO usuarios (nome, email, senha_hash, papel, deposito) VALUES ($1, $2, $3, $4, 0) RETURNING id",
    )
    .bind(&novo_usuario.nome)
    .bind(&novo_usuario.email)
    .bind(&hashed_password)
    .bind(novo_usuario.papel.as_str())
    .fetch_one(&data.db_pool)
    .await
    .map_err(|e| email_duplicado(e.into()))?;

    info!(usuario_id = id, papel = %novo_usuario.papel, "usuário cadastrado");
    Ok(GenericResponse::sucesso(
        format!("Usuário cadastrado com sucesso! ID: {}", id),
        serde_json::json!({ "id": id }),
    ))
}

/// A verificação prévia de e-mail não impede a corrida entre dois cadastros;
/// quem perde cai na restrição UNIQUE e recebe a mesma mensagem.
fn email_duplicado(erro: ErroApp) -> ErroApp {
    match erro {
        ErroApp::Conflito(_) => ErroApp::Conflito("E-mail já cadastrado.".to_string()),
        outro => outro,
    }
}

/// Só o próprio usuário altera ou remove a sua conta.
fn exigir_proprio(usuario: &AuthenticatedUser, id: i32) -> ResultadoApp<()> {
    if usuario.user_id != id {
        return Err(ErroApp::AcessoNegado("Você só pode alterar a sua própria conta.".to_string()));
    }
    Ok(())
}

/// Rota para listar os usuários, paginada por `page` e `limit`. Sem senhas.
#[get("/usuarios")]
pub async fn buscar_usuarios(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
    consulta: web::Query<ConsultaPagina>,
) -> Result<HttpResponse, ErroApp> {
    let (page, limit, offset) = consulta.normalizar()?;

    let usuarios = query_as::<_, UsuarioResposta>(
        "SELECT id, nome, email, papel, deposito FROM usuarios ORDER BY id LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(&data.db_pool)
    .await?;

    let total = query_scalar::<_, i64>("SELECT COUNT(*) FROM usuarios")
        .fetch_one(&data.db_pool)
        .await?;

    Ok(GenericResponse::sucesso(
        "Usuários encontrados",
        ListaUsuarios { data: usuarios, meta: Paginacao::new(total, page, limit) },
    ))
}

/// Rota para buscar um usuário pelo ID.
#[get("/usuarios/{id}")]
pub async fn buscar_usuario_por_id(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroApp> {
    let id = path.into_inner();

    let usuario = query_as::<_, UsuarioResposta>(
        "SELECT id, nome, email, papel, deposito FROM usuarios WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or(ErroApp::ContaNaoEncontrada(id))?;

    Ok(GenericResponse::sucesso("Usuário encontrado", usuario))
}

/// Rota para o usuário atualizar os próprios dados. A senha nova é re-hasheada.
#[patch("/usuarios/{id}")]
pub async fn atualizar_usuario(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
    item: web::Json<AtualizacaoUsuario>,
) -> Result<HttpResponse, ErroApp> {
    let id = path.into_inner();
    exigir_proprio(&usuario, id)?;
    item.validar()?;

    let senha_hash = item
        .senha
        .as_deref()
        .map(|senha| hash(senha, DEFAULT_COST))
        .transpose()
        .map_err(|e| ErroApp::Interno(format!("falha ao gerar hash da senha: {e}")))?;

    let resultado = sqlx::query(
        "UPDATE usuarios SET nome = COALESCE($1, nome), email = COALESCE($2, email), \
         senha_hash = COALESCE($3, senha_hash), papel = COALESCE($4, papel) WHERE id = $5",
    )
    .bind(&item.nome)
    .bind(&item.email)
    .bind(senha_hash)
    .bind(item.papel.map(|p| p.as_str()))
    .bind(id)
    .execute(&data.db_pool)
    .await
    .map_err(|e| email_duplicado(e.into()))?;

    if resultado.rows_affected() == 0 {
        return Err(ErroApp::ContaNaoEncontrada(id));
    }

    info!(usuario_id = id, usuario = %usuario.user_name, "usuário atualizado");
    Ok(sucesso_sem_corpo("Usuário atualizado com sucesso"))
}

/// Rota para o usuário remover a própria conta. Os produtos dele vão junto (ON DELETE CASCADE).
#[delete("/usuarios/{id}")]
pub async fn deletar_usuario(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroApp> {
    let id = path.into_inner();
    exigir_proprio(&usuario, id)?;

    let resultado = sqlx::query("DELETE FROM usuarios WHERE id = $1")
        .bind(id)
        .execute(&data.db_pool)
        .await?;

    if resultado.rows_affected() == 0 {
        return Err(ErroApp::ContaNaoEncontrada(id));
    }

    info!(usuario_id = id, usuario = %usuario.user_name, "usuário removido");
    Ok(sucesso_sem_corpo("Usuário removido com sucesso"))
}

/// Rota para login de usuário. Devolve um JWT com o papel do usuário.
#[post("/usuarios/login")]
pub async fn login_usuario(
    data: web::Data<AppState>,
    auth: web::Data<ConfigAuth>,
    login_request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ErroApp> {
    let credenciais_invalidas = || ErroApp::NaoAutenticado("Credenciais inválidas.".to_string());

    // 1. Buscar o usuário pelo e-mail
    let user = query_as::<_, Usuario>(
        "SELECT id, nome, senha_hash, papel FROM usuarios WHERE email = $1",
    )
    .bind(&login_request.email)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(credenciais_invalidas)?;

    // 2. Verificar a senha
    let password_matches = verify(&login_request.senha, &user.senha_hash)
        .map_err(|e| ErroApp::Interno(format!("falha ao verificar senha: {e}")))?;
    if !password_matches {
        warn!(usuario_id = user.id, "senha incorreta no login");
        return Err(credenciais_invalidas());
    }

    // 3. Gerar token de autenticação
    let papel: Papel = user.papel.parse()?;
    let token = gerar_token(&auth, user.id, &user.nome, papel)?;

    Ok(GenericResponse::sucesso(
        "Login bem-sucedido!",
        AuthResponse {
            user_id: user.id,
            user_name: user.nome,
            role: papel,
            token,
        },
    ))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    use super::*;

    fn autenticado(user_id: i32) -> AuthenticatedUser {
        AuthenticatedUser { user_id, user_name: "Ana".to_string(), papel: Papel::Comprador }
    }

    #[test]
    fn so_o_dono_altera_a_conta() {
        assert!(exigir_proprio(&autenticado(3), 3).is_ok());

        let erro = exigir_proprio(&autenticado(3), 4).unwrap_err();
        assert_eq!(erro.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn email_repetido_vira_409_com_mensagem_propria() {
        let erro = email_duplicado(ErroApp::Conflito("registro duplicado".to_string()));
        assert_eq!(erro, ErroApp::Conflito("E-mail já cadastrado.".to_string()));
        assert_eq!(erro.status_code(), StatusCode::CONFLICT);

        // outros erros passam intactos
        assert_eq!(email_duplicado(ErroApp::ContaNaoEncontrada(2)), ErroApp::ContaNaoEncontrada(2));
    }
}
