// src/main.rs

use std::time::Duration;

use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, Pool, Postgres};
use tracing::{error, info};

// Importa os módulos
mod config;     // Configuração (TOML + ambiente)
mod produtos;   // Módulo de produtos e registro de estoque
mod shared;     // Erros, respostas, persistência e telemetria
mod usuarios;   // Módulo de usuários, autenticação e depósitos
mod vendas;     // Módulo de compras

use shared::persistencia_postgres::ArmazemPostgres;
use usuarios::auth_middleware::ConfigAuth;

// Estado compartilhado: pool do banco, o armazém transacional usado pelas compras
// e o tempo limite de cada unidade de trabalho.
pub struct AppState {
    pub db_pool: Pool<Postgres>,
    pub armazem: ArmazemPostgres,
    pub limite_transacao: Duration,
}

fn erro_io(msg: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, msg.to_string())
}

// Função principal da aplicação Actix Web.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    shared::telemetria::init();

    let config = config::Configuracao::carregar().map_err(erro_io)?;

    // Conecta ao banco de dados PostgreSQL usando um pool de conexões.
    let db_pool = PgPoolOptions::new()
        .max_connections(config.max_conexoes)
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            error!(error = %e, "falha ao conectar ao PostgreSQL");
            erro_io(e)
        })?;

    // Cria as tabelas se ainda não existirem.
    db_pool
        .execute(include_str!("../schema.sql"))
        .await
        .map_err(erro_io)?;

    let app_state = web::Data::new(AppState {
        armazem: ArmazemPostgres::new(db_pool.clone()),
        db_pool,
        limite_transacao: config.limite_transacao(),
    });
    let auth = web::Data::new(ConfigAuth {
        jwt_secret: config.jwt_secret.clone(),
        validade_horas: config.jwt_validade_horas,
    });

    info!(bind = %config.bind_addr, "iniciando API na porta configurada");

    // Configura e inicia o servidor HTTP.
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(auth.clone())

            // Módulo de Produtos
            .service(produtos::produtos_router::buscar_produtos)
            .service(produtos::produtos_router::buscar_produto_por_id)
            .service(produtos::produtos_router::cadastrar_produto)
            .service(produtos::produtos_router::atualizar_produto)
            .service(produtos::produtos_router::repor_estoque)
            .service(produtos::produtos_router::deletar_produto)

            // Módulo de Compras
            .service(vendas::vendas_router::realizar_compra)

            // Módulo de Usuários e Depósitos
            .service(usuarios::usuario_router::cadastrar_usuario)
            .service(usuarios::usuario_router::login_usuario)
            .service(usuarios::usuario_router::buscar_usuarios)
            .service(usuarios::usuario_router::buscar_usuario_por_id)
            .service(usuarios::usuario_router::atualizar_usuario)
            .service(usuarios::usuario_router::deletar_usuario)
            .service(usuarios::deposito_router::depositar_moeda)
            .service(usuarios::deposito_router::resetar_deposito)
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
