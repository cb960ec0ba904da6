// src/usuarios/usuario_structs.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::erros::{ErroApp, ResultadoApp};

/// Tamanho mínimo da senha em texto claro.
pub const SENHA_MINIMA: usize = 6;

/// Papel do usuário: quem compra ou quem vende.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Papel {
    Comprador,
    Vendedor,
}

impl Papel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Papel::Comprador => "comprador",
            Papel::Vendedor => "vendedor",
        }
    }
}

impl fmt::Display for Papel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Papel {
    type Err = ErroApp;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "comprador" => Ok(Papel::Comprador),
            "vendedor" => Ok(Papel::Vendedor),
            outro => Err(ErroApp::requisicao_invalida(format!("papel desconhecido: {outro}"))),
        }
    }
}

/// Estrutura que representa um usuário no banco de dados.
/// A senha é armazenada como hash.
#[derive(FromRow)]
pub struct Usuario {
    pub id: i32,
    pub nome: String,
    pub senha_hash: String, // Armazena o hash da senha
    pub papel: String,
}

/// Estrutura para receber dados de um novo usuário na requisição de cadastro.
#[derive(Deserialize)]
pub struct NovoUsuario {
    pub nome: String,
    pub email: String,
    pub senha: String, // Senha em texto claro (será hashed antes de salvar)
    pub papel: Papel,
}

impl NovoUsuario {
    pub fn validar(&self) -> ResultadoApp<()> {
        if self.nome.trim().is_empty() || self.email.trim().is_empty() {
            return Err(ErroApp::requisicao_invalida("nome e email são obrigatórios"));
        }
        validar_senha(&self.senha)
    }
}

fn validar_senha(senha: &str) -> ResultadoApp<()> {
    if senha.chars().count() < SENHA_MINIMA {
        return Err(ErroApp::requisicao_invalida(format!(
            "a senha deve ter pelo menos {SENHA_MINIMA} caracteres"
        )));
    }
    Ok(())
}

/// Corpo do PATCH de usuário. Campos ausentes ficam como estão.
/// O depósito nunca muda por aqui, só pelas rotas de depósito e compra.
#[derive(Debug, Default, Deserialize)]
pub struct AtualizacaoUsuario {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub senha: Option<String>,
    pub papel: Option<Papel>,
}

impl AtualizacaoUsuario {
    pub fn validar(&self) -> ResultadoApp<()> {
        if self.nome.is_none() && self.email.is_none() && self.senha.is_none() && self.papel.is_none() {
            return Err(ErroApp::requisicao_invalida("nada para atualizar"));
        }
        if self.nome.as_deref().map_or(false, |n| n.trim().is_empty()) {
            return Err(ErroApp::requisicao_invalida("o nome não pode ser vazio"));
        }
        if self.email.as_deref().map_or(false, |e| e.trim().is_empty()) {
            return Err(ErroApp::requisicao_invalida("o email não pode ser vazio"));
        }
        match &self.senha {
            Some(senha) => validar_senha(senha),
            None => Ok(()),
        }
    }
}

/// Usuário como sai da API: nunca inclui a senha.
#[derive(Debug, Serialize, FromRow)]
pub struct UsuarioResposta {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub papel: String,
    pub deposito: i64,
}

/// Estrutura para a resposta da API ao listar usuários.
#[derive(Serialize)]
pub struct ListaUsuarios {
    pub data: Vec<UsuarioResposta>,
    pub meta: crate::shared::shared_structs::Paginacao,
}

/// Estrutura para receber dados de login do usuário.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String, // Senha em texto claro
}

/// Estrutura para o payload do JWT (Claims).
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,     // Subject (ID do usuário)
    pub name: String, // Nome do usuário
    pub role: Papel,
    pub exp: i64,     // Expiration Time (timestamp Unix)
}

/// Estrutura para a resposta de sucesso do login.
#[derive(Serialize)]
pub struct AuthResponse {
    pub user_id: i32,
    pub user_name: String,
    pub role: Papel,
    pub token: String,
}

/// Corpo do depósito: uma moeda por vez.
#[derive(Debug, Deserialize)]
pub struct Deposito {
    pub cents: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn papel_ida_e_volta_por_texto() {
        assert_eq!("comprador".parse::<Papel>().unwrap(), Papel::Comprador);
        assert_eq!(Papel::Vendedor.to_string(), "vendedor");
        assert!("admin".parse::<Papel>().is_err());
    }

    #[test]
    fn papel_no_json_em_minusculas() {
        let novo: NovoUsuario = serde_json::from_str(
            r#"{"nome":"Ana","email":"ana@x.com","senha":"123","papel":"vendedor"}"#,
        )
        .unwrap();
        assert_eq!(novo.papel, Papel::Vendedor);
        // "123" é curta demais
        assert!(matches!(novo.validar(), Err(ErroApp::RequisicaoInvalida(_))));
    }

    #[test]
    fn atualizacao_parcial_valida_so_o_que_veio() {
        let vazia = AtualizacaoUsuario::default();
        assert!(vazia.validar().is_err());

        let so_nome: AtualizacaoUsuario = serde_json::from_str(r#"{"nome":"Bia"}"#).unwrap();
        assert!(so_nome.validar().is_ok());

        let senha_curta = AtualizacaoUsuario { senha: Some("abc".into()), ..Default::default() };
        assert!(senha_curta.validar().is_err());

        let email_branco = AtualizacaoUsuario { email: Some("  ".into()), ..Default::default() };
        assert!(email_branco.validar().is_err());

        let papel: AtualizacaoUsuario = serde_json::from_str(r#"{"papel":"comprador","senha":"segredo"}"#).unwrap();
        assert_eq!(papel.papel, Some(Papel::Comprador));
        assert!(papel.validar().is_ok());
    }

    #[test]
    fn resposta_de_usuario_nao_expoe_senha() {
        let resposta = UsuarioResposta {
            id: 1,
            nome: "Ana".into(),
            email: "ana@x.com".into(),
            papel: "vendedor".into(),
            deposito: 0,
        };
        let json = serde_json::to_value(&resposta).unwrap();
        assert!(json.get("senha_hash").is_none());
        assert_eq!(json["deposito"], 0);
    }
}
