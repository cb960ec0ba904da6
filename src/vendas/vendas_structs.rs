// src/vendas/vendas_structs.rs

use serde::{Deserialize, Serialize};

/// Estrutura para representar um item individual dentro de uma compra.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct ItemCompra {
    #[serde(rename = "productId")]
    pub produto_id: i32,
    #[serde(rename = "amount")]
    pub quantidade: i32,
}

/// Corpo da requisição de compra. O comprador vem do token.
#[derive(Debug, Deserialize)]
pub struct PedidoCompra {
    #[serde(rename = "items")]
    pub itens: Vec<ItemCompra>,
}

/// Linha do recibo.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ItemRecibo {
    pub id: i32,
    #[serde(rename = "productName")]
    pub nome_produto: String,
    #[serde(rename = "quantityBought")]
    pub quantidade_comprada: i32,
}

/// Recibo de uma compra concluída.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Recibo {
    #[serde(rename = "totalSpent")]
    pub total_gasto: i64,
    #[serde(rename = "items")]
    pub itens: Vec<ItemRecibo>,
    #[serde(rename = "remainingDeposit")]
    pub deposito_restante: i64,
}
