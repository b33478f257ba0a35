use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionCategory {
    Income,
    Expense,
}

/// Wallet entry as kept by the collaborator; amounts are always positive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: u64,
    pub amount: f64,
    pub category: TransactionCategory,
    #[serde(default)]
    pub description: Option<String>,
}

impl Transaction {
    pub fn new(id: u64, amount: f64, category: TransactionCategory) -> Self {
        Self {
            id,
            amount,
            category,
            description: None,
        }
    }

    /// Effect on the balance: income adds, expenses subtract
    pub fn signed_amount(&self) -> f64 {
        match self.category {
            TransactionCategory::Income => self.amount,
            TransactionCategory::Expense => -self.amount,
        }
    }
}
