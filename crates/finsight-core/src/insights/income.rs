//! Income/Expense splitter

use crate::models::NormalizedTransaction;

use super::types::{FinancialStatus, IncomeVsExpense};

/// Transactions partitioned by direction, in input order
#[derive(Debug, Default)]
pub struct IncomeExpenseSplit<'a> {
    pub income: Vec<&'a NormalizedTransaction>,
    pub expenses: Vec<&'a NormalizedTransaction>,
}

impl<'a> IncomeExpenseSplit<'a> {
    pub fn new(transactions: &'a [NormalizedTransaction]) -> Self {
        let (income, expenses) = transactions.iter().partition(|tx| tx.is_income());
        Self { income, expenses }
    }

    pub fn total_income(&self) -> f64 {
        self.income.iter().fold(0.0, |acc, tx| acc + tx.amount)
    }

    pub fn total_expense(&self) -> f64 {
        self.expenses.iter().fold(0.0, |acc, tx| acc + tx.amount)
    }

    /// Income versus expense summary with savings rate and status
    pub fn summary(&self) -> IncomeVsExpense {
        let total_income = self.total_income();
        let total_expense = self.total_expense();
        let net_balance = total_income - total_expense;
        let savings_rate = if total_income > 0.0 {
            net_balance / total_income * 100.0
        } else {
            0.0
        };

        IncomeVsExpense {
            total_income,
            total_expense,
            net_balance,
            savings_rate,
            status: FinancialStatus::from_savings_rate(savings_rate),
        }
    }
}
