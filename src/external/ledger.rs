use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

/// 账本侧错误: 核心将其映射为 CreditFailure 并回滚本次状态迁移
#[derive(Debug, Error)]
#[error("{0}")]
pub struct LedgerError(pub String);

/// 余额账本契约: 核心只依赖这一个入账操作
/// 持久化与对账由站点的钱包系统负责, 不属于本引擎
pub trait BalanceLedger: Send + Sync {
    fn credit(&self, user_id: i64, amount_cents: i64) -> Result<(), LedgerError>;
}

/// 进程内账本实现 (默认装配与测试用)
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: Mutex<HashMap<i64, i64>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, user_id: i64) -> i64 {
        *self.balances.lock().unwrap().get(&user_id).unwrap_or(&0)
    }
}

impl BalanceLedger for InMemoryLedger {
    fn credit(&self, user_id: i64, amount_cents: i64) -> Result<(), LedgerError> {
        if amount_cents < 0 {
            return Err(LedgerError(format!(
                "Negative credit amount: {amount_cents}"
            )));
        }
        let mut balances = self.balances.lock().unwrap();
        let balance = balances.entry(user_id).or_insert(0);
        *balance += amount_cents;
        log::info!("Ledger credit: user_id={user_id} amount_cents={amount_cents}");
        Ok(())
    }
}
