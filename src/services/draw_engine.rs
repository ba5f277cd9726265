//! 纯函数抽奖选择: 同样的奖品集合与同样的随机值永远得到同一个奖品。
//! 没有共享状态, 天然并发安全; 随机值由调用方的 RandomSource 提供。

use crate::entities::Prize;

/// 在按 position 排序的启用奖品集合上按累积概率选择。
/// roll_pct 取值 [0, 100); 返回第一个满足 roll < 累积概率 的奖品。
/// 浮点误差导致无命中时返回最后一个奖品, 永远不会"未中奖"。
pub fn select<'a>(prizes: &'a [Prize], roll_pct: f64) -> Option<&'a Prize> {
    if prizes.is_empty() {
        return None;
    }
    let mut acc_bp: i64 = 0;
    for prize in prizes {
        acc_bp += prize.probability_bp as i64;
        if roll_pct * 100.0 < acc_bp as f64 {
            return Some(prize);
        }
    }
    prizes.last()
}
