use rand::Rng;
use std::sync::Mutex;

/// 可注入随机源, 返回 [0, 1) 区间的抽样
/// 轮盘动画等展示层随机与此无关, 核心只消费这一个抽象
pub trait RandomSource: Send + Sync {
    fn next(&self) -> f64;
}

/// 生产环境使用的线程本地随机数
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn next(&self) -> f64 {
        let mut rng = rand::thread_rng();
        rng.r#gen::<f64>()
    }
}

/// 按给定序列循环产出的随机源 (确定性测试用)
#[derive(Debug)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: Mutex<usize>,
}

impl SequenceRandom {
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "SequenceRandom requires values");
        Self {
            values,
            cursor: Mutex::new(0),
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next(&self) -> f64 {
        let mut cursor = self.cursor.lock().unwrap();
        let value = self.values[*cursor % self.values.len()];
        *cursor += 1;
        value
    }
}
