use std::time::Duration;

/// 退避方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// `base * 2^attempt`，不超过 `max`
    Exponential { base: Duration, max: Duration },
    /// 固定间隔
    Fixed { interval: Duration },
}

/// 播放失败后的重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 连续失败达到该次数后放弃
    pub ceiling: u32,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            ceiling: 3,
            backoff: Backoff::Exponential {
                base: Duration::from_millis(1_000),
                max: Duration::from_millis(30_000),
            },
        }
    }
}

impl RetryPolicy {
    pub fn exponential(ceiling: u32, base_ms: u64, max_ms: u64) -> Self {
        Self {
            ceiling,
            backoff: Backoff::Exponential {
                base: Duration::from_millis(base_ms),
                max: Duration::from_millis(max_ms.max(base_ms)),
            },
        }
    }

    /// 更耐心的策略：每秒重试一次，最多 15 次
    pub fn fixed_interval() -> Self {
        Self::fixed(15, 1_000)
    }

    pub fn fixed(ceiling: u32, interval_ms: u64) -> Self {
        Self {
            ceiling,
            backoff: Backoff::Fixed {
                interval: Duration::from_millis(interval_ms),
            },
        }
    }

    /// 第 `attempt` 次重试（从 0 开始）前的等待时间
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed { interval } => interval,
            Backoff::Exponential { base, max } => {
                let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
                base.checked_mul(factor).unwrap_or(max).min(max)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_doubles_and_caps() {
        let p = RetryPolicy::default();
        assert_eq!(p.delay_for(0), Duration::from_secs(1));
        assert_eq!(p.delay_for(1), Duration::from_secs(2));
        assert_eq!(p.delay_for(2), Duration::from_secs(4));
        assert_eq!(p.delay_for(4), Duration::from_secs(16));
        assert_eq!(p.delay_for(5), Duration::from_secs(30));
        assert_eq!(p.delay_for(40), Duration::from_secs(30));
        assert_eq!(p.ceiling, 3);
    }

    #[test]
    fn fixed_interval_is_constant() {
        let p = RetryPolicy::fixed_interval();
        assert_eq!(p.ceiling, 15);
        for attempt in [0, 3, 14] {
            assert_eq!(p.delay_for(attempt), Duration::from_secs(1));
        }
    }

    #[test]
    fn exponential_max_never_below_base() {
        let p = RetryPolicy::exponential(2, 5_000, 100);
        assert_eq!(p.delay_for(0), Duration::from_secs(5));
        assert_eq!(p.delay_for(3), Duration::from_secs(5));
    }
}
