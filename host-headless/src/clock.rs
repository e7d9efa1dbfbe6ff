//! # 虚拟时钟
//!
//! 一次性定时器队列。到期时间相同的定时器按申请顺序触发，
//! 与浏览器 `setTimeout` 的行为一致。时间只在 Host 主动推进时前进。

use std::collections::BTreeMap;

use page_runtime::Timer;

#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now_ms: u64,
    next_seq: u64,
    /// (到期时间, 申请序号) -> 定时器
    queue: BTreeMap<(u64, u64), Timer>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前虚拟时间（毫秒）
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// 申请定时器，返回到期时间
    pub fn schedule(&mut self, timer: Timer, delay_ms: u64) -> u64 {
        let due = self.now_ms.saturating_add(delay_ms);
        self.queue.insert((due, self.next_seq), timer);
        self.next_seq += 1;
        due
    }

    /// 待触发的定时器数量
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// 最早的到期时间
    pub fn next_due(&self) -> Option<u64> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// 取出一个不晚于 `deadline` 到期的定时器，并把时间推进到它的到期时间
    pub fn pop_due(&mut self, deadline: u64) -> Option<(u64, Timer)> {
        let (&(due, seq), _) = self.queue.iter().next()?;
        if due > deadline {
            return None;
        }
        let timer = self.queue.remove(&(due, seq))?;
        self.now_ms = self.now_ms.max(due);
        Some((due, timer))
    }

    /// 把时间推进到 `to`（不会倒退）
    pub fn advance_to(&mut self, to: u64) {
        self.now_ms = self.now_ms.max(to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut clock = VirtualClock::new();
        clock.schedule(Timer::HeroReveal(3), 1200);
        clock.schedule(Timer::HeroReveal(0), 300);
        clock.schedule(Timer::Particles, 1000);

        let fired: Vec<_> = std::iter::from_fn(|| clock.pop_due(u64::MAX)).collect();
        assert_eq!(
            fired,
            vec![
                (300, Timer::HeroReveal(0)),
                (1000, Timer::Particles),
                (1200, Timer::HeroReveal(3)),
            ]
        );
        assert_eq!(clock.now_ms(), 1200);
    }

    #[test]
    fn test_same_due_keeps_schedule_order() {
        let mut clock = VirtualClock::new();
        clock.schedule(Timer::CounterStep(1), 1);
        clock.schedule(Timer::CounterStep(0), 1);
        assert_eq!(clock.pop_due(1), Some((1, Timer::CounterStep(1))));
        assert_eq!(clock.pop_due(1), Some((1, Timer::CounterStep(0))));
    }

    #[test]
    fn test_deadline() {
        let mut clock = VirtualClock::new();
        clock.schedule(Timer::Particles, 1000);
        assert_eq!(clock.pop_due(999), None);
        assert_eq!(clock.next_due(), Some(1000));
        clock.advance_to(500);
        assert_eq!(clock.now_ms(), 500);

        // 相对当前时间申请
        assert_eq!(clock.schedule(Timer::HeroReveal(0), 300), 800);
        assert_eq!(clock.pending(), 2);
    }
}
