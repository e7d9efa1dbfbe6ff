//! # 计数动画
//!
//! 统计数字首次以 ≥ 50% 可见度进入视口时，从 0 逐步增加到目标值。
//!
//! - 每步增量为 `ceil(target / speed)`，显示值不会超过目标
//! - 每步之间通过一次性定时器让出事件循环，各计数器的定时器相互独立
//! - 目标 ≤ 0 时直接显示目标值，不申请定时器
//! - 目标无法解析为整数时不播放动画，文本保持原样

use super::{Behavior, Context};
use crate::command::{Command, Timer};
use crate::geometry::ObserverKind;
use crate::input::{EventKind, PageEvent};
use crate::layout::ElementRef;
use crate::state::{CounterPhase, CounterState};

/// 按整数前缀解析 `data-target`
///
/// 允许前导空白和正负号，遇到第一个非数字字符停止，如 `"1500+"` → 1500。
/// 没有任何数字时返回 `None`。
pub fn parse_target(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    rest[..digits_len].parse::<i64>().ok().map(|n| sign * n)
}

/// 目标值对应的每步增量
pub fn step_size(target: i64, speed: u32) -> i64 {
    let speed = i64::from(speed.max(1));
    (target / speed + i64::from(target % speed != 0)).max(1)
}

#[derive(Debug, Clone)]
struct Counter {
    target: Option<i64>,
    displayed: Option<i64>,
    phase: CounterPhase,
}

/// 统计数字计数动画
#[derive(Debug, Default)]
pub struct CounterAnimator {
    counters: Vec<Counter>,
}

impl CounterAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states(&self) -> Vec<CounterState> {
        self.counters
            .iter()
            .map(|c| CounterState {
                target: c.target,
                displayed: c.displayed,
                phase: c.phase,
            })
            .collect()
    }

    fn observe_all(&mut self, ctx: &mut Context<'_>) {
        self.counters = ctx
            .layout
            .counters
            .iter()
            .map(|info| Counter {
                target: parse_target(&info.target),
                displayed: None,
                phase: CounterPhase::Idle,
            })
            .collect();

        if self.counters.is_empty() {
            return;
        }
        ctx.emit(Command::CreateObserver {
            observer: ObserverKind::Counter,
            options: ctx.config.counter.observer_options(),
        });
        for index in 0..self.counters.len() {
            ctx.emit(Command::Observe {
                observer: ObserverKind::Counter,
                target: ElementRef::Counter(index),
            });
        }
    }

    fn trigger(&mut self, index: usize, ctx: &mut Context<'_>) {
        let Some(counter) = self.counters.get_mut(index) else {
            return;
        };
        if counter.phase != CounterPhase::Idle {
            return;
        }
        ctx.emit(Command::Unobserve {
            observer: ObserverKind::Counter,
            target: ElementRef::Counter(index),
        });

        let target = counter.target;
        match target {
            None => counter.phase = CounterPhase::Invalid,
            Some(target) if target <= 0 => {
                counter.displayed = Some(target);
                counter.phase = CounterPhase::Done;
                ctx.emit(set_text(index, target));
            }
            Some(_) => {
                counter.displayed = Some(0);
                counter.phase = CounterPhase::Running;
                ctx.emit(set_text(index, 0));
                self.step(index, ctx);
            }
        }
    }

    fn step(&mut self, index: usize, ctx: &mut Context<'_>) {
        let Some(counter) = self.counters.get_mut(index) else {
            return;
        };
        let (CounterPhase::Running, Some(target), Some(current)) =
            (counter.phase, counter.target, counter.displayed)
        else {
            return;
        };

        let next = current
            .saturating_add(step_size(target, ctx.config.counter.speed))
            .min(target);
        counter.displayed = Some(next);
        ctx.emit(set_text(index, next));

        if next >= target {
            counter.phase = CounterPhase::Done;
        } else {
            ctx.emit(Command::SetTimer {
                timer: Timer::CounterStep(index),
                delay_ms: ctx.config.counter.tick_ms,
            });
        }
    }
}

fn set_text(index: usize, value: i64) -> Command {
    Command::SetText {
        target: ElementRef::Counter(index),
        text: value.to_string(),
    }
}

impl Behavior for CounterAnimator {
    fn name(&self) -> &'static str {
        "counters"
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        &[EventKind::Ready, EventKind::Intersect, EventKind::Timer]
    }

    fn handle(&mut self, event: &PageEvent, ctx: &mut Context<'_>) {
        match event {
            PageEvent::Ready { .. } => self.observe_all(ctx),
            PageEvent::Intersect {
                observer: ObserverKind::Counter,
                entries,
            } => {
                for entry in entries {
                    if let ElementRef::Counter(index) = entry.target
                        && entry.is_intersecting
                    {
                        self.trigger(index, ctx);
                    }
                }
            }
            PageEvent::TimerFired {
                timer: Timer::CounterStep(index),
            } => self.step(*index, ctx),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ComponentCatalog;
    use crate::config::PageConfig;
    use crate::input::IntersectionEntry;
    use crate::layout::PageLayout;

    struct Fixture {
        layout: PageLayout,
        config: PageConfig,
        catalog: ComponentCatalog,
        animator: CounterAnimator,
    }

    impl Fixture {
        fn new(targets: &[&str]) -> Self {
            let mut layout = PageLayout::default();
            for t in targets {
                layout = layout.with_counter(*t, 0.0, 50.0);
            }
            let mut fixture = Self {
                layout: layout.clone(),
                config: PageConfig::default(),
                catalog: ComponentCatalog::builtin(),
                animator: CounterAnimator::new(),
            };
            fixture.send(PageEvent::Ready { layout });
            fixture
        }

        fn send(&mut self, event: PageEvent) -> Vec<Command> {
            let mut out = Vec::new();
            let mut ctx = Context::new(&self.layout, &self.config, &self.catalog, &mut out);
            self.animator.handle(&event, &mut ctx);
            out
        }

        fn intersect(&mut self, index: usize) -> Vec<Command> {
            self.send(PageEvent::Intersect {
                observer: ObserverKind::Counter,
                entries: vec![IntersectionEntry::visible(ElementRef::Counter(index), 1.0)],
            })
        }

        /// 持续触发定时器直到动画结束，返回显示过的全部数值
        fn run_to_end(&mut self, index: usize) -> Vec<i64> {
            let mut shown = Vec::new();
            let mut out = self.intersect(index);
            loop {
                let mut pending = false;
                for cmd in &out {
                    match cmd {
                        Command::SetText { text, .. } => shown.push(text.parse().unwrap()),
                        Command::SetTimer { .. } => pending = true,
                        _ => {}
                    }
                }
                if !pending {
                    break;
                }
                out = self.send(PageEvent::timer(Timer::CounterStep(index)));
            }
            shown
        }
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target("1500"), Some(1500));
        assert_eq!(parse_target("  42"), Some(42));
        assert_eq!(parse_target("1500+"), Some(1500));
        assert_eq!(parse_target("-5"), Some(-5));
        assert_eq!(parse_target("+7"), Some(7));
        assert_eq!(parse_target("abc"), None);
        assert_eq!(parse_target(""), None);
        assert_eq!(parse_target("-"), None);
    }

    #[test]
    fn test_step_size() {
        assert_eq!(step_size(1500, 200), 8);
        assert_eq!(step_size(200, 200), 1);
        assert_eq!(step_size(4, 200), 1);
        assert_eq!(step_size(201, 200), 2);
    }

    #[test]
    fn test_ready_observes_counters() {
        let mut fixture = Fixture::new(&["10"]);
        let out = fixture.send(PageEvent::Ready {
            layout: fixture.layout.clone(),
        });
        assert_eq!(out.len(), 2);
        assert_eq!(
            out[1],
            Command::Observe {
                observer: ObserverKind::Counter,
                target: ElementRef::Counter(0)
            }
        );
    }

    #[test]
    fn test_animation_reaches_exact_target() {
        for target in [1_i64, 4, 199, 200, 201, 360, 1500, 99_999] {
            let mut fixture = Fixture::new(&[&target.to_string()]);
            let shown = fixture.run_to_end(0);
            assert_eq!(shown.first(), Some(&0));
            assert_eq!(shown.last(), Some(&target));
            assert!(shown.windows(2).all(|w| w[0] <= w[1]), "非单调: {target}");
            assert!(shown.iter().all(|v| *v <= target));
            assert_eq!(fixture.animator.states()[0].phase, CounterPhase::Done);
        }
    }

    #[test]
    fn test_extreme_target_terminates() {
        assert_eq!(step_size(i64::MAX, 200), i64::MAX / 200 + 1);

        let mut fixture = Fixture::new(&["9223372036854775807"]);
        let shown = fixture.run_to_end(0);
        assert_eq!(shown.last(), Some(&i64::MAX));
        assert_eq!(shown.len(), 1 + 200);
        assert_eq!(fixture.animator.states()[0].phase, CounterPhase::Done);
    }

    #[test]
    fn test_step_count_for_large_target() {
        let mut fixture = Fixture::new(&["1500"]);
        let shown = fixture.run_to_end(0);
        // 0, 8, 16, ..., 1496, 1500
        assert_eq!(shown.len(), 1 + 188);
    }

    #[test]
    fn test_non_positive_target_terminates_immediately() {
        for target in ["0", "-25"] {
            let mut fixture = Fixture::new(&[target]);
            let out = fixture.intersect(0);
            assert!(!out.iter().any(|c| matches!(c, Command::SetTimer { .. })));
            assert!(out.contains(&set_text(0, parse_target(target).unwrap())));
            assert_eq!(fixture.animator.states()[0].phase, CounterPhase::Done);
        }
    }

    #[test]
    fn test_non_numeric_target_is_not_animated() {
        let mut fixture = Fixture::new(&["many"]);
        let out = fixture.intersect(0);
        assert_eq!(
            out,
            vec![Command::Unobserve {
                observer: ObserverKind::Counter,
                target: ElementRef::Counter(0)
            }]
        );
        assert_eq!(fixture.animator.states()[0].phase, CounterPhase::Invalid);
    }

    #[test]
    fn test_counter_triggers_once() {
        let mut fixture = Fixture::new(&["50"]);
        assert!(!fixture.intersect(0).is_empty());
        assert!(fixture.intersect(0).is_empty());
    }

    #[test]
    fn test_stray_timer_is_ignored() {
        let mut fixture = Fixture::new(&["50"]);
        assert!(
            fixture
                .send(PageEvent::timer(Timer::CounterStep(0)))
                .is_empty()
        );
        assert!(
            fixture
                .send(PageEvent::timer(Timer::CounterStep(7)))
                .is_empty()
        );
    }

    #[test]
    fn test_counters_are_independent() {
        let mut fixture = Fixture::new(&["10", "20"]);
        fixture.intersect(0);
        fixture.intersect(1);
        fixture.send(PageEvent::timer(Timer::CounterStep(1)));
        let states = fixture.animator.states();
        assert_eq!(states[0].displayed, Some(1));
        assert_eq!(states[1].displayed, Some(2));
    }
}
