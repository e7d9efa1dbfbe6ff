//! # 装饰粒子
//!
//! 启动后延迟一段时间，在粒子容器中一次性生成若干随机粒子。
//! 粒子生成后不再修改，也不会被移除。

use rand::Rng;
use rand::rngs::StdRng;

use super::{Behavior, Context};
use crate::command::{Command, Particle, Timer};
use crate::config::PageConfig;
use crate::input::{EventKind, PageEvent};
use crate::layout::Landmark;

/// 随机生成一个粒子
///
/// 直径 [1, 5) px，位置 [0, 100) %，不透明度 [0.2, 0.7)，
/// 周期 [10, 20) s，延迟 [0, 5) s。
pub fn random_particle(rng: &mut impl Rng) -> Particle {
    Particle {
        diameter: rng.gen_range(1.0..5.0),
        left: rng.gen_range(0.0..100.0),
        top: rng.gen_range(0.0..100.0),
        opacity: rng.gen_range(0.2..0.7),
        duration: rng.gen_range(10.0..20.0),
        delay: rng.gen_range(0.0..5.0),
    }
}

/// 粒子背景
pub struct ParticleField {
    rng: StdRng,
    spawned: usize,
    done: bool,
}

impl ParticleField {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng,
            spawned: 0,
            done: false,
        }
    }

    /// 已生成的粒子数量
    pub fn spawned(&self) -> usize {
        self.spawned
    }

    fn spawn(&mut self, ctx: &mut Context<'_>) {
        if self.done {
            return;
        }
        self.done = true;
        if !ctx.layout.has(Landmark::ParticleContainer) {
            return;
        }
        for index in 0..ctx.config.particles.count {
            let particle = random_particle(&mut self.rng);
            ctx.emit(Command::SpawnParticle { index, particle });
            self.spawned += 1;
        }
    }
}

impl Behavior for ParticleField {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        &[EventKind::Timer]
    }

    fn start(&mut self, config: &PageConfig, out: &mut Vec<Command>) {
        out.push(Command::SetTimer {
            timer: Timer::Particles,
            delay_ms: config.particles.delay_ms,
        });
    }

    fn handle(&mut self, event: &PageEvent, ctx: &mut Context<'_>) {
        if let PageEvent::TimerFired {
            timer: Timer::Particles,
        } = event
        {
            self.spawn(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ComponentCatalog;
    use crate::layout::PageLayout;
    use rand::SeedableRng;

    fn fire(field: &mut ParticleField, layout: &PageLayout) -> Vec<Command> {
        let config = PageConfig::default();
        let catalog = ComponentCatalog::builtin();
        let mut out = Vec::new();
        let mut ctx = Context::new(layout, &config, &catalog, &mut out);
        field.handle(&PageEvent::timer(Timer::Particles), &mut ctx);
        out
    }

    #[test]
    fn test_start_schedules_timer() {
        let mut field = ParticleField::new(StdRng::seed_from_u64(0));
        let mut out = Vec::new();
        field.start(&PageConfig::default(), &mut out);
        assert_eq!(
            out,
            vec![Command::SetTimer {
                timer: Timer::Particles,
                delay_ms: 1000
            }]
        );
    }

    #[test]
    fn test_spawns_twenty_particles_in_range() {
        let mut field = ParticleField::new(StdRng::seed_from_u64(42));
        let out = fire(&mut field, &PageLayout::showcase());
        assert_eq!(out.len(), 20);
        assert_eq!(field.spawned(), 20);
        for (i, cmd) in out.iter().enumerate() {
            let Command::SpawnParticle { index, particle } = cmd else {
                panic!("unexpected command {cmd}");
            };
            assert_eq!(*index, i);
            assert!((1.0..=5.0).contains(&particle.diameter));
            assert!((0.2..=0.7).contains(&particle.opacity));
            assert!((0.0..=100.0).contains(&particle.left));
            assert!((0.0..=100.0).contains(&particle.top));
            assert!((10.0..=20.0).contains(&particle.duration));
            assert!((0.0..=5.0).contains(&particle.delay));
        }
    }

    #[test]
    fn test_spawns_only_once() {
        let mut field = ParticleField::new(StdRng::seed_from_u64(42));
        fire(&mut field, &PageLayout::showcase());
        assert!(fire(&mut field, &PageLayout::showcase()).is_empty());
        assert_eq!(field.spawned(), 20);
    }

    #[test]
    fn test_same_seed_same_particles() {
        let a = fire(
            &mut ParticleField::new(StdRng::seed_from_u64(7)),
            &PageLayout::showcase(),
        );
        let b = fire(
            &mut ParticleField::new(StdRng::seed_from_u64(7)),
            &PageLayout::showcase(),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_container() {
        let layout = PageLayout::showcase().without_landmark(Landmark::ParticleContainer);
        let mut field = ParticleField::new(StdRng::seed_from_u64(1));
        assert!(fire(&mut field, &layout).is_empty());
        assert_eq!(field.spawned(), 0);
    }
}
