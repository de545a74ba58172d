//! Periodic tick timers.
//!
//! The engine has no clock of its own. The shell polls a `TickScheduler`
//! with the current instant and forwards whatever ticks came due, oldest
//! first. Enemy and bullet timers always run; the engine ignores their
//! ticks while paused. The LifeLost timer only runs during that status.

use std::time::{Duration, Instant};

use crate::consts::{BULLET_TICK, ENEMY_TICK, LIFE_LOST_TICK, MAX_CATCHUP_TICKS};
use crate::engine::Event;
use crate::entities::GameStatus;

#[derive(Clone, Copy, Debug)]
struct Timer {
    period: Duration,
    next_due: Instant,
    event: Event,
}

impl Timer {
    fn new(period: Duration, event: Event, now: Instant) -> Self {
        Self {
            period,
            next_due: now + period,
            event,
        }
    }

    fn drain(&mut self, now: Instant, due: &mut Vec<(Instant, Event)>) {
        let mut fired = 0;
        while self.next_due <= now && fired < MAX_CATCHUP_TICKS {
            due.push((self.next_due, self.event));
            self.next_due += self.period;
            fired += 1;
        }
        // Drop whatever is still overdue after the catch-up cap
        if self.next_due <= now {
            self.next_due = now + self.period;
        }
    }
}

#[derive(Clone, Debug)]
pub struct TickScheduler {
    enemy: Timer,
    bullet: Timer,
    life_lost_period: Duration,
    life_lost: Option<Timer>,
}

impl TickScheduler {
    pub fn new(now: Instant) -> Self {
        Self::with_periods(ENEMY_TICK, BULLET_TICK, LIFE_LOST_TICK, now)
    }

    pub fn with_periods(
        enemy: Duration,
        bullet: Duration,
        life_lost: Duration,
        now: Instant,
    ) -> Self {
        Self {
            enemy: Timer::new(enemy, Event::EnemyTick, now),
            bullet: Timer::new(bullet, Event::BulletTick, now),
            life_lost_period: life_lost,
            life_lost: None,
        }
    }

    /// Restart every timer from `now`, e.g. after a new game begins.
    pub fn reset(&mut self, now: Instant) {
        *self = Self::with_periods(
            self.enemy.period,
            self.bullet.period,
            self.life_lost_period,
            now,
        );
    }

    /// Start the LifeLost timer from the tick that cost the life, so the
    /// first flash step lasts exactly one period however late the poll is.
    pub fn start_life_lost(&mut self, at: Instant) {
        self.life_lost = Some(Timer::new(self.life_lost_period, Event::LifeLostTick, at));
    }

    /// Ticks due at `now`, ordered by when they came due.
    pub fn poll(&mut self, now: Instant, status: GameStatus) -> Vec<Event> {
        self.due(now, status)
            .into_iter()
            .map(|(_, event)| event)
            .collect()
    }

    /// Like [`poll`](Self::poll), but keeps the instant each tick came due.
    ///
    /// A LifeLost status nobody announced through `start_life_lost` arms the
    /// timer from `now`.
    pub fn due(&mut self, now: Instant, status: GameStatus) -> Vec<(Instant, Event)> {
        match (status, self.life_lost.is_some()) {
            (GameStatus::LifeLost, false) => {
                self.life_lost = Some(Timer::new(self.life_lost_period, Event::LifeLostTick, now));
            }
            (GameStatus::LifeLost, true) => {}
            (_, _) => self.life_lost = None,
        }

        let mut due = Vec::new();
        self.enemy.drain(now, &mut due);
        self.bullet.drain(now, &mut due);
        if let Some(timer) = self.life_lost.as_mut() {
            timer.drain(now, &mut due);
        }
        due.sort_by_key(|&(at, _)| at);
        due
    }

    /// The earliest instant any running timer fires.
    pub fn next_deadline(&self) -> Instant {
        let mut next = self.enemy.next_due.min(self.bullet.next_due);
        if let Some(timer) = &self.life_lost {
            next = next.min(timer.next_due);
        }
        next
    }
}
