/// What a single tick did to the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The countdown is not running; nothing changed.
    Stopped,
    Running(u32),
    /// This tick took the remaining time to zero. Reported exactly once per run.
    Expired,
}

/// A whole-second countdown. Stops by itself when it reaches zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    budget: u32,
    remaining: u32,
    running: bool,
}

impl Countdown {
    pub fn start(budget: u32) -> Self {
        Self {
            budget,
            remaining: budget,
            running: budget > 0,
        }
    }

    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::Stopped;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.running = false;
            Tick::Expired
        } else {
            Tick::Running(self.remaining)
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        *self = Self::start(self.budget);
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn elapsed(&self) -> u32 {
        self.budget - self.remaining
    }
}

/// `m:ss`
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
