//! Pomodoro-style countdown.
//!
//! The timer owns at most one pending tick deadline, present only while
//! running. The UI calls [`StudyTimer::poll`] every frame and schedules its
//! next repaint from [`StudyTimer::next_tick`].

use std::time::{Duration, Instant};

pub const WORK_MINUTES_RANGE: (u32, u32) = (1, 60);
pub const BREAK_MINUTES_RANGE: (u32, u32) = (1, 30);
pub const DEFAULT_WORK_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;
const TICK: Duration = Duration::from_secs(1);

pub const READY_STATUS: &str = "Ready to start";
pub const BREAK_STATUS: &str = "Break Time! Rest your mind.";
pub const WORK_STATUS: &str = "Work Session";
pub const WORK_DONE_NOTICE: &str = "Work session complete! Time for a break.";
pub const BREAK_DONE_NOTICE: &str = "Break time over! Ready to focus again?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Work,
    Break,
}

impl SessionKind {
    fn other(self) -> Self {
        match self {
            SessionKind::Work => SessionKind::Break,
            SessionKind::Break => SessionKind::Work,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Started { resumed: bool },
    Paused,
    Reset,
    SessionComplete { finished: SessionKind },
}

impl TimerEvent {
    /// Line for the session log.
    pub fn describe(self) -> &'static str {
        match self {
            TimerEvent::Started { resumed: false } => "Session started",
            TimerEvent::Started { resumed: true } => "Session resumed",
            TimerEvent::Paused => "Session paused",
            TimerEvent::Reset => "Timer reset",
            TimerEvent::SessionComplete {
                finished: SessionKind::Work,
            } => "Work session completed",
            TimerEvent::SessionComplete {
                finished: SessionKind::Break,
            } => "Break completed",
        }
    }

    /// Modal text for completions.
    pub fn notice(self) -> Option<&'static str> {
        match self {
            TimerEvent::SessionComplete {
                finished: SessionKind::Work,
            } => Some(WORK_DONE_NOTICE),
            TimerEvent::SessionComplete {
                finished: SessionKind::Break,
            } => Some(BREAK_DONE_NOTICE),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StudyTimer {
    state: TimerState,
    kind: SessionKind,
    remaining: u32,
    work_minutes: u32,
    break_minutes: u32,
    next_tick: Option<Instant>,
    completed_once: bool,
}

impl Default for StudyTimer {
    fn default() -> Self {
        Self::new(DEFAULT_WORK_MINUTES, DEFAULT_BREAK_MINUTES)
    }
}

impl StudyTimer {
    pub fn new(work_minutes: u32, break_minutes: u32) -> Self {
        let work_minutes = work_minutes.clamp(WORK_MINUTES_RANGE.0, WORK_MINUTES_RANGE.1);
        let break_minutes = break_minutes.clamp(BREAK_MINUTES_RANGE.0, BREAK_MINUTES_RANGE.1);
        Self {
            state: TimerState::Idle,
            kind: SessionKind::Work,
            remaining: work_minutes * 60,
            work_minutes,
            break_minutes,
            next_tick: None,
            completed_once: false,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn work_minutes(&self) -> u32 {
        self.work_minutes
    }

    pub fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    pub fn next_tick(&self) -> Option<Instant> {
        self.next_tick
    }

    fn duration_of(&self, kind: SessionKind) -> u32 {
        match kind {
            SessionKind::Work => self.work_minutes * 60,
            SessionKind::Break => self.break_minutes * 60,
        }
    }

    /// Takes effect immediately only while idle on a work session.
    pub fn set_work_minutes(&mut self, minutes: u32) {
        self.work_minutes = minutes.clamp(WORK_MINUTES_RANGE.0, WORK_MINUTES_RANGE.1);
        if self.state == TimerState::Idle && self.kind == SessionKind::Work {
            self.remaining = self.duration_of(SessionKind::Work);
        }
    }

    pub fn set_break_minutes(&mut self, minutes: u32) {
        self.break_minutes = minutes.clamp(BREAK_MINUTES_RANGE.0, BREAK_MINUTES_RANGE.1);
        if self.state == TimerState::Idle && self.kind == SessionKind::Break {
            self.remaining = self.duration_of(SessionKind::Break);
        }
    }

    pub fn start(&mut self, now: Instant) -> Option<TimerEvent> {
        let resumed = match self.state {
            TimerState::Running => return None,
            TimerState::Paused => true,
            TimerState::Idle => false,
        };
        self.state = TimerState::Running;
        self.next_tick = Some(now + TICK);
        Some(TimerEvent::Started { resumed })
    }

    pub fn pause(&mut self) -> Option<TimerEvent> {
        if self.state != TimerState::Running {
            return None;
        }
        self.state = TimerState::Paused;
        self.next_tick = None;
        Some(TimerEvent::Paused)
    }

    pub fn reset(&mut self) -> TimerEvent {
        self.state = TimerState::Idle;
        self.kind = SessionKind::Work;
        self.remaining = self.duration_of(SessionKind::Work);
        self.next_tick = None;
        self.completed_once = false;
        TimerEvent::Reset
    }

    /// One second elapsed. Completes the session on the tick that reaches 0.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return None;
        }
        let finished = self.kind;
        self.kind = finished.other();
        self.remaining = self.duration_of(self.kind);
        self.state = TimerState::Idle;
        self.next_tick = None;
        self.completed_once = true;
        log::info!("{:?} session complete", finished);
        Some(TimerEvent::SessionComplete { finished })
    }

    /// Runs every tick whose deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Some(deadline) = self.next_tick {
            if now < deadline {
                break;
            }
            self.next_tick = Some(deadline + TICK);
            events.extend(self.tick());
        }
        events
    }

    /// `MM:SS`
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.remaining / 60, self.remaining % 60)
    }

    pub fn status_text(&self) -> &'static str {
        match (self.state, self.kind) {
            (TimerState::Idle, SessionKind::Work) if !self.completed_once => READY_STATUS,
            (_, SessionKind::Work) => WORK_STATUS,
            (_, SessionKind::Break) => BREAK_STATUS,
        }
    }
}
