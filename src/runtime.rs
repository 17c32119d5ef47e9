use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

use crate::app::{App, Flow};

#[derive(Clone, Debug, PartialEq)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    /// Nothing happened within the tick interval
    Tick,
}

impl AppEvent {
    /// Only key presses and resizes reach the app. Release and repeat
    /// reports would double every digit on terminals that send them.
    pub fn from_terminal(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
            Event::Resize(_, _) => Some(AppEvent::Resize),
            _ => None,
        }
    }
}

pub trait EventSource {
    /// Wait up to `timeout` for the next event
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Reads the terminal on a background thread
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(raw) => {
                    let Some(ev) = AppEvent::from_terminal(raw) else {
                        continue;
                    };
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, "terminal event reader stopped");
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Events pushed by hand, for driving the app without a terminal
pub struct ChannelEventSource {
    rx: Receiver<AppEvent>,
}

impl ChannelEventSource {
    pub fn channel() -> (Sender<AppEvent>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }
}

impl EventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

pub struct Runner<E: EventSource> {
    source: E,
    tick: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(source: E, tick: Duration) -> Self {
        Self { source, tick }
    }

    /// Next event, `Tick` when the interval passes quietly, `None` once the
    /// source has gone away for good.
    pub fn step(&self) -> Option<AppEvent> {
        match self.source.recv_timeout(self.tick) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) => Some(AppEvent::Tick),
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Feed events to `app` until it quits or input ends. `redraw` runs once
    /// up front and after every key or resize; ticks change nothing on screen.
    pub fn run<F>(&self, app: &mut App, mut redraw: F) -> io::Result<()>
    where
        F: FnMut(&App) -> io::Result<()>,
    {
        redraw(app)?;
        loop {
            match self.step() {
                Some(AppEvent::Key(key)) => {
                    if app.on_key(key) == Flow::Quit {
                        return Ok(());
                    }
                }
                Some(AppEvent::Resize) => {}
                Some(AppEvent::Tick) => continue,
                None => {
                    tracing::warn!("input closed, leaving");
                    return Ok(());
                }
            }
            redraw(app)?;
        }
    }
}
